use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines the closed category set, its canonical tags, and the tag lookup.
macro_rules! define_categories {
    ( $( ($variant:ident, $tag:literal) ),* $(,)? ) => {
        /// The bucket a node is sorted into.
        ///
        /// Every builtin tag the parser recognizes has its own variant. Anything else,
        /// including subflow tags, lands in `Miscellaneous`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum NodeCategory {
            $( $variant, )*
            Miscellaneous,
        }

        impl NodeCategory {
            /// All categories, catch-all last.
            pub const ALL: &'static [NodeCategory] = &[ $( NodeCategory::$variant, )* NodeCategory::Miscellaneous ];

            /// Looks up the category for a canonical tag. Unknown tags yield `None`.
            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $( $tag => Some(NodeCategory::$variant), )*
                    _ => None,
                }
            }

            /// The canonical tag of this category.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( NodeCategory::$variant => $tag, )*
                    NodeCategory::Miscellaneous => "Miscellaneous",
                }
            }
        }
    };
}

define_categories! {
    (Collector, "Collector"),
    (Compute, "Compute"),
    (FileInput, "FileInput"),
    (FileOutput, "FileOutput"),
    (WsInput, "WSInput"),
    (WsRequest, "WSRequest"),
    (WsReply, "WSReply"),
    (MqInput, "MQInput"),
    (MqOutput, "MQOutput"),
    (MqGet, "MQGet"),
    (MqHeader, "MQHeader"),
    (MqReply, "MQReply"),
    (ResetContentDescriptor, "ResetContentDescriptor"),
    (SoapInput, "SOAPInput"),
    (SoapRequest, "SOAPRequest"),
    (TimeoutControl, "TimeoutControl"),
    (TimeoutNotification, "TimeoutNotification"),
    (TryCatch, "TryCatch"),
    (ImsRequest, "IMSRequest"),
    (Filter, "Filter"),
    (Trace, "Trace"),
    (Label, "Label"),
    (RouteToLabel, "RouteToLabel"),
    (AggregateControl, "AggregateControl"),
    (Database, "Database"),
    (Route, "Route"),
}

impl NodeCategory {
    /// Categories that receive messages from outside the flow and carry instance settings.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            NodeCategory::MqInput
                | NodeCategory::FileInput
                | NodeCategory::WsInput
                | NodeCategory::SoapInput
        )
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a node's type token named a builtin node or an embedded subflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeOrigin {
    Builtin,
    Subflow,
}

/// Result of normalizing a raw type token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Canonical tag, e.g. `Compute` or a subflow's own prefix.
    pub tag: String,
    pub category: NodeCategory,
    pub origin: NodeOrigin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_lookup() {
        for category in NodeCategory::ALL {
            if *category == NodeCategory::Miscellaneous {
                assert_eq!(NodeCategory::from_tag("Miscellaneous"), None);
                continue;
            }
            assert_eq!(NodeCategory::from_tag(category.as_str()), Some(*category));
        }
    }

    #[test]
    fn closed_set_has_every_builtin_plus_catch_all() {
        assert_eq!(NodeCategory::ALL.len(), 27);
        assert_eq!(NodeCategory::ALL.last(), Some(&NodeCategory::Miscellaneous));
    }
}
