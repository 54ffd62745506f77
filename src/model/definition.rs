use super::category::{NodeCategory, NodeOrigin};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Category-specific configuration of a node, keyed by property name.
pub type PropertyBag = AHashMap<String, PropertyValue>;

/// A single category-specific property value.
///
/// Boolean settings are kept in their textual form, exactly as the document spells them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyValue {
    Text(String),
    List(Vec<String>),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::List(items) => Some(items),
            PropertyValue::Text(_) => None,
        }
    }

    /// Interprets a textual value as a flag. Only `true` (any case) is truthy.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_str().map(|s| s.eq_ignore_ascii_case("true"))
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::List(value)
    }
}

/// Parser settings every node may carry. Absent attributes leave the defaults in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub build_tree_using_schema: bool,
    pub mixed_content_retain: bool,
    pub comments_retain: bool,
    pub validate_content_and_value: bool,
    pub message_domain_property: String,
    pub message_set_property: String,
    pub request_msg_location_in_tree: String,
    pub message_domain: String,
    pub message_set: String,
    pub record_definition: String,
    pub reset_message_domain: bool,
    pub reset_message_set: bool,
    pub reset_message_type: bool,
    pub reset_message_format: bool,
    pub monitoring_enabled: bool,
}

/// One processing element of a message flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    /// Canonical type tag. For subflows this is the embedded flow's own prefix.
    pub tag: String,
    pub category: NodeCategory,
    pub origin: NodeOrigin,
    pub config: NodeConfig,
    /// Terminal names of incoming connections. Order carries no meaning.
    pub input_terminals: Vec<String>,
    /// Terminal names of outgoing connections. Order carries no meaning.
    pub output_terminals: Vec<String>,
    pub properties: PropertyBag,
}

impl Node {
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn text_property(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(PropertyValue::as_str)
    }

    pub fn list_property(&self, key: &str) -> Option<&[String]> {
        self.property(key).and_then(PropertyValue::as_list)
    }

    pub fn is_subflow(&self) -> bool {
        self.origin == NodeOrigin::Subflow
    }
}

/// A directed wire between two node terminals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub source_node_id: String,
    pub source_node_name: String,
    pub target_node_id: String,
    pub target_node_name: String,
    pub source_terminal: String,
    pub target_terminal: String,
}

/// A free-floating annotation on the flow canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNote {
    pub associated_node_ids: Vec<String>,
    pub text: String,
    pub x: i32,
    pub y: i32,
}

/// Flow-level descriptive text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDescription {
    pub short_description: String,
    pub long_description: String,
}
