use crate::model::{Classification, NodeCategory, NodeOrigin};
use ahash::AHashMap;

/// Marker carried by every builtin node type token.
pub const BUILTIN_MARKER: &str = "ComIbm";

/// Normalizes raw node type tokens into canonical tags and buckets.
#[derive(Debug, Clone, Default)]
pub struct TypeClassifier {
    aliases: AHashMap<String, NodeCategory>,
}

impl TypeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes an extra canonical tag into an existing bucket.
    pub fn with_alias(mut self, tag: &str, category: NodeCategory) -> Self {
        self.aliases.insert(tag.to_string(), category);
        self
    }

    /// Classifies a raw type token such as `ComIbmCompute.msgnode:FCMComposite_1`.
    ///
    /// Builtin tokens are cut at the first `.` and lose the builtin marker; embedded
    /// tokens are cut at the first `:` and kept verbatim. A token without its cut
    /// character is used whole.
    pub fn classify(&self, raw_type: &str) -> Classification {
        let (tag, origin) = if raw_type.contains(BUILTIN_MARKER) {
            let head = raw_type.split('.').next().unwrap_or(raw_type);
            (head.replace(BUILTIN_MARKER, ""), NodeOrigin::Builtin)
        } else {
            let head = raw_type.split(':').next().unwrap_or(raw_type);
            (head.to_string(), NodeOrigin::Subflow)
        };

        let category = self
            .aliases
            .get(&tag)
            .copied()
            .or_else(|| NodeCategory::from_tag(&tag))
            .unwrap_or(NodeCategory::Miscellaneous);

        Classification {
            tag,
            category,
            origin,
        }
    }
}

/// Monitoring is on unless the node has no `monitorEvents` element or the first one
/// is explicitly disabled.
pub fn monitoring_enabled(monitor_event_count: usize, first_event_enabled: &str) -> bool {
    monitor_event_count > 0 && first_event_enabled != "false"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_marker_is_stripped_before_first_dot() {
        let c = TypeClassifier::new().classify("ComIbmMQInput.msgnode:FCMComposite_1");
        assert_eq!(c.tag, "MQInput");
        assert_eq!(c.category, NodeCategory::MqInput);
        assert_eq!(c.origin, NodeOrigin::Builtin);
    }

    #[test]
    fn unknown_builtin_goes_to_miscellaneous_with_its_own_tag() {
        let c = TypeClassifier::new().classify("ComIbmJavaCompute.msgnode:FCMComposite_1");
        assert_eq!(c.tag, "JavaCompute");
        assert_eq!(c.category, NodeCategory::Miscellaneous);
    }

    #[test]
    fn token_without_separator_is_used_whole() {
        let classifier = TypeClassifier::new();
        assert_eq!(classifier.classify("ComIbmTrace").tag, "Trace");
        assert_eq!(classifier.classify("Standalone").tag, "Standalone");
        assert_eq!(classifier.classify("").category, NodeCategory::Miscellaneous);
    }

    #[test]
    fn monitoring_defaults() {
        assert!(!monitoring_enabled(0, ""));
        assert!(monitoring_enabled(1, ""));
        assert!(monitoring_enabled(2, "true"));
        assert!(!monitoring_enabled(1, "false"));
    }
}
