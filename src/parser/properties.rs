use super::accessor::{AttrPath, Element, FlowDocument, local_attribute};
use crate::error::{FlowParseError, MalformedFieldError, QueryError};
use crate::model::{NodeCategory, PropertyBag, PropertyValue};
use ahash::AHashMap;

/// The element a property extractor reads from, located by node id.
pub struct NodeScope<'a, 'input> {
    pub id: &'a str,
    document: &'a FlowDocument<'input>,
    element: Element<'a, 'input>,
    strict: bool,
}

impl<'a, 'input> NodeScope<'a, 'input> {
    /// Resolves the first `nodes` element carrying `id`, falling back to `element`
    /// when the id cannot be found (e.g. the node has no id at all).
    pub fn resolve(document: &'a FlowDocument<'input>, id: &'a str, element: Element<'a, 'input>) -> Self {
        let element = document.node_by_id(id).unwrap_or(element);
        Self {
            id,
            document,
            element,
            strict: false,
        }
    }

    /// Marks the scope as belonging to a strict parse.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether the parse aborts on malformed fields. Extractors may be stricter about
    /// missing values when this is set.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Reads a path relative to the node element. Missing values read as "".
    pub fn attribute(&self, path: &str) -> Result<String, QueryError> {
        self.document.scalar_in(self.element, path)
    }

    pub fn values(&self, path: &str) -> Result<Vec<String>, QueryError> {
        self.document.values_in(self.element, path)
    }

    pub fn count(&self, path: &str) -> Result<usize, QueryError> {
        self.document.count_in(self.element, path)
    }

    /// Elements selected by `path` relative to the node, in document order.
    pub fn elements(&self, path: &str) -> Result<Vec<Element<'a, 'input>>, QueryError> {
        Ok(AttrPath::compile(path)?.select(self.element))
    }
}

/// Pulls the category-specific configuration of one node into its property bag.
///
/// Returning `FlowParseError::Malformed` marks a recoverable problem: whatever the
/// extractor already inserted is kept. Any other error aborts the parse.
pub trait PropertyExtractor: Send + Sync {
    fn name(&self) -> &str;
    fn extract(&self, scope: &NodeScope<'_, '_>, bag: &mut PropertyBag) -> Result<(), FlowParseError>;
}

/// Extractors registered per category, run in registration order.
pub type ExtractorRegistry = AHashMap<NodeCategory, Vec<Box<dyn PropertyExtractor>>>;

/// Copies plain attributes (or child attributes) into the bag under fixed keys.
pub struct AttributeExtractor {
    name: &'static str,
    fields: &'static [(&'static str, &'static str)],
}

impl PropertyExtractor for AttributeExtractor {
    fn name(&self) -> &str {
        self.name
    }

    fn extract(&self, scope: &NodeScope<'_, '_>, bag: &mut PropertyBag) -> Result<(), FlowParseError> {
        for (key, path) in self.fields {
            bag.insert(key.to_string(), scope.attribute(path)?.into());
        }
        Ok(())
    }
}

/// Reads a routine reference such as `esql://routine/#Module.Main` and stores the
/// module name between `#` and `.Main`, optionally keeping the full value too.
///
/// An absent reference stores `""`. It only counts as malformed in strict mode.
pub struct ModuleReferenceExtractor {
    key: &'static str,
    attribute: &'static str,
    full_key: Option<&'static str>,
}

impl PropertyExtractor for ModuleReferenceExtractor {
    fn name(&self) -> &str {
        self.key
    }

    fn extract(&self, scope: &NodeScope<'_, '_>, bag: &mut PropertyBag) -> Result<(), FlowParseError> {
        let raw = scope.attribute(&format!("@{}", self.attribute))?;
        if let Some(full_key) = self.full_key {
            bag.insert(full_key.to_string(), raw.as_str().into());
        }

        match module_name(&raw) {
            Some(module) => {
                bag.insert(self.key.to_string(), module.into());
                Ok(())
            }
            None if raw.is_empty() && !scope.is_strict() => {
                bag.insert(self.key.to_string(), PropertyValue::Text(String::new()));
                Ok(())
            }
            None => {
                bag.insert(self.key.to_string(), PropertyValue::Text(String::new()));
                Err(MalformedFieldError::MissingExpressionMarker {
                    node_id: scope.id.to_string(),
                    key: self.key.to_string(),
                    value: raw,
                }
                .into())
            }
        }
    }
}

/// Collects the output terminal of every filter table entry on a Route node. An entry
/// without a terminal contributes an empty string.
pub struct RouteTableExtractor;

impl PropertyExtractor for RouteTableExtractor {
    fn name(&self) -> &str {
        "routeTerminals"
    }

    fn extract(&self, scope: &NodeScope<'_, '_>, bag: &mut PropertyBag) -> Result<(), FlowParseError> {
        let terminals = scope
            .elements("filterTable")?
            .iter()
            .map(|entry| {
                local_attribute(entry, "routingOutputTerminal")
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();
        bag.insert("routeTerminals".to_string(), PropertyValue::List(terminals));
        Ok(())
    }
}

/// The text between the first `#` and the first `.Main`. `None` if either marker is
/// missing or they are out of order.
pub fn module_name(expression: &str) -> Option<&str> {
    let start = expression.find('#')? + 1;
    let end = expression.find(".Main")?;
    expression.get(start..end)
}

const QUEUE_FIELDS: &[(&str, &str)] = &[
    ("queueName", "@queueName"),
    ("transactionMode", "@transactionMode"),
];
const REPLY_FIELDS: &[(&str, &str)] = &[("transactionMode", "@transactionMode")];
const IMS_FIELDS: &[(&str, &str)] = &[
    ("shortDescription", "shortDescription/@string"),
    ("longDescription", "longDescription/@string"),
    ("useNodeProperties", "@useNodeProperties"),
    ("configurableService", "@configurableService"),
    ("commitMode", "@commitMode"),
];
const HTTP_REPLY_FIELDS: &[(&str, &str)] = &[
    ("ignoreTransportFailures", "@ignoreTransportFailures"),
    ("generateDefaultHttpHeaders", "@generateDefaultHttpHeaders"),
];
const SOAP_REQUEST_FIELDS: &[(&str, &str)] = &[("requestTimeout", "@requestTimeout")];
const AGGREGATE_FIELDS: &[(&str, &str)] = &[("timeoutInterval", "@timeoutInterval")];
const DATA_SOURCE_FIELDS: &[(&str, &str)] = &[("dataSource", "@dataSource")];
const INSTANCE_FIELDS: &[(&str, &str)] = &[
    ("componentLevel", "@componentLevel"),
    ("additionalInstances", "@additionalInstances"),
];

/// Registers the default extractors for every category that has properties.
pub(super) fn register_default_extractors(registry: &mut ExtractorRegistry) {
    let mut add = |category: NodeCategory, extractor: Box<dyn PropertyExtractor>| {
        registry.entry(category).or_default().push(extractor);
    };

    for category in [NodeCategory::MqInput, NodeCategory::MqOutput, NodeCategory::MqGet] {
        add(
            category,
            Box::new(AttributeExtractor {
                name: "queue",
                fields: QUEUE_FIELDS,
            }),
        );
    }
    add(
        NodeCategory::MqReply,
        Box::new(AttributeExtractor {
            name: "reply",
            fields: REPLY_FIELDS,
        }),
    );
    add(
        NodeCategory::ImsRequest,
        Box::new(AttributeExtractor {
            name: "ims",
            fields: IMS_FIELDS,
        }),
    );
    add(
        NodeCategory::WsReply,
        Box::new(AttributeExtractor {
            name: "httpReply",
            fields: HTTP_REPLY_FIELDS,
        }),
    );
    add(
        NodeCategory::SoapRequest,
        Box::new(AttributeExtractor {
            name: "soapRequest",
            fields: SOAP_REQUEST_FIELDS,
        }),
    );
    add(
        NodeCategory::AggregateControl,
        Box::new(AttributeExtractor {
            name: "aggregate",
            fields: AGGREGATE_FIELDS,
        }),
    );
    add(
        NodeCategory::Compute,
        Box::new(ModuleReferenceExtractor {
            key: "computeExpression",
            attribute: "computeExpression",
            full_key: Some("computeExpressionFull"),
        }),
    );
    add(
        NodeCategory::Compute,
        Box::new(AttributeExtractor {
            name: "dataSource",
            fields: DATA_SOURCE_FIELDS,
        }),
    );
    add(
        NodeCategory::Filter,
        Box::new(ModuleReferenceExtractor {
            key: "filterExpression",
            attribute: "filterExpression",
            full_key: None,
        }),
    );
    add(
        NodeCategory::Database,
        Box::new(ModuleReferenceExtractor {
            key: "statement",
            attribute: "statement",
            full_key: None,
        }),
    );
    add(NodeCategory::Route, Box::new(RouteTableExtractor));

    for category in NodeCategory::ALL.iter().filter(|c| c.is_input()) {
        add(
            *category,
            Box::new(AttributeExtractor {
                name: "instances",
                fields: INSTANCE_FIELDS,
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_name_between_markers() {
        assert_eq!(module_name("esql://routine/#myModule.Main"), Some("myModule"));
        assert_eq!(module_name("#.Main"), Some(""));
        assert_eq!(module_name("esql://routine/#a.b.Main"), Some("a.b"));
    }

    #[test]
    fn module_name_requires_both_markers_in_order() {
        assert_eq!(module_name("esql://routine/myModule.Main"), None);
        assert_eq!(module_name("esql://routine/#myModule"), None);
        assert_eq!(module_name(".Main#myModule"), None);
    }

    #[test]
    fn every_property_bearing_category_is_registered() {
        let mut registry = ExtractorRegistry::new();
        register_default_extractors(&mut registry);
        assert_eq!(registry[&NodeCategory::Compute].len(), 2);
        assert_eq!(registry[&NodeCategory::MqInput].len(), 2);
        assert_eq!(registry[&NodeCategory::FileInput].len(), 1);
        assert!(!registry.contains_key(&NodeCategory::Trace));
        assert!(!registry.contains_key(&NodeCategory::Miscellaneous));
    }
}
