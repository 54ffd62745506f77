use super::accessor::{Element, FlowDocument, local_attribute};
use super::classifier::{TypeClassifier, monitoring_enabled};
use super::properties::{ExtractorRegistry, NodeScope};
use crate::error::{FlowParseError, MalformedFieldError};
use crate::model::{CommentNote, Connection, FlowDescription, Node, NodeConfig, PropertyBag};
use ahash::AHashMap;
use log::debug;

/// How an absent or empty `association` attribute on a comment note is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssociationPolicy {
    /// One empty-string entry, as the flow tooling has always reported it.
    #[default]
    Preserve,
    /// No entries at all.
    Normalize,
}

/// Terminal names per node id, gathered in one pass over the connections.
#[derive(Debug, Default)]
pub(super) struct TerminalIndex {
    inputs: AHashMap<String, Vec<String>>,
    outputs: AHashMap<String, Vec<String>>,
}

impl TerminalIndex {
    pub(super) fn build(document: &FlowDocument<'_>) -> Self {
        let mut index = Self::default();
        for connection in document.elements("connections") {
            let attr = |name| local_attribute(&connection, name);
            // An endpoint without its node attribute belongs to no node.
            if let Some(target) = attr("targetNode") {
                index
                    .inputs
                    .entry(target.to_string())
                    .or_default()
                    .push(attr("targetTerminalName").unwrap_or_default().to_string());
            }
            if let Some(source) = attr("sourceNode") {
                index
                    .outputs
                    .entry(source.to_string())
                    .or_default()
                    .push(attr("sourceTerminalName").unwrap_or_default().to_string());
            }
        }
        index
    }

    fn inputs(&self, node_id: &str) -> Vec<String> {
        self.inputs.get(node_id).cloned().unwrap_or_default()
    }

    fn outputs(&self, node_id: &str) -> Vec<String> {
        self.outputs.get(node_id).cloned().unwrap_or_default()
    }
}

/// Assembles `Node` records from `nodes` elements.
pub(super) struct NodeBuilder<'a, 'input> {
    document: &'a FlowDocument<'input>,
    classifier: &'a TypeClassifier,
    registry: &'a ExtractorRegistry,
    terminals: &'a TerminalIndex,
    strict: bool,
}

impl<'a, 'input> NodeBuilder<'a, 'input> {
    pub(super) fn new(
        document: &'a FlowDocument<'input>,
        classifier: &'a TypeClassifier,
        registry: &'a ExtractorRegistry,
        terminals: &'a TerminalIndex,
        strict: bool,
    ) -> Self {
        Self {
            document,
            classifier,
            registry,
            terminals,
            strict,
        }
    }

    /// Builds one node. Malformed fields are handed to `recover`, which decides whether
    /// the node is kept or the parse aborts.
    pub(super) fn build(
        &self,
        element: Element<'a, 'input>,
        recover: &mut dyn FnMut(FlowParseError) -> Result<(), FlowParseError>,
    ) -> Result<Node, FlowParseError> {
        let doc = self.document;
        let id = doc.scalar_in(element, "@id")?;
        let name = doc.scalar_in(element, "translation/@string")?;
        let raw_type = doc.scalar_in(element, "@type")?;
        let classification = self.classifier.classify(&raw_type);

        debug!(
            "node id: {}, name: {}, type: {} -> {}",
            id, name, raw_type, classification.category
        );

        let attr = |path: &str| doc.scalar_in(element, path);
        let config = NodeConfig {
            build_tree_using_schema: is_true(&attr("@parserXmlnscBuildTreeUsingXMLSchema")?),
            mixed_content_retain: attr("@parserXmlnscMixedContentRetainMode")? == "all",
            comments_retain: attr("@parserXmlnscCommentsRetainMode")? == "all",
            validate_content_and_value: attr("@validateMaster")? == "contentAndValue",
            message_domain_property: attr("@messageDomainProperty")?,
            message_set_property: attr("@messageSetProperty")?,
            request_msg_location_in_tree: attr("@requestMsgLocationInTree")?,
            message_domain: attr("@messageDomain")?,
            message_set: attr("@messageSet")?,
            record_definition: attr("@recordDefinition")?,
            reset_message_domain: is_true(&attr("@resetMessageDomain")?),
            reset_message_set: is_true(&attr("@resetMessageSet")?),
            reset_message_type: is_true(&attr("@resetMessageType")?),
            reset_message_format: is_true(&attr("@resetMessageFormat")?),
            monitoring_enabled: monitoring_enabled(
                doc.count_in(element, "monitorEvents")?,
                &attr("monitorEvents/@eventEnabled")?,
            ),
        };

        let mut properties = PropertyBag::new();
        if let Some(extractors) = self.registry.get(&classification.category) {
            let scope = NodeScope::resolve(doc, &id, element).strict(self.strict);
            for extractor in extractors {
                if let Err(e) = extractor.extract(&scope, &mut properties) {
                    debug!("extractor '{}' failed on node '{}'", extractor.name(), id);
                    recover(e)?;
                }
            }
        }

        Ok(Node {
            input_terminals: self.terminals.inputs(&id),
            output_terminals: self.terminals.outputs(&id),
            id,
            name,
            tag: classification.tag,
            category: classification.category,
            origin: classification.origin,
            config,
            properties,
        })
    }
}

/// Builds one `Connection` per `connections` element, resolving endpoint names by id.
/// Ids with no matching node resolve to an empty name.
pub(super) fn build_connections(
    document: &FlowDocument<'_>,
    names: &AHashMap<String, String>,
) -> Result<Vec<Connection>, FlowParseError> {
    let name_of = |id: &str| names.get(id).cloned().unwrap_or_default();
    document
        .elements("connections")
        .map(|element| -> Result<Connection, FlowParseError> {
            let source_node_id = document.scalar_in(element, "@sourceNode")?;
            let target_node_id = document.scalar_in(element, "@targetNode")?;
            Ok(Connection {
                source_node_name: name_of(&source_node_id),
                target_node_name: name_of(&target_node_id),
                source_terminal: document.scalar_in(element, "@sourceTerminalName")?,
                target_terminal: document.scalar_in(element, "@targetTerminalName")?,
                source_node_id,
                target_node_id,
            })
        })
        .collect()
}

/// Builds one `CommentNote` per `stickyNote` element.
///
/// A malformed location is handed to `recover`; if recovered, the note is kept at `0,0`.
pub(super) fn build_comments(
    document: &FlowDocument<'_>,
    policy: AssociationPolicy,
    recover: &mut dyn FnMut(FlowParseError) -> Result<(), FlowParseError>,
) -> Result<Vec<CommentNote>, FlowParseError> {
    let mut comments = Vec::new();
    for element in document.elements("stickyNote") {
        let association = document.scalar_in(element, "@association")?;
        let text = document.scalar_in(element, "body/@string")?;
        let location = document.scalar_in(element, "@location")?;

        let (x, y) = match parse_location(&location) {
            Ok(point) => point,
            Err(e) => {
                recover(e.into())?;
                (0, 0)
            }
        };

        comments.push(CommentNote {
            associated_node_ids: parse_association(&association, policy),
            text,
            x,
            y,
        });
    }
    Ok(comments)
}

/// The first flow-level short and long description found in the document.
pub(super) fn build_description(document: &FlowDocument<'_>) -> Result<FlowDescription, FlowParseError> {
    Ok(FlowDescription {
        short_description: document.scalar("//eClassifiers/shortDescription/@string")?,
        long_description: document.scalar("//eClassifiers/longDescription/@string")?,
    })
}

/// Splits an association list on single spaces. Trailing empty entries are dropped;
/// an empty list follows `policy`.
pub fn parse_association(raw: &str, policy: AssociationPolicy) -> Vec<String> {
    if raw.is_empty() {
        return match policy {
            AssociationPolicy::Preserve => vec![String::new()],
            AssociationPolicy::Normalize => Vec::new(),
        };
    }

    let mut ids: Vec<String> = raw.split(' ').map(str::to_string).collect();
    while ids.last().is_some_and(String::is_empty) {
        ids.pop();
    }
    ids
}

/// Parses `"<int>,<int>"` canvas coordinates.
pub fn parse_location(raw: &str) -> Result<(i32, i32), MalformedFieldError> {
    let invalid = || MalformedFieldError::InvalidLocation {
        location: raw.to_string(),
    };
    let (x, y) = raw.split_once(',').ok_or_else(invalid)?;
    let x = x.parse::<i32>().map_err(|_| invalid())?;
    let y = y.parse::<i32>().map_err(|_| invalid())?;
    Ok((x, y))
}

fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
