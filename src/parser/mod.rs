use crate::error::{FlowParseError, MalformedFieldError};
use crate::model::{MessageFlow, NodeCategory};
use ahash::AHashMap;
use log::{debug, error, warn};
use std::fmt;
use std::fs;
use std::path::Path;

pub mod accessor;
mod builder;
pub mod classifier;
pub mod properties;

pub use accessor::{AttrPath, FlowDocument};
pub use builder::{AssociationPolicy, parse_association, parse_location};
pub use classifier::TypeClassifier;
pub use properties::{NodeScope, PropertyExtractor};

use builder::{NodeBuilder, TerminalIndex};
use properties::{ExtractorRegistry, register_default_extractors};

/// The phases a parse moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParsePhase {
    Idle,
    DocumentLoaded,
    NodesExtracted,
    ConnectionsExtracted,
    CommentsExtracted,
    Done,
}

impl fmt::Display for ParsePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParsePhase::Idle => "idle",
            ParsePhase::DocumentLoaded => "document loaded",
            ParsePhase::NodesExtracted => "nodes extracted",
            ParsePhase::ConnectionsExtracted => "connections extracted",
            ParsePhase::CommentsExtracted => "comments extracted",
            ParsePhase::Done => "done",
        };
        f.write_str(label)
    }
}

/// How a parse ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseStatus {
    Done,
    /// `reached` is the last phase that completed; its output is kept in the report.
    Failed {
        reached: ParsePhase,
        error: FlowParseError,
    },
}

/// Everything one parse call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport {
    pub flow: MessageFlow,
    /// Malformed fields that were recovered from.
    pub warnings: Vec<MalformedFieldError>,
    pub status: ParseStatus,
}

impl ParseReport {
    pub fn is_success(&self) -> bool {
        self.status == ParseStatus::Done
    }

    pub fn error(&self) -> Option<&FlowParseError> {
        match &self.status {
            ParseStatus::Done => None,
            ParseStatus::Failed { error, .. } => Some(error),
        }
    }

    /// Drops warnings and partial output, keeping only a complete flow or the error.
    pub fn into_result(self) -> Result<MessageFlow, FlowParseError> {
        match self.status {
            ParseStatus::Done => Ok(self.flow),
            ParseStatus::Failed { error, .. } => Err(error),
        }
    }

    fn failed(
        flow: MessageFlow,
        warnings: Vec<MalformedFieldError>,
        reached: ParsePhase,
        error: FlowParseError,
    ) -> Self {
        error!("message flow parse failed after '{}': {}", reached, error);
        Self {
            flow,
            warnings,
            status: ParseStatus::Failed { reached, error },
        }
    }
}

/// Turns message flow documents into `MessageFlow` models.
pub struct FlowParser {
    classifier: TypeClassifier,
    registry: ExtractorRegistry,
    association_policy: AssociationPolicy,
    strict: bool,
}

pub struct FlowParserBuilder {
    classifier: TypeClassifier,
    registry: ExtractorRegistry,
    association_policy: AssociationPolicy,
    strict: bool,
}

impl Default for FlowParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowParserBuilder {
    pub fn new() -> Self {
        let mut registry = ExtractorRegistry::new();
        register_default_extractors(&mut registry);
        Self {
            classifier: TypeClassifier::new(),
            registry,
            association_policy: AssociationPolicy::default(),
            strict: false,
        }
    }

    /// Abort the whole parse on the first malformed field instead of recovering.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn association_policy(mut self, policy: AssociationPolicy) -> Self {
        self.association_policy = policy;
        self
    }

    /// Sorts nodes whose canonical tag is `tag` into `category`'s bucket.
    pub fn with_category_alias(mut self, tag: &str, category: NodeCategory) -> Self {
        self.classifier = self.classifier.with_alias(tag, category);
        self
    }

    /// Runs `extractor` on every node of `category`, after the default extractors.
    pub fn with_custom_extractor(
        mut self,
        category: NodeCategory,
        extractor: Box<dyn PropertyExtractor>,
    ) -> Self {
        self.registry.entry(category).or_default().push(extractor);
        self
    }

    pub fn build(self) -> FlowParser {
        FlowParser {
            classifier: self.classifier,
            registry: self.registry,
            association_policy: self.association_policy,
            strict: self.strict,
        }
    }
}

impl Default for FlowParser {
    fn default() -> Self {
        FlowParserBuilder::new().build()
    }
}

impl FlowParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> FlowParserBuilder {
        FlowParserBuilder::new()
    }

    /// Reads and parses a flow document from disk.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> ParseReport {
        let path = path.as_ref();
        debug!("parsing message flow '{}'", path.display());
        match fs::read_to_string(path) {
            Ok(text) => self.parse_str(&text),
            Err(e) => ParseReport::failed(
                MessageFlow::default(),
                Vec::new(),
                ParsePhase::Idle,
                FlowParseError::DocumentLoad {
                    path: path.display().to_string(),
                    message: e.to_string(),
                },
            ),
        }
    }

    /// Parses a flow document held in memory.
    pub fn parse_str(&self, xml: &str) -> ParseReport {
        let mut flow = MessageFlow::default();
        let mut warnings = Vec::new();

        let document = match FlowDocument::parse(xml) {
            Ok(document) => document,
            Err(e) => return ParseReport::failed(flow, warnings, ParsePhase::Idle, e),
        };

        let mut reached = ParsePhase::DocumentLoaded;
        match self.run_phases(&document, &mut flow, &mut warnings, &mut reached) {
            Ok(()) => {
                debug!("parsed message flow: {}", flow);
                ParseReport {
                    flow,
                    warnings,
                    status: ParseStatus::Done,
                }
            }
            Err(e) => ParseReport::failed(flow, warnings, reached, e),
        }
    }

    /// Runs the extraction phases in order. Each phase writes into `flow` only once it
    /// has completed, so a failing phase leaves no trace in the output.
    fn run_phases(
        &self,
        document: &FlowDocument<'_>,
        flow: &mut MessageFlow,
        warnings: &mut Vec<MalformedFieldError>,
        reached: &mut ParsePhase,
    ) -> Result<(), FlowParseError> {
        let mut recover = |e: FlowParseError| self.recover(e, warnings);

        let terminals = TerminalIndex::build(document);
        let node_builder = NodeBuilder::new(
            document,
            &self.classifier,
            &self.registry,
            &terminals,
            self.strict,
        );
        let nodes = document
            .elements("nodes")
            .map(|element| node_builder.build(element, &mut recover))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("extracted {} nodes", nodes.len());

        let mut names: AHashMap<String, String> = AHashMap::new();
        for node in nodes.iter().filter(|n| !n.id.is_empty()) {
            names
                .entry(node.id.clone())
                .or_insert_with(|| node.name.clone());
        }
        for node in nodes {
            flow.insert_node(node);
        }
        *reached = ParsePhase::NodesExtracted;

        flow.connections = builder::build_connections(document, &names)?;
        debug!("extracted {} connections", flow.connections.len());
        *reached = ParsePhase::ConnectionsExtracted;

        flow.comments = builder::build_comments(document, self.association_policy, &mut recover)?;
        debug!("extracted {} comment notes", flow.comments.len());
        *reached = ParsePhase::CommentsExtracted;

        flow.description = builder::build_description(document)?;
        *reached = ParsePhase::Done;
        Ok(())
    }

    fn recover(
        &self,
        error: FlowParseError,
        warnings: &mut Vec<MalformedFieldError>,
    ) -> Result<(), FlowParseError> {
        match error {
            FlowParseError::Malformed(field) if !self.strict => {
                warn!("{}", field);
                warnings.push(field);
                Ok(())
            }
            other => Err(other),
        }
    }
}
