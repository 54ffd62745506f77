//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the msgflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use msgflow::prelude::*;
//!
//! let report = FlowParser::new().parse_file("path/to/Main.msgflow");
//! if let Some(error) = report.error() {
//!     eprintln!("parse failed: {}", error);
//! }
//! println!("{} nodes", report.flow.node_count());
//! ```

// Parsing
pub use crate::parser::{
    AssociationPolicy, FlowParser, FlowParserBuilder, NodeScope, ParsePhase, ParseReport,
    ParseStatus, PropertyExtractor,
};

// Model
pub use crate::model::{
    CommentNote, Connection, FlowDescription, MessageFlow, Node, NodeCategory, NodeConfig,
    NodeOrigin, PropertyBag, PropertyValue,
};

// Error types
pub use crate::error::{ArtifactError, FlowParseError, MalformedFieldError, QueryError};
