//! # msgflow - Message Flow Model Parser
//!
//! **msgflow** reads message flow definition documents (the XML serialization of a
//! visual integration-flow diagram) and turns them into a strongly-typed graph model:
//! categorized processing nodes, the connections between their terminals, and the
//! comment notes placed on the canvas. Rule checks and reports work on that model
//! alone and never touch the XML.
//!
//! ## Core Workflow
//!
//! 1.  **Configure**: Use `FlowParser::builder()` to pick strict or recovering mode, how
//!     empty comment associations are represented, and any extra category aliases or
//!     property extractors.
//! 2.  **Parse**: Call `parse_file` or `parse_str`. Every call returns a `ParseReport`
//!     holding the `MessageFlow`, the malformed fields that were recovered from, and
//!     whether the parse completed.
//! 3.  **Inspect**: Query the `MessageFlow` by category (`nodes`), by id (`node`), or
//!     walk its `connections` and `comments`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use msgflow::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let parser = FlowParser::builder().strict(false).build();
//!     let report = parser.parse_file("flows/Order.msgflow");
//!
//!     for warning in &report.warnings {
//!         eprintln!("warning: {}", warning);
//!     }
//!
//!     let flow = report.into_result()?;
//!     for node in flow.nodes(NodeCategory::Compute) {
//!         println!(
//!             "{} runs module {}",
//!             node.name,
//!             node.text_property("computeExpression").unwrap_or_default()
//!         );
//!     }
//!     println!("{}", flow);
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! The crate logs through the `log` facade: `debug!` per phase and per node, `warn!`
//! for every recovered field, `error!` for a failed parse. It never installs a logger.

pub mod error;
pub mod model;
pub mod parser;
pub mod prelude;
