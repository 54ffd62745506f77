use thiserror::Error;

/// Errors that abort a flow parse.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowParseError {
    #[error("Failed to load flow document '{path}': {message}")]
    DocumentLoad { path: String, message: String },

    #[error("Flow document is not well-formed XML: {0}")]
    MalformedDocument(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Malformed field in strict mode: {0}")]
    Malformed(#[from] MalformedFieldError),
}

/// An attribute path pattern that could not be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid attribute path '{path}': {message}")]
pub struct QueryError {
    pub path: String,
    pub message: String,
}

impl QueryError {
    pub(crate) fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

/// A single element carried a value the parser could not interpret.
///
/// Outside strict mode these are recovered per element and reported as warnings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedFieldError {
    #[error(
        "Node '{node_id}' has a '{key}' value without the expected '#' and '.Main' markers: '{value}'"
    )]
    MissingExpressionMarker {
        node_id: String,
        key: String,
        value: String,
    },

    #[error("Comment note location '{location}' is not of the form '<int>,<int>'")]
    InvalidLocation { location: String },
}

/// Errors raised while saving or loading a parsed flow artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Could not access artifact file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact encoding failed: {0}")]
    Encode(String),

    #[error("Artifact decoding failed: {0}")]
    Decode(String),
}
