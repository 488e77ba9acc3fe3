use serde::Serialize;
use thiserror::Error;

/// Fatal errors raised while loading or compiling a form configuration.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("form configuration has no pages")]
    NoPages,
    #[error("failed to parse form configuration: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Why a page-level field reference could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("field '{0}' is not defined")]
    UnknownField(String),
    #[error("inline field definition has no name")]
    MissingInlineName,
    #[error("malformed field reference: {0}")]
    MalformedReference(String),
}

/// Non-fatal anomaly recorded while compiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    UnresolvedReference {
        page: String,
        reference: Option<String>,
        message: String,
    },
    InvalidPattern {
        field: String,
        pattern: String,
        message: String,
    },
}
