//! Error types for condsql.

use thiserror::Error;

/// The main error type for condsql operations.
///
/// The first four variants are compile errors: they describe a malformed
/// input tree, never a transient failure, and must not be retried.
#[derive(Debug, Error)]
pub enum CondError {
    /// Insert payload is not a non-empty AND of EQ nodes.
    #[error("Malformed insert payload: {0}")]
    MalformedInsertPayload(String),

    /// Update payload is neither an EQ node nor a non-empty AND of EQ nodes.
    #[error("Malformed update payload: {0}")]
    MalformedUpdatePayload(String),

    /// Exec payload is not a RAW node of the kind the dialect expects.
    #[error("Malformed exec payload: {0}")]
    MalformedExecPayload(String),

    /// Operation name not understood by the compiler.
    #[error("Unsupported operation: '{0}'. Expected: insert, query, update, delete, or exec")]
    UnsupportedOperation(String),

    /// Dialect name not understood.
    #[error("Unknown dialect: '{0}'. Expected: sqlite, mysql, postgres, or document")]
    UnknownDialect(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CondError {
    pub fn insert(message: impl Into<String>) -> Self {
        Self::MalformedInsertPayload(message.into())
    }

    pub fn update(message: impl Into<String>) -> Self {
        Self::MalformedUpdatePayload(message.into())
    }

    pub fn exec(message: impl Into<String>) -> Self {
        Self::MalformedExecPayload(message.into())
    }

    /// True for errors caused by a malformed tree or operation.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedInsertPayload(_)
                | Self::MalformedUpdatePayload(_)
                | Self::MalformedExecPayload(_)
                | Self::UnsupportedOperation(_)
        )
    }
}

/// Result type alias for condsql operations.
pub type CondResult<T> = Result<T, CondError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CondError::insert("expected AND node");
        assert_eq!(
            err.to_string(),
            "Malformed insert payload: expected AND node"
        );
    }

    #[test]
    fn test_compile_error_classification() {
        assert!(CondError::update("empty").is_compile_error());
        assert!(CondError::UnsupportedOperation("merge".into()).is_compile_error());
        assert!(!CondError::Config("bad".into()).is_compile_error());
    }
}
