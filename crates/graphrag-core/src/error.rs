//! Error types for GraphRAG Core

use thiserror::Error;

/// Result type alias using the GraphRAG Core error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types.
///
/// Classification itself never fails: a query that cannot be fingerprinted
/// canonically degrades to a fallback digest. Errors only surface while
/// building a [`Query`](crate::Query) or validating an
/// [`OptimizerConfig`](crate::OptimizerConfig).
#[derive(Error, Debug)]
pub enum Error {
    /// Input could not be turned into a query mapping
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Optimizer configuration was rejected
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid query error
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let err = Error::invalid_query("not an object");
        assert!(matches!(err, Error::InvalidQuery(_)));
        assert_eq!(err.to_string(), "Invalid query: not an object");

        let err = Error::config("zero size");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
