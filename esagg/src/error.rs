//! Error types for aggregation building and serialization

/// Errors raised while rendering an aggregation tree to JSON.
///
/// Structurally loose trees (missing fields, empty names, duplicate
/// siblings) are not errors; the engine rejects those at execution time.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Numeric parameter is not representable in JSON: {0}")]
    NonFiniteNumber(f64),

    #[error("Sub-query error: {0}")]
    SubQuery(String),
}

/// Result type for aggregation operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_message() {
        let err = Error::NonFiniteNumber(f64::INFINITY);
        assert_eq!(
            err.to_string(),
            "Numeric parameter is not representable in JSON: inf"
        );
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
