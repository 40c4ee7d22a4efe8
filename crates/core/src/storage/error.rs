use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Request throttled: {0}")]
    Throttled(String),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl RepositoryError {
    /// Whether the same request may succeed if sent again unchanged.
    ///
    /// Nothing in this crate retries; the flag is for callers that do.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Throttled(_) | Self::ConnectionFailed(_))
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_table_not_found_display() {
        let error = RepositoryError::TableNotFound("dev-orders".to_string());
        assert_eq!(error.to_string(), "Table not found: dev-orders");
    }

    #[test]
    fn test_repository_error_throttled_display() {
        let error = RepositoryError::Throttled("Throughput exceeded".to_string());
        assert_eq!(error.to_string(), "Request throttled: Throughput exceeded");
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("timeout after 30s".to_string());
        assert_eq!(error.to_string(), "Connection failed: timeout after 30s");
    }

    #[test]
    fn test_repository_error_query_failed_display() {
        let error = RepositoryError::QueryFailed("invalid partition key".to_string());
        assert_eq!(error.to_string(), "Query failed: invalid partition key");
    }

    #[test]
    fn test_repository_error_serialization_display() {
        let error = RepositoryError::Serialization("missing required field".to_string());
        assert_eq!(
            error.to_string(),
            "Serialization error: missing required field"
        );
    }

    #[test]
    fn test_repository_error_invalid_key_display() {
        let error = RepositoryError::InvalidKey("range key required".to_string());
        assert_eq!(error.to_string(), "Invalid key: range key required");
    }

    #[test]
    fn test_retryable_variants() {
        assert!(RepositoryError::Throttled(String::new()).is_retryable());
        assert!(RepositoryError::ConnectionFailed(String::new()).is_retryable());
        assert!(!RepositoryError::QueryFailed(String::new()).is_retryable());
        assert!(!RepositoryError::InvalidExpression(String::new()).is_retryable());
    }
}
