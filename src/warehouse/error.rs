//! Error types for warehouse operations.

/// Result type for warehouse operations
pub type WarehouseResult<T> = Result<T, WarehouseError>;

/// Error type for warehouse operations.
///
/// The HTTP layer maps these onto the two externally visible failure shapes:
/// query failures carry the raw backend message through verbatim, everything
/// else collapses into the structured "connection failed" response.
#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    /// Connection, pool, or authentication errors.
    /// These are typically transient, but nothing retries automatically.
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// SQL query execution errors, carrying the raw backend message.
    #[error("Query error: {message}")]
    Query { message: String },

    /// A connect or query exceeded its configured deadline.
    #[error("Timeout error: {message}")]
    Timeout { message: String },

    /// Configuration or initialization error.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl WarehouseError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether a retry of the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }

    /// The underlying message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Connection { message }
            | Self::Query { message }
            | Self::Timeout { message }
            | Self::Configuration { message } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(WarehouseError::connection("down").is_retryable());
        assert!(WarehouseError::timeout("slow").is_retryable());
        assert!(!WarehouseError::query("syntax error").is_retryable());
        assert!(!WarehouseError::configuration("missing var").is_retryable());
    }

    #[test]
    fn test_message_accessor() {
        let err = WarehouseError::query("relation \"heart\" does not exist");
        assert_eq!(err.message(), "relation \"heart\" does not exist");
        assert_eq!(
            err.to_string(),
            "Query error: relation \"heart\" does not exist"
        );
    }
}
