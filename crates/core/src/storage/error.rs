use thiserror::Error;

/// Error code the backend reports when the caller lacks permission.
pub const ACCESS_DENIED: &str = "AccessDeniedException";

/// Error code the backend reports for malformed requests.
pub const VALIDATION: &str = "ValidationException";

/// Errors reported by the key-value store.
///
/// These are passed through the domain services unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An error returned by the backend service, with its error code.
    #[error("{code}: {message}")]
    Service { code: String, message: String },
    #[error("Conditional check failed")]
    ConditionalCheckFailed,
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns the backend error code, if the backend reported one.
    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::Service { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
