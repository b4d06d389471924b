// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File missing or unreadable
    FileUnreadable(String),
    /// Container could not be opened or has no decodable video stream
    DecodeFail(String),
    /// Constraints document malformed or unreadable
    InvalidConstraints(String),
    /// Internal error
    InternalError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileUnreadable(msg) => write!(f, "File unreadable: {}", msg),
            DomainError::DecodeFail(msg) => write!(f, "Decode failed: {}", msg),
            DomainError::InvalidConstraints(msg) => write!(f, "Invalid constraints: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
