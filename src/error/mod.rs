//! Error handling module for MediaCheck

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for MediaCheck operations
#[derive(Error, Debug)]
pub enum MediaCheckError {
    /// Input file missing or unreadable; no documents are written for it
    #[error("Input file unreadable: {message}")]
    InputUnreadable { message: String },

    /// Container could not be decoded
    #[error("Failed to decode media file: {message}")]
    DecodeError { message: String },

    /// Constraints document malformed or unreadable
    #[error("Invalid constraints document: {message}")]
    ConfigError { message: String },

    /// Application settings file invalid
    #[error("Invalid settings: {message}")]
    SettingsError { message: String },

    /// Invalid combination of arguments
    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Output document write error
    #[error("Failed to write output file: {message}")]
    OutputError { message: String },

    /// FFmpeg initialization error
    #[error("Failed to initialize FFmpeg: {message}")]
    FFmpegInitError { message: String },

    /// Unexpected internal failure
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<DomainError> for MediaCheckError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::FileUnreadable(message) => MediaCheckError::InputUnreadable { message },
            DomainError::DecodeFail(message) => MediaCheckError::DecodeError { message },
            DomainError::InvalidConstraints(message) => MediaCheckError::ConfigError { message },
            DomainError::BadArgs(message) => MediaCheckError::InvalidArguments { message },
            DomainError::InternalError(message) => MediaCheckError::Internal { message },
        }
    }
}

/// Result type alias for MediaCheck operations
pub type MediaCheckResult<T> = std::result::Result<T, MediaCheckError>;
