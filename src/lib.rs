//! MediaCheck Library
//!
//! Measures video files by decoding them (content hash, container, resolution,
//! frame timing, color space, bit depth, duration) and validates the resulting
//! media profile against a target constraints document.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod output;
pub mod ports;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{HashAlgorithm, MediaProfile, Measurement};
pub use domain::rules::{TargetConstraints, ValidationReport, ValidationStatus};
pub use error::{MediaCheckError, MediaCheckResult};
