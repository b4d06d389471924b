//! Common utilities and helpers

pub mod logging;
pub mod path;

pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use path::{expand_inputs, has_video_extension};
