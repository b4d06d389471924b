// Adapters - External system implementations

pub mod probe_libav;
pub mod toml_config;

// Re-export adapters
pub use probe_libav::ProbeLibavAdapter;
pub use toml_config::{AppConfig, TomlConfigAdapter};
