//! Configuration initialization and hierarchy management

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::info;

use crate::adapters::toml_config::{AppConfig, TomlConfigAdapter};
use crate::cli::{Cli, Commands};
use crate::domain::model::HashAlgorithm;
use crate::domain::pixel_format::PixelFormatInfo;
use crate::error::{MediaCheckError, MediaCheckResult};
use crate::output::OutputFormat;
use crate::probe::sampler::{DEFAULT_SAMPLE_FRAMES, MIN_SAMPLE_FRAMES};
use crate::utils::logging::{LogFormat, LoggingConfig};

pub const ENV_CONFIG: &str = "MEDIACHECK_CONFIG";
pub const ENV_HASH_ALGORITHM: &str = "MEDIACHECK_HASH_ALGORITHM";
pub const ENV_SAMPLE_FRAMES: &str = "MEDIACHECK_SAMPLE_FRAMES";
pub const ENV_OUTPUT_FORMAT: &str = "MEDIACHECK_OUTPUT_FORMAT";
pub const ENV_PRETTY: &str = "MEDIACHECK_PRETTY";
pub const ENV_JOBS: &str = "MEDIACHECK_JOBS";
pub const ENV_OUT_DIR: &str = "MEDIACHECK_OUT_DIR";
pub const ENV_LOG_LEVEL: &str = "MEDIACHECK_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "MEDIACHECK_LOG_FORMAT";

/// Effective settings for the check pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSettings {
    pub hash_algorithm: HashAlgorithm,
    pub sample_frames: usize,
    pub output_format: OutputFormat,
    pub pretty: bool,
    pub jobs: usize,
    pub out_dir: Option<PathBuf>,
    pub pixel_formats: HashMap<String, PixelFormatInfo>,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::default(),
            sample_frames: DEFAULT_SAMPLE_FRAMES,
            output_format: OutputFormat::default(),
            pretty: true,
            jobs: num_cpus::get(),
            out_dir: None,
            pixel_formats: HashMap::new(),
        }
    }
}

/// Effective settings after applying CLI > Env > File > Defaults
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub check: CheckSettings,
    pub logging: LoggingConfig,
    /// Settings file that contributed, if any
    pub config_source: Option<PathBuf>,
}

/// Resolve settings from the process environment
pub fn initialize_configuration_hierarchy(cli: &Cli) -> MediaCheckResult<Settings> {
    resolve_settings(cli, |key| std::env::var(key).ok())
}

/// Resolve settings with an explicit environment lookup
pub fn resolve_settings<F>(cli: &Cli, env: F) -> MediaCheckResult<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    // File
    let config_path = cli
        .config
        .clone()
        .or_else(|| env(ENV_CONFIG).map(PathBuf::from));
    let adapter = TomlConfigAdapter::discover(config_path.as_deref()).map_err(|e| {
        MediaCheckError::SettingsError {
            message: e.to_string(),
        }
    })?;
    let config_source = adapter.source().map(|path| path.to_path_buf());
    let AppConfig {
        check: file_check,
        logging: file_logging,
        pixel_formats,
    } = adapter.into_config();

    // Environment
    let env_hash = env_value::<HashAlgorithm, _>(&env, ENV_HASH_ALGORITHM)?;
    let env_sample_frames = env_value::<usize, _>(&env, ENV_SAMPLE_FRAMES)?;
    let env_format = env_value::<OutputFormat, _>(&env, ENV_OUTPUT_FORMAT)?;
    let env_pretty = match env(ENV_PRETTY) {
        Some(raw) => Some(parse_bool(&raw).ok_or_else(|| invalid_value(ENV_PRETTY, &raw))?),
        None => None,
    };
    let env_jobs = env_value::<usize, _>(&env, ENV_JOBS)?;
    let env_out_dir = env(ENV_OUT_DIR).map(PathBuf::from);
    let env_log_level = env(ENV_LOG_LEVEL);
    let env_log_format = env_value::<LogFormat, _>(&env, ENV_LOG_FORMAT)?;

    // CLI
    let check_args = match &cli.command {
        Commands::Check(args) => Some(args),
        _ => None,
    };
    let defaults = CheckSettings::default();

    let check = CheckSettings {
        hash_algorithm: check_args
            .and_then(|args| args.hash_algorithm)
            .or(env_hash)
            .or(file_check.hash_algorithm)
            .unwrap_or(defaults.hash_algorithm),
        sample_frames: check_args
            .and_then(|args| args.sample_frames)
            .or(env_sample_frames)
            .or(file_check.sample_frames)
            .unwrap_or(defaults.sample_frames),
        output_format: check_args
            .and_then(|args| args.format)
            .or(env_format)
            .or(file_check.output_format)
            .unwrap_or(defaults.output_format),
        pretty: check_args
            .and_then(|args| args.pretty_override())
            .or(env_pretty)
            .or(file_check.pretty)
            .unwrap_or(defaults.pretty),
        jobs: check_args
            .and_then(|args| args.jobs)
            .or(env_jobs)
            .or(file_check.jobs)
            .unwrap_or(defaults.jobs),
        out_dir: check_args
            .and_then(|args| args.out_dir.clone())
            .or(env_out_dir)
            .or(file_check.out_dir),
        pixel_formats,
    };

    if check.sample_frames < MIN_SAMPLE_FRAMES {
        return Err(MediaCheckError::SettingsError {
            message: format!(
                "sample_frames must be at least {}, got {}",
                MIN_SAMPLE_FRAMES, check.sample_frames
            ),
        });
    }
    if check.jobs == 0 {
        return Err(MediaCheckError::SettingsError {
            message: "jobs must be at least 1".to_string(),
        });
    }

    let logging = LoggingConfig {
        level: cli
            .log_level
            .clone()
            .or(env_log_level)
            .or(file_logging.level)
            .unwrap_or_else(|| LoggingConfig::default().level),
        format: cli
            .log_format
            .or(env_log_format)
            .or(file_logging.format)
            .unwrap_or_default(),
    };

    Ok(Settings {
        check,
        logging,
        config_source,
    })
}

/// Log where the effective settings came from; call once logging is up
pub fn log_settings(settings: &Settings) {
    match &settings.config_source {
        Some(path) => info!("Loaded configuration from: {}", path.display()),
        None => info!("No configuration file loaded"),
    }
    info!(
        hash = %settings.check.hash_algorithm,
        sample_frames = settings.check.sample_frames,
        format = %settings.check.output_format,
        jobs = settings.check.jobs,
        "Configuration hierarchy initialized"
    );
}

fn env_value<T, F>(env: &F, key: &str) -> MediaCheckResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid_value(key, &raw)),
        None => Ok(None),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid_value(key: &str, raw: &str) -> MediaCheckError {
    MediaCheckError::SettingsError {
        message: format!("Invalid value for {}: '{}'", key, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["mediacheck"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn settings_file(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let (_dir, path) = settings_file("");
        let path = path.to_string_lossy().into_owned();
        let settings = resolve_settings(&cli(&["--config", &path, "check", "a.mp4"]), env_from(&[])).unwrap();

        assert_eq!(settings.check.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(settings.check.sample_frames, DEFAULT_SAMPLE_FRAMES);
        assert_eq!(settings.check.output_format, OutputFormat::Json);
        assert!(settings.check.pretty);
        assert!(settings.check.jobs >= 1);
        assert_eq!(settings.logging, LoggingConfig::default());
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let (_dir, path) = settings_file(
            "[check]\nhash_algorithm = \"md5\"\nsample_frames = 100\njobs = 3\n\n[logging]\nlevel = \"warn\"\n",
        );
        let path = path.to_string_lossy().into_owned();
        let env = env_from(&[(ENV_SAMPLE_FRAMES, "200"), (ENV_JOBS, "5")]);

        let settings = resolve_settings(
            &cli(&["--config", &path, "check", "a.mp4", "--jobs", "7"]),
            env,
        )
        .unwrap();

        assert_eq!(settings.check.hash_algorithm, HashAlgorithm::Md5);
        assert_eq!(settings.check.sample_frames, 200);
        assert_eq!(settings.check.jobs, 7);
        assert_eq!(settings.logging.level, "warn");
        assert_eq!(settings.config_source, Some(PathBuf::from(&path)));
    }

    #[test]
    fn test_config_path_from_env() {
        let (_dir, path) = settings_file("[check]\noutput_format = \"yaml\"\npretty = false\n");
        let env = env_from(&[(ENV_CONFIG, path.to_str().unwrap())]);

        let settings = resolve_settings(&cli(&["check", "a.mp4"]), env).unwrap();
        assert_eq!(settings.check.output_format, OutputFormat::Yaml);
        assert!(!settings.check.pretty);
    }

    #[test]
    fn test_invalid_env_value_rejected() {
        let (_dir, path) = settings_file("");
        let path = path.to_string_lossy().into_owned();
        let env = env_from(&[(ENV_HASH_ALGORITHM, "crc32")]);

        let result = resolve_settings(&cli(&["--config", &path, "check", "a.mp4"]), env);
        assert!(matches!(result, Err(MediaCheckError::SettingsError { .. })));
    }

    #[test]
    fn test_file_sample_frames_below_minimum_rejected() {
        let (_dir, path) = settings_file("[check]\nsample_frames = 1\n");
        let path = path.to_string_lossy().into_owned();

        let result = resolve_settings(&cli(&["--config", &path, "check", "a.mp4"]), env_from(&[]));
        assert!(matches!(result, Err(MediaCheckError::SettingsError { .. })));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = resolve_settings(
            &cli(&["--config", "/nonexistent/mediacheck.toml", "check", "a.mp4"]),
            env_from(&[]),
        );
        assert!(matches!(result, Err(MediaCheckError::SettingsError { .. })));
    }

    #[test]
    fn test_pixel_formats_from_file() {
        let (_dir, path) = settings_file("[pixel_formats.custom10]\ncolor_space = \"YUV\"\nbit_depth = 10\n");
        let path = path.to_string_lossy().into_owned();

        let settings =
            resolve_settings(&cli(&["--config", &path, "constraints", "lint", "c.json"]), env_from(&[]))
                .unwrap();
        assert_eq!(settings.check.pixel_formats["custom10"].bit_depth, 10);
    }
}
