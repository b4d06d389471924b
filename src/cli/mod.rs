//! CLI module for MediaCheck
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

pub use args::{CheckArgs, ConstraintsCommand, InitArgs, LintArgs};

/// MediaCheck
///
/// Measures video files by decoding them and validates the measurements
/// against a target constraints document.
#[derive(Parser, Debug)]
#[command(name = "mediacheck")]
#[command(about = "MediaCheck - Measure video files and validate them against target constraints")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level or filter directive
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Settings file (default: ./mediacheck.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Measure video files and validate them against constraints
    Check(CheckArgs),
    /// Create or check constraints documents
    #[command(subcommand)]
    Constraints(ConstraintsCommand),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::try_parse_from([
            "mediacheck",
            "check",
            "a.mp4",
            "b.mov",
            "--constraints",
            "target.json",
            "--hash-algo",
            "md5",
            "--format",
            "yaml",
            "--sample-frames",
            "50",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.inputs.len(), 2);
                assert_eq!(args.constraints, Some(PathBuf::from("target.json")));
                assert_eq!(
                    args.hash_algorithm,
                    Some(crate::domain::model::HashAlgorithm::Md5)
                );
                assert_eq!(args.format, Some(crate::output::OutputFormat::Yaml));
                assert_eq!(args.sample_frames, Some(50));
                assert_eq!(args.pretty_override(), None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_sample_frames_lower_bound() {
        let result = Cli::try_parse_from(["mediacheck", "check", "a.mp4", "--sample-frames", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_pretty_and_compact_conflict() {
        let result = Cli::try_parse_from(["mediacheck", "check", "a.mp4", "--pretty", "--compact"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["mediacheck", "check", "a.mp4", "--compact"]).unwrap();
        match cli.command {
            Commands::Check(args) => assert_eq!(args.pretty_override(), Some(false)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_constraints_subcommands() {
        let cli =
            Cli::try_parse_from(["mediacheck", "constraints", "init", "t.yaml", "--force"]).unwrap();
        match cli.command {
            Commands::Constraints(ConstraintsCommand::Init(args)) => {
                assert_eq!(args.file, PathBuf::from("t.yaml"));
                assert!(args.force);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["mediacheck", "constraints", "lint", "t.json"]).is_ok());
    }

    #[test]
    fn test_check_requires_input() {
        assert!(Cli::try_parse_from(["mediacheck", "check"]).is_err());
    }
}
