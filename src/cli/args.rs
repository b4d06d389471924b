//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::domain::model::HashAlgorithm;
use crate::output::OutputFormat;
use crate::probe::sampler::MIN_SAMPLE_FRAMES;

/// Upper bound accepted for `--sample-frames`
const MAX_SAMPLE_FRAMES: usize = 1_000_000;
/// Upper bound accepted for `--jobs`
const MAX_JOBS: usize = 256;

fn parse_sample_frames(s: &str) -> Result<usize, String> {
    clap_num::number_range(s, MIN_SAMPLE_FRAMES, MAX_SAMPLE_FRAMES)
}

fn parse_jobs(s: &str) -> Result<usize, String> {
    clap_num::number_range(s, 1, MAX_JOBS)
}

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Video files or directories to check
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Target constraints document (JSON, YAML or TOML); omit for profile-only mode
    #[arg(short, long, value_name = "FILE")]
    pub constraints: Option<PathBuf>,

    /// Content hash algorithm
    #[arg(long = "hash-algo", value_enum, value_name = "ALGO")]
    pub hash_algorithm: Option<HashAlgorithm>,

    /// Media profile output path (single input only)
    #[arg(long, value_name = "FILE")]
    pub media_out: Option<PathBuf>,

    /// Validation report output path (single input only)
    #[arg(long, value_name = "FILE")]
    pub report_out: Option<PathBuf>,

    /// Directory for output documents (default: next to each input)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Output document format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Indent JSON documents
    #[arg(long, conflicts_with = "compact")]
    pub pretty: bool,

    /// Write JSON documents on a single line
    #[arg(long)]
    pub compact: bool,

    /// Print only the console summary
    #[arg(long)]
    pub summary_only: bool,

    /// Maximum number of frames decoded for timing analysis
    #[arg(long, value_parser = parse_sample_frames, value_name = "N")]
    pub sample_frames: Option<usize>,

    /// Files checked in parallel
    #[arg(short, long, value_parser = parse_jobs, value_name = "N")]
    pub jobs: Option<usize>,
}

impl CheckArgs {
    /// `Some(true)` for --pretty, `Some(false)` for --compact
    pub fn pretty_override(&self) -> Option<bool> {
        match (self.pretty, self.compact) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Constraints document subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConstraintsCommand {
    /// Write the default constraints template
    Init(InitArgs),
    /// Load a constraints document and report problems
    Lint(LintArgs),
}

/// Arguments for `constraints init`
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Destination; the extension selects JSON, YAML or TOML
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Replace an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `constraints lint`
#[derive(Args, Debug, Clone)]
pub struct LintArgs {
    /// Constraints document to check
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}
