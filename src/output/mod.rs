//! Output document writing and console summaries

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub mod summary;
pub mod writer;

pub use summary::{render_profile_summary, render_report_summary};
pub use writer::ReportWriter;

/// Serialization used for the output documents
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(format!("Invalid output format: {}. Valid formats: json, yaml", other)),
        }
    }
}

/// Where the documents for one input file go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub media_profile: PathBuf,
    /// Absent in profile-only mode
    pub report: Option<PathBuf>,
}

impl OutputPaths {
    /// Default document paths: `<dir>/<filename>.mediaprofile.<ext>` and
    /// `<dir>/<filename>.validationreport.<ext>`, where `dir` is `out_dir`
    /// or the input's own directory.
    pub fn for_input(
        input: &Path,
        out_dir: Option<&Path>,
        format: OutputFormat,
        with_report: bool,
    ) -> Self {
        let dir = out_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));
        let base = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "media".to_string());

        Self {
            media_profile: dir.join(format!("{}.mediaprofile.{}", base, format.extension())),
            report: with_report
                .then(|| dir.join(format!("{}.validationreport.{}", base, format.extension()))),
        }
    }

    /// Replace defaults with explicitly requested paths
    pub fn with_overrides(mut self, media_out: Option<PathBuf>, report_out: Option<PathBuf>) -> Self {
        if let Some(media_out) = media_out {
            self.media_profile = media_out;
        }
        if let (Some(report_out), Some(report)) = (report_out, self.report.as_mut()) {
            *report = report_out;
        }
        self
    }
}
