//! Output document writer implementation

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{MediaCheckError, MediaCheckResult};
use crate::output::OutputFormat;

/// Serializes documents and writes them atomically
#[derive(Debug, Clone, Copy)]
pub struct ReportWriter {
    format: OutputFormat,
    pretty: bool,
}

impl ReportWriter {
    pub fn new(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Serialize a document to text, ending with a newline
    pub fn render<T: Serialize>(&self, document: &T) -> MediaCheckResult<String> {
        let mut text = match (self.format, self.pretty) {
            (OutputFormat::Json, true) => serde_json::to_string_pretty(document)
                .map_err(|e| Self::render_error(e.to_string()))?,
            (OutputFormat::Json, false) => {
                serde_json::to_string(document).map_err(|e| Self::render_error(e.to_string()))?
            }
            (OutputFormat::Yaml, _) => {
                serde_yaml::to_string(document).map_err(|e| Self::render_error(e.to_string()))?
            }
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }

    /// Write a document. The target is replaced only once the full content
    /// is on disk, so readers never observe a partial document.
    pub fn write<T: Serialize>(&self, path: &Path, document: &T) -> MediaCheckResult<()> {
        let text = self.render(document)?;
        write_atomic(path, text.as_bytes())?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    fn render_error(message: String) -> MediaCheckError {
        MediaCheckError::OutputError {
            message: format!("Cannot serialize document: {}", message),
        }
    }
}

/// Write bytes to `path` through a temporary file in the same directory
pub fn write_atomic(path: &Path, contents: &[u8]) -> MediaCheckResult<()> {
    let output_error = |action: &str, e: &dyn std::fmt::Display| MediaCheckError::OutputError {
        message: format!("{} {}: {}", action, path.display(), e),
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => std::env::current_dir().map_err(|e| output_error("Cannot resolve directory of", &e))?,
    };
    std::fs::create_dir_all(&dir).map_err(|e| output_error("Cannot create directory for", &e))?;

    let mut temp = NamedTempFile::new_in(&dir).map_err(|e| output_error("Cannot stage", &e))?;
    temp.write_all(contents)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| output_error("Cannot write", &e))?;
    temp.persist(path)
        .map_err(|e| output_error("Cannot replace", &e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_json_compact_and_pretty() {
        let document = json!({"filename": "a.mp4", "readable": true});

        let compact = ReportWriter::new(OutputFormat::Json, false).render(&document).unwrap();
        assert_eq!(compact, "{\"filename\":\"a.mp4\",\"readable\":true}\n");

        let pretty = ReportWriter::new(OutputFormat::Json, true).render(&document).unwrap();
        assert!(pretty.contains("\n  \"filename\": \"a.mp4\""));
    }

    #[test]
    fn test_render_yaml() {
        let document = json!({"bit_depth": 8, "duration_s": null});
        let yaml = ReportWriter::new(OutputFormat::Yaml, false).render(&document).unwrap();
        assert!(yaml.contains("bit_depth: 8"));
        assert!(yaml.contains("duration_s: null"));
    }

    #[test]
    fn test_write_creates_directories_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        let writer = ReportWriter::new(OutputFormat::Json, false);

        writer.write(&path, &json!({"n": 1})).unwrap();
        writer.write(&path, &json!({"n": 2})).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"n\":2}\n");
        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
