//! Constraints document loading and validation utilities

use std::path::Path;

use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::rules::{ConstraintIssue, RuleKey, TargetConstraints};

/// Serialization of a constraints document, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintsFormat {
    Json,
    Yaml,
    Toml,
}

impl ConstraintsFormat {
    /// `.yaml`/`.yml` and `.toml` are recognized; anything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ConstraintsFormat::Yaml,
            Some("toml") => ConstraintsFormat::Toml,
            _ => ConstraintsFormat::Json,
        }
    }
}

/// Result of linting a constraints document
#[derive(Debug, Clone)]
pub struct LintReport {
    /// Keys that will be validated, in report order
    pub rule_keys: Vec<RuleKey>,
    pub issues: Vec<ConstraintIssue>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Constraints document validator
pub struct ConstraintsValidator;

impl ConstraintsValidator {
    /// Load a constraints document. Any read or parse failure is an
    /// `InvalidConstraints` error.
    pub fn load(path: &Path) -> Result<TargetConstraints, DomainError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DomainError::InvalidConstraints(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let constraints = Self::parse(&text, ConstraintsFormat::from_path(path)).map_err(|e| {
            DomainError::InvalidConstraints(format!("{}: {}", path.display(), e))
        })?;
        debug!(
            rules = constraints.rules().len(),
            "Loaded constraints from {}",
            path.display()
        );
        Ok(constraints)
    }

    /// Parse document text in the given format
    pub fn parse(text: &str, format: ConstraintsFormat) -> Result<TargetConstraints, String> {
        match format {
            ConstraintsFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            ConstraintsFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            ConstraintsFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        }
    }

    /// Load and lint a constraints document
    pub fn lint_file(path: &Path) -> Result<LintReport, DomainError> {
        let constraints = Self::load(path)?;
        Ok(LintReport {
            rule_keys: constraints.rules().into_iter().map(|(key, _)| key).collect(),
            issues: constraints.lint(),
        })
    }

    /// Render a constraints document in the given format
    pub fn render(
        constraints: &TargetConstraints,
        format: ConstraintsFormat,
    ) -> Result<String, DomainError> {
        let rendered = match format {
            ConstraintsFormat::Json => {
                serde_json::to_string_pretty(constraints).map_err(|e| e.to_string())
            }
            ConstraintsFormat::Yaml => serde_yaml::to_string(constraints).map_err(|e| e.to_string()),
            ConstraintsFormat::Toml => {
                toml::to_string_pretty(constraints).map_err(|e| e.to_string())
            }
        };
        rendered.map_err(|e| DomainError::InternalError(format!("Cannot render constraints: {}", e)))
    }
}
