// Check interactor - Orchestrates the measure-validate-report use case

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::domain::model::MediaProfile;
use crate::domain::rules::{TargetConstraints, ValidationEngine, ValidationReport};
use crate::error::{MediaCheckError, MediaCheckResult};
use crate::output::{OutputPaths, ReportWriter};
use crate::probe::MediaInspector;

/// One file to check
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub input: PathBuf,
    /// Absent in profile-only mode
    pub constraints: Option<Arc<TargetConstraints>>,
    pub paths: OutputPaths,
}

/// Result of checking one file whose documents were written
#[derive(Debug, Clone)]
pub struct CheckResponse {
    pub input: PathBuf,
    pub profile: MediaProfile,
    pub report: Option<ValidationReport>,
    pub paths: OutputPaths,
    /// Rendered primary document: the report, or the profile when no
    /// constraints were given
    pub document: String,
}

impl CheckResponse {
    /// Validation passed, or no constraints were given and the file could
    /// be measured
    pub fn passed(&self) -> bool {
        match &self.report {
            Some(report) => report.status().is_pass(),
            None => self.profile.readable,
        }
    }

    pub fn outcome(&self) -> CheckOutcome {
        if self.passed() {
            CheckOutcome::Passed
        } else {
            CheckOutcome::Failed
        }
    }
}

/// Per-file outcome, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckOutcome {
    Passed,
    /// Validation failed or the file could not be measured
    Failed,
    /// Fatal error for the file; no documents were written
    Error,
}

impl CheckOutcome {
    pub fn exit_code(self) -> u8 {
        match self {
            CheckOutcome::Passed => 0,
            CheckOutcome::Failed => 2,
            CheckOutcome::Error => 1,
        }
    }
}

/// Outcome of one entry of a batch
#[derive(Debug)]
pub struct BatchItem {
    pub input: PathBuf,
    pub result: MediaCheckResult<CheckResponse>,
}

impl BatchItem {
    pub fn outcome(&self) -> CheckOutcome {
        match &self.result {
            Ok(response) => response.outcome(),
            Err(_) => CheckOutcome::Error,
        }
    }
}

/// Interactor for the check use case
pub struct CheckInteractor {
    inspector: MediaInspector,
    writer: ReportWriter,
}

impl CheckInteractor {
    /// Create new check interactor
    pub fn new(inspector: MediaInspector, writer: ReportWriter) -> Self {
        Self { inspector, writer }
    }

    pub fn writer(&self) -> ReportWriter {
        self.writer
    }

    /// Run the pipeline for one file and write its documents.
    ///
    /// A missing or unreadable input is returned as an error and nothing is
    /// written for it. Any other outcome, including an undecodable file,
    /// produces both documents.
    pub fn execute(&self, request: CheckRequest) -> MediaCheckResult<CheckResponse> {
        let CheckRequest {
            input,
            constraints,
            paths,
        } = request;

        let profile = self.inspector.inspect(&input)?;

        let report = constraints.as_deref().map(|constraints| {
            let section = ValidationEngine::validate(&profile, constraints);
            ValidationReport::new(profile.clone(), section)
        });

        self.writer.write(&paths.media_profile, &profile)?;
        if let (Some(report), Some(report_path)) = (&report, &paths.report) {
            self.writer.write(report_path, report)?;
        }

        let document = match &report {
            Some(report) => self.writer.render(report)?,
            None => self.writer.render(&profile)?,
        };

        match &report {
            Some(report) => info!(
                file = %input.display(),
                status = ?report.status(),
                failed = report.validation.details.failed_count(),
                evaluated = report.validation.details.len(),
                "Validation finished"
            ),
            None => info!(
                file = %input.display(),
                readable = profile.readable,
                "Profile written"
            ),
        }

        Ok(CheckResponse {
            input,
            profile,
            report,
            paths,
            document,
        })
    }

    /// Run several files, at most `jobs` at a time. Each file runs on a
    /// blocking worker with its own decoder handle. Results come back in
    /// request order.
    pub async fn execute_batch(
        self: &Arc<Self>,
        requests: Vec<CheckRequest>,
        jobs: usize,
    ) -> Vec<BatchItem> {
        let jobs = jobs.max(1);
        debug!(files = requests.len(), jobs, "Starting batch");
        let semaphore = Arc::new(Semaphore::new(jobs));

        let mut handles = Vec::with_capacity(requests.len());
        for request in requests {
            let input = request.input.clone();
            let interactor = Arc::clone(self);
            let semaphore = Arc::clone(&semaphore);

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return Err(MediaCheckError::Internal {
                            message: format!("Worker pool closed: {}", e),
                        })
                    }
                };
                match tokio::task::spawn_blocking(move || interactor.execute(request)).await {
                    Ok(result) => result,
                    Err(e) => Err(MediaCheckError::Internal {
                        message: format!("Check worker failed: {}", e),
                    }),
                }
            });
            handles.push((input, handle));
        }

        let mut items = Vec::with_capacity(handles.len());
        for (input, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(MediaCheckError::Internal {
                    message: format!("Check task failed: {}", e),
                }),
            };
            if let Err(e) = &result {
                warn!("{}: {}", input.display(), e);
            }
            items.push(BatchItem { input, result });
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_outcome_wins() {
        let outcomes = [CheckOutcome::Passed, CheckOutcome::Error, CheckOutcome::Failed];
        let worst = outcomes.iter().copied().max().unwrap();
        assert_eq!(worst, CheckOutcome::Error);
        assert_eq!(worst.exit_code(), 1);
        assert_eq!(CheckOutcome::Failed.exit_code(), 2);
        assert_eq!(CheckOutcome::Passed.exit_code(), 0);
    }
}
