//! Command implementations

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::app::{AppContainer, CheckOutcome, CheckRequest, CheckResponse, DefaultAppContainer};
use crate::cli::args::{CheckArgs, ConstraintsCommand, InitArgs, LintArgs};
use crate::config_initialization::Settings;
use crate::domain::rules::TargetConstraints;
use crate::error::MediaCheckError;
use crate::output::writer::write_atomic;
use crate::output::{render_profile_summary, render_report_summary, OutputPaths};
use crate::probe::{ConstraintsFormat, ConstraintsValidator};
use crate::utils::path::expand_inputs;

/// Execute the check command and return the worst per-file outcome
pub async fn check(args: CheckArgs, settings: &Settings) -> Result<CheckOutcome> {
    info!("Starting check operation");

    let inputs = expand_inputs(&args.inputs);
    if inputs.is_empty() {
        return Err(MediaCheckError::InvalidArguments {
            message: "No video files found in the given inputs".to_string(),
        }
        .into());
    }
    if inputs.len() > 1 && (args.media_out.is_some() || args.report_out.is_some()) {
        return Err(MediaCheckError::InvalidArguments {
            message: "--media-out and --report-out require exactly one input file".to_string(),
        }
        .into());
    }

    let constraints: Option<Arc<TargetConstraints>> = match &args.constraints {
        Some(path) => {
            let constraints = ConstraintsValidator::load(path)
                .map_err(MediaCheckError::from)
                .context("Failed to load constraints document")?;
            for issue in constraints.lint() {
                warn!("Constraints {}: {}", path.display(), issue);
            }
            Some(Arc::new(constraints))
        }
        None => {
            info!("No constraints given, writing media profiles only");
            None
        }
    };

    let check_settings = &settings.check;
    let container = DefaultAppContainer::new(check_settings)?;
    let interactor = container.check_interactor();

    let requests: Vec<CheckRequest> = inputs
        .into_iter()
        .map(|input| {
            let paths = OutputPaths::for_input(
                &input,
                check_settings.out_dir.as_deref(),
                check_settings.output_format,
                constraints.is_some(),
            )
            .with_overrides(args.media_out.clone(), args.report_out.clone());
            CheckRequest {
                input,
                constraints: constraints.clone(),
                paths,
            }
        })
        .collect();

    let items = interactor.execute_batch(requests, check_settings.jobs).await;

    let mut worst = CheckOutcome::Passed;
    for item in &items {
        match &item.result {
            Ok(response) => print_response(response, args.summary_only),
            Err(e) => {
                error!("{}: {}", item.input.display(), e);
                eprintln!("Error: {}: {}", item.input.display(), e);
            }
        }
        worst = worst.max(item.outcome());
    }

    info!(files = items.len(), outcome = ?worst, "Check operation completed");
    Ok(worst)
}

fn print_response(response: &CheckResponse, summary_only: bool) {
    if !summary_only {
        println!(
            "Writing media profile to: {}",
            response.paths.media_profile.display()
        );
        if let Some(report_path) = response.paths.report.as_ref().filter(|_| response.report.is_some()) {
            println!("Writing validation report to: {}", report_path.display());
        }
        print!("{}", response.document);
        println!();
    }

    let summary = match &response.report {
        Some(report) => render_report_summary(report),
        None => render_profile_summary(&response.profile),
    };
    print!("{}", summary);
}

/// Execute a constraints subcommand
pub fn constraints(command: ConstraintsCommand) -> Result<CheckOutcome> {
    match command {
        ConstraintsCommand::Init(args) => init_constraints(args),
        ConstraintsCommand::Lint(args) => lint_constraints(args),
    }
}

fn init_constraints(args: InitArgs) -> Result<CheckOutcome> {
    if args.file.exists() && !args.force {
        return Err(MediaCheckError::InvalidArguments {
            message: format!(
                "{} already exists, use --force to replace it",
                args.file.display()
            ),
        }
        .into());
    }

    let format = ConstraintsFormat::from_path(&args.file);
    let text = ConstraintsValidator::render(&TargetConstraints::default_template(), format)
        .map_err(MediaCheckError::from)?;
    write_atomic(&args.file, text.as_bytes()).context("Failed to write constraints template")?;

    println!("Wrote constraints template to: {}", args.file.display());
    Ok(CheckOutcome::Passed)
}

fn lint_constraints(args: LintArgs) -> Result<CheckOutcome> {
    let report = ConstraintsValidator::lint_file(&args.file)
        .map_err(MediaCheckError::from)
        .context("Failed to load constraints document")?;

    let keys: Vec<&str> = report.rule_keys.iter().map(|key| key.as_str()).collect();
    println!("{}: {} rule(s): {}", args.file.display(), keys.len(), keys.join(", "));

    if report.is_clean() {
        println!("OK");
        return Ok(CheckOutcome::Passed);
    }

    for issue in &report.issues {
        println!("  ✗ {}", issue);
    }
    println!("{} issue(s) found", report.issues.len());
    Ok(CheckOutcome::Failed)
}
