//! Submit command - create or extend a remediation plan in batches

use crate::cli::progress::CliProgress;
use crate::cli::style::{check, warning, Stylize};
use crate::cli::{load_issues, plural};
use anstream::{eprintln, println};
use remedy::config::Config;
use remedy::error::Result;
use remedy::platform::HttpRemediationService;
use remedy::submit::{
    create_submission_plan, execute_submission, report_dry_run, PayloadTemplate, SubmissionMode,
};
use remedy::types::SubmissionStatus;
use std::path::Path;

/// Run the submit command
pub async fn run_submit(
    config: &Config,
    path: &Path,
    mode: SubmissionMode,
    template: PayloadTemplate,
    dry_run: bool,
) -> Result<()> {
    let issues = load_issues(path)?;
    let plan = create_submission_plan(issues, config.limits, mode, template)
        .with_throttle(config.throttle);

    let total = plan.batches.len();
    println!(
        "Submitting {} batch{} to {}",
        total.accent(),
        if total == 1 { "" } else { "es" },
        config.api.base_url.as_str().muted()
    );

    if dry_run {
        report_dry_run(&plan, &CliProgress::hidden()).await;
        return Ok(());
    }

    let service = HttpRemediationService::new(&config.api)?;
    let progress = CliProgress::new(total);
    let result = execute_submission(&plan, &service, &progress).await;

    let id = result.remediation_id.as_deref().unwrap_or_default();
    let verb = if result.is_update { "Updated" } else { "Created" };
    match result.status {
        SubmissionStatus::Success => {
            println!("{} {verb} plan {}", check(), id.accent());
            Ok(())
        }
        SubmissionStatus::PartialFailure => {
            if let Some(err) = result.failure() {
                eprintln!(
                    "{} {verb} plan {}, but {err}:",
                    warning(),
                    id.accent().for_stderr()
                );
            }
            for err in &result.errors {
                eprintln!("  {}", err.warn());
            }
            eprintln!(
                "{}",
                format!(
                    "The plan exists but is missing {} issue group{}",
                    result.failed_batches,
                    plural(result.failed_batches)
                )
                .muted()
                .for_stderr()
            );
            Ok(())
        }
        SubmissionStatus::CompleteFailure => match result.failure() {
            Some(err) => Err(err),
            None => Ok(()),
        },
    }
}
