//! Export command - dump every remediation plan as JSON

use crate::cli::style::{check, spinner_style, Stylize};
use anstream::{eprintln, println};
use indicatif::ProgressBar;
use remedy::config::Config;
use remedy::error::Result;
use remedy::fetch::{FetchOptions, FetchOutcome, PaginatedFetchAggregator};
use remedy::platform::HttpRemediationService;
use remedy::types::RemediationSummary;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Run the export command
pub async fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let service = HttpRemediationService::new(&config.api)?;
    let aggregator = PaginatedFetchAggregator::<RemediationSummary, _>::new(
        service,
        FetchOptions {
            batch_size: config.page_size,
            skip: false,
        },
    );

    let spinner = ProgressBar::new_spinner().with_style(spinner_style());
    spinner.set_message("Fetching remediation plans...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let outcome = aggregator.start().await;
    spinner.finish_and_clear();

    let result = match outcome? {
        FetchOutcome::Completed(result) | FetchOutcome::Discarded(result) => result,
        FetchOutcome::AlreadyFetching | FetchOutcome::Skipped => return Ok(()),
    };

    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            eprintln!(
                "{} Exported {} plans to {}",
                check(),
                result.data.len().accent(),
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
