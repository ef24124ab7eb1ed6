//! Plan command - show how issues would be batched

use crate::cli::style::{bullet, Stylize};
use crate::cli::{load_issues, plural};
use anstream::println;
use remedy::batch::{filter_submittable, pack_into_batches, summarize, BatchLimits};
use remedy::error::Result;
use std::path::Path;

/// Run the plan command
pub fn run_plan(path: &Path, limits: BatchLimits) -> Result<()> {
    let issues = load_issues(path)?;
    let loaded = issues.len();
    let issues = filter_submittable(issues);
    let dropped = loaded - issues.len();

    let batches = pack_into_batches(&issues, limits);
    if batches.is_empty() {
        println!("No issues with systems to submit");
        return Ok(());
    }

    for (i, batch) in batches.iter().enumerate() {
        println!(
            "{} {}",
            format!("Batch {}", i + 1).emphasis(),
            format!(
                "({} issue{}, {} system{})",
                batch.len(),
                plural(batch.len()),
                batch.system_count(),
                plural(batch.system_count())
            )
            .muted()
        );
        for fragment in &batch.fragments {
            println!(
                "  {} {} {}",
                bullet(),
                fragment.id.accent(),
                format!("{} system{}", fragment.systems.len(), plural(fragment.systems.len()))
                    .muted()
            );
        }
    }

    let summary = summarize(&batches);
    println!();
    println!(
        "{} request{}, {} issue entr{}, {} system{} (largest request: {})",
        summary.batches.accent(),
        plural(summary.batches),
        summary.fragments.accent(),
        if summary.fragments == 1 { "y" } else { "ies" },
        summary.systems.accent(),
        plural(summary.systems),
        summary.largest_batch.accent()
    );

    if dropped > 0 {
        println!(
            "{}",
            format!("({dropped} issue{} without systems skipped)", plural(dropped)).muted()
        );
    }

    Ok(())
}
