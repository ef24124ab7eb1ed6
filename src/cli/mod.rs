//! CLI commands
//!
//! Command implementations for the `remedy` binary.

mod export;
mod plan;
mod progress;
pub mod style;
mod submit;

pub use export::run_export;
pub use plan::run_plan;
pub use submit::run_submit;

use clap::Args;
use remedy::batch::BatchLimits;
use remedy::error::{Error, Result};
use remedy::types::Issue;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Packing limit overrides shared by `plan` and `submit`
#[derive(Args, Debug, Clone, Default)]
pub struct LimitArgs {
    /// Maximum issues per request
    #[arg(long)]
    pub max_issues: Option<usize>,

    /// Maximum systems per issue entry; larger issues are split
    #[arg(long)]
    pub max_systems_per_issue: Option<usize>,

    /// Maximum systems per request
    #[arg(long)]
    pub max_total_systems: Option<usize>,
}

impl LimitArgs {
    /// Apply overrides on top of `base`
    pub fn apply(&self, base: BatchLimits) -> BatchLimits {
        BatchLimits {
            max_issues_per_batch: self.max_issues.unwrap_or(base.max_issues_per_batch),
            max_systems_per_issue: self
                .max_systems_per_issue
                .unwrap_or(base.max_systems_per_issue),
            max_total_systems_per_batch: self
                .max_total_systems
                .unwrap_or(base.max_total_systems_per_batch),
        }
    }
}

/// Accepted shapes of an issues file
#[derive(Deserialize)]
#[serde(untagged)]
enum IssuesFile {
    List(Vec<Issue>),
    Wrapped { issues: Vec<Issue> },
}

/// Read issues from a JSON file
///
/// Either a bare array of `{ id, systems, resolution? }` or an object with an
/// `issues` array.
pub fn load_issues(path: &Path) -> Result<Vec<Issue>> {
    let raw = fs::read_to_string(path)?;
    let parsed: IssuesFile = serde_json::from_str(&raw)
        .map_err(|e| Error::Parse(format!("{}: {e}", path.display())))?;

    Ok(match parsed {
        IssuesFile::List(issues) | IssuesFile::Wrapped { issues } => issues,
    })
}

/// `""` or `"s"` for a count
pub const fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
