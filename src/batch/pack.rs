//! Issue packing
//!
//! Packs issues into batches bounded by three limits at once: fragments per
//! batch, systems per fragment, and systems per batch.

use crate::types::{Batch, Fragment, Issue};
use serde::Serialize;
use tracing::debug;

/// Default for every packing limit
pub const DEFAULT_LIMIT: usize = 50;

/// Size limits applied while packing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchLimits {
    /// Maximum fragments in one batch
    pub max_issues_per_batch: usize,
    /// Maximum systems in one fragment; larger issues are split
    pub max_systems_per_issue: usize,
    /// Maximum systems across all fragments of one batch
    pub max_total_systems_per_batch: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_issues_per_batch: DEFAULT_LIMIT,
            max_systems_per_issue: DEFAULT_LIMIT,
            max_total_systems_per_batch: DEFAULT_LIMIT,
        }
    }
}

impl BatchLimits {
    /// Zero limits cannot produce progress, treat them as 1
    const fn clamped(self) -> Self {
        Self {
            max_issues_per_batch: if self.max_issues_per_batch == 0 {
                1
            } else {
                self.max_issues_per_batch
            },
            max_systems_per_issue: if self.max_systems_per_issue == 0 {
                1
            } else {
                self.max_systems_per_issue
            },
            max_total_systems_per_batch: if self.max_total_systems_per_batch == 0 {
                1
            } else {
                self.max_total_systems_per_batch
            },
        }
    }
}

/// Aggregate figures for a list of batches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Number of batches (one request each)
    pub batches: usize,
    /// Number of fragments across all batches
    pub fragments: usize,
    /// Number of systems across all batches
    pub systems: usize,
    /// System count of the largest batch
    pub largest_batch: usize,
}

/// Drop issues that have no systems to remediate
pub fn filter_submittable(issues: Vec<Issue>) -> Vec<Issue> {
    issues
        .into_iter()
        .filter(|issue| !issue.systems.is_empty())
        .collect()
}

/// Summarize a packing result
pub fn summarize(batches: &[Batch]) -> BatchSummary {
    BatchSummary {
        batches: batches.len(),
        fragments: batches.iter().map(Batch::len).sum(),
        systems: batches.iter().map(Batch::system_count).sum(),
        largest_batch: batches.iter().map(Batch::system_count).max().unwrap_or(0),
    }
}

/// Running state of one packing pass
struct Packer {
    limits: BatchLimits,
    batches: Vec<Batch>,
    current: Vec<Fragment>,
    current_systems: usize,
}

impl Packer {
    const fn new(limits: BatchLimits) -> Self {
        Self {
            limits,
            batches: Vec::new(),
            current: Vec::new(),
            current_systems: 0,
        }
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let fragments = std::mem::take(&mut self.current);
        debug!(
            "Flushing batch {}: {} fragments, {} systems",
            self.batches.len(),
            fragments.len(),
            self.current_systems
        );
        self.batches.push(Batch { fragments });
        self.current_systems = 0;
    }

    fn would_overflow(&self, systems: usize) -> bool {
        !self.current.is_empty()
            && self.current_systems + systems > self.limits.max_total_systems_per_batch
    }

    fn append(&mut self, id: &str, systems: &[String], resolution: Option<&String>) {
        self.current_systems += systems.len();
        self.current.push(Fragment {
            id: id.to_string(),
            systems: systems.to_vec(),
            resolution: resolution.cloned(),
        });
    }

    fn push(&mut self, issue: &Issue) {
        if issue.systems.len() <= self.limits.max_systems_per_issue {
            if self.would_overflow(issue.systems.len()) {
                self.flush();
            }
            self.append(&issue.id, &issue.systems, issue.resolution.as_ref());
            if self.current.len() >= self.limits.max_issues_per_batch {
                self.flush();
            }
            return;
        }

        debug!(
            "Splitting issue {} ({} systems) into chunks of {}",
            issue.id,
            issue.systems.len(),
            self.limits.max_systems_per_issue
        );

        // Every chunk of an oversized issue closes the batch it lands in.
        for chunk in issue.systems.chunks(self.limits.max_systems_per_issue) {
            if self.would_overflow(chunk.len()) {
                self.flush();
            }
            self.append(&issue.id, chunk, issue.resolution.as_ref());
            self.flush();
        }
    }

    fn finish(mut self) -> Vec<Batch> {
        self.flush();
        self.batches
    }
}

/// Pack issues into ordered batches
///
/// Issues are consumed in order; batch boundaries depend only on the input,
/// so the same issues always produce the same batches. Issues with more than
/// `max_systems_per_issue` systems are split into several fragments sharing
/// the issue id.
pub fn pack_into_batches(issues: &[Issue], limits: BatchLimits) -> Vec<Batch> {
    let mut packer = Packer::new(limits.clamped());
    for issue in issues {
        packer.push(issue);
    }
    packer.finish()
}
