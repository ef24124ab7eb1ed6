//! Test data factories for remedy types
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use remedy::batch::{pack_into_batches, BatchLimits};
use remedy::types::{Batch, Issue};

/// `count` system ids starting at `first`
pub fn make_systems(first: usize, count: usize) -> Vec<String> {
    (first..first + count).map(|i| format!("system-{i:04}")).collect()
}

/// Issue with `count` systems
pub fn make_issue(id: &str, count: usize) -> Issue {
    Issue::new(id, make_systems(1, count))
}

/// Issue with a resolution override
pub fn make_issue_with_resolution(id: &str, count: usize, resolution: &str) -> Issue {
    Issue {
        resolution: Some(resolution.to_string()),
        ..make_issue(id, count)
    }
}

/// `n` single-issue batches, each filled to the default 50 systems
pub fn make_batches(n: usize) -> Vec<Batch> {
    let issues: Vec<Issue> = (0..n).map(|i| make_issue(&format!("issue-{i}"), 50)).collect();
    let batches = pack_into_batches(&issues, BatchLimits::default());
    assert_eq!(batches.len(), n);
    batches
}
