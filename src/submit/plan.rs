//! Submission planning
//!
//! Turns issues into the batches and request payloads a submission will send.

use crate::batch::{filter_submittable, pack_into_batches, BatchLimits};
use crate::types::{AddSection, Batch, Issue, PayloadIssue, RemediationPayload};
use std::time::Duration;

/// Delay inserted before every batch request
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(250);

/// Whether the submission creates a plan or extends one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionMode {
    /// Create a new plan from the first batch
    Create,
    /// Add to the existing plan with this id
    Update(String),
}

/// Fields shared by every request of one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadTemplate {
    /// Plan name; sent only when creating
    pub name: Option<String>,
    /// Whether systems may be rebooted automatically
    pub auto_reboot: bool,
}

/// Submission plan
#[derive(Debug, Clone)]
pub struct SubmissionPlan {
    /// Create or update
    pub mode: SubmissionMode,
    /// Batches in submission order
    pub batches: Vec<Batch>,
    /// Shared payload fields
    pub template: PayloadTemplate,
    /// Delay before every batch request
    pub throttle: Duration,
}

impl SubmissionPlan {
    /// Plan that creates a new remediation
    pub const fn create(batches: Vec<Batch>, template: PayloadTemplate) -> Self {
        Self {
            mode: SubmissionMode::Create,
            batches,
            template,
            throttle: DEFAULT_THROTTLE,
        }
    }

    /// Plan that extends remediation `id`
    pub fn update(id: impl Into<String>, batches: Vec<Batch>, template: PayloadTemplate) -> Self {
        Self {
            mode: SubmissionMode::Update(id.into()),
            batches,
            template,
            throttle: DEFAULT_THROTTLE,
        }
    }

    /// Override the delay between requests
    #[must_use]
    pub const fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Whether this plan extends an existing remediation
    pub const fn is_update(&self) -> bool {
        matches!(self.mode, SubmissionMode::Update(_))
    }

    /// Payload that creates the plan; `batch` may be `None` for an empty plan
    pub fn create_payload(&self, batch: Option<&Batch>) -> RemediationPayload {
        RemediationPayload {
            name: self.template.name.clone(),
            ..self.update_payload(batch)
        }
    }

    /// Payload that adds `batch` to an existing plan
    pub fn update_payload(&self, batch: Option<&Batch>) -> RemediationPayload {
        let issues = batch
            .map(|b| b.fragments.iter().map(PayloadIssue::from).collect())
            .unwrap_or_default();

        RemediationPayload {
            add: AddSection {
                issues,
                systems: Vec::new(),
            },
            auto_reboot: self.template.auto_reboot,
            name: None,
        }
    }
}

/// Create a submission plan
///
/// Drops issues without systems, then packs the rest under `limits`.
pub fn create_submission_plan(
    issues: Vec<Issue>,
    limits: BatchLimits,
    mode: SubmissionMode,
    template: PayloadTemplate,
) -> SubmissionPlan {
    let issues = filter_submittable(issues);
    let batches = pack_into_batches(&issues, limits);

    SubmissionPlan {
        mode,
        batches,
        template,
        throttle: DEFAULT_THROTTLE,
    }
}
