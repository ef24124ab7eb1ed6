//! Submission execution
//!
//! Sends a plan's batches one at a time. The first batch opens the plan
//! (create, or update of a known id) and must succeed; every later batch is
//! appended to that plan and may fail without stopping the run.

use crate::error::{Error, Result};
use crate::platform::RemediationService;
use crate::submit::{BatchProgress, Phase, ProgressCallback, SubmissionMode, SubmissionPlan};
use crate::types::{Batch, SubmissionStatus};
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Result of submission execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    /// True only when every batch was applied
    pub success: bool,
    /// Overall outcome
    pub status: SubmissionStatus,
    /// Plan id; `None` when no usable plan exists
    pub remediation_id: Option<String>,
    /// Plan name from the payload template
    pub remediation_name: Option<String>,
    /// Whether an existing plan was extended
    pub is_update: bool,
    /// Number of batches in the plan
    pub total_batches: usize,
    /// Batches applied
    pub successful_batches: usize,
    /// Batches that failed
    pub failed_batches: usize,
    /// Failure messages, in attempt order
    pub errors: Vec<String>,
}

impl SubmissionResult {
    fn started(plan: &SubmissionPlan) -> Self {
        Self {
            success: false,
            status: SubmissionStatus::CompleteFailure,
            remediation_id: None,
            remediation_name: plan.template.name.clone(),
            is_update: plan.is_update(),
            total_batches: plan.batches.len(),
            successful_batches: 0,
            failed_batches: 0,
            errors: Vec::new(),
        }
    }

    fn progress(&self, is_complete: bool) -> BatchProgress {
        BatchProgress {
            total_batches: self.total_batches,
            successful_batches: self.successful_batches,
            failed_batches: self.failed_batches,
            errors: self.errors.clone(),
            is_complete,
        }
    }

    fn finish(mut self, remediation_id: Option<String>) -> Self {
        self.status = match remediation_id {
            Some(_) => determine_status(self.successful_batches, self.failed_batches),
            None => SubmissionStatus::CompleteFailure,
        };
        self.success = self.status == SubmissionStatus::Success;
        self.remediation_id = remediation_id;
        self
    }

    /// The failure this result represents, if any
    pub fn failure(&self) -> Option<Error> {
        match self.status {
            SubmissionStatus::Success => None,
            SubmissionStatus::PartialFailure => Some(Error::PartialBatchFailure {
                failed: self.failed_batches,
                total: self.total_batches,
            }),
            SubmissionStatus::CompleteFailure => Some(Error::CompleteFailure(
                self.errors
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "no batches were applied".to_string()),
            )),
        }
    }
}

/// Map batch counts to an overall status
pub const fn determine_status(successful: usize, failed: usize) -> SubmissionStatus {
    if failed == 0 {
        SubmissionStatus::Success
    } else if successful > 0 {
        SubmissionStatus::PartialFailure
    } else {
        SubmissionStatus::CompleteFailure
    }
}

/// Execute a submission plan
///
/// 1. Empty plan: one create/update request with no issues, nothing else
/// 2. Open: wait for the throttle, send batch 0; failure ends the run
/// 3. Append: for each later batch wait for the throttle, then update the
///    plan; failures are recorded and the loop continues
///
/// Progress is reported after every batch attempt. Failures are folded into
/// the returned [`SubmissionResult`] rather than returned as errors.
pub async fn execute_submission(
    plan: &SubmissionPlan,
    service: &dyn RemediationService,
    progress: &dyn ProgressCallback,
) -> SubmissionResult {
    let mut result = SubmissionResult::started(plan);

    let Some((first, rest)) = plan.batches.split_first() else {
        return submit_empty(plan, service, result).await;
    };
    let total = plan.batches.len();

    info!("Submitting {total} batches");
    progress.on_phase(Phase::Opening).await;
    sleep(plan.throttle).await;

    let remediation_id = match open_plan(plan, first, service).await {
        Ok(id) => {
            result.successful_batches += 1;
            debug!("Batch 1/{total} opened plan {id}");
            id
        }
        Err(e) => {
            warn!("Batch 1/{total} failed, aborting submission: {e}");
            progress.on_error(&e).await;
            result.failed_batches += 1;
            result.errors.push(format!("Batch 1/{total} failed: {e}"));
            progress.on_batch(&result.progress(true)).await;
            progress.on_phase(Phase::Complete).await;
            return result.finish(None);
        }
    };
    progress.on_batch(&result.progress(rest.is_empty())).await;

    if !rest.is_empty() {
        progress.on_phase(Phase::Appending).await;
    }

    for (offset, batch) in rest.iter().enumerate() {
        let number = offset + 2;
        sleep(plan.throttle).await;

        let payload = plan.update_payload(Some(batch));
        match service.update_remediation(&remediation_id, &payload).await {
            Ok(()) => {
                result.successful_batches += 1;
                debug!("Batch {number}/{total} added to plan {remediation_id}");
            }
            Err(e) => {
                warn!("Batch {number}/{total} failed: {e}");
                progress.on_error(&e).await;
                result.failed_batches += 1;
                result.errors.push(format!("Batch {number}/{total} failed: {e}"));
            }
        }

        progress.on_batch(&result.progress(number == total)).await;
    }

    progress.on_phase(Phase::Complete).await;
    let result = result.finish(Some(remediation_id));
    info!(
        "Submission finished: {} ({} ok, {} failed)",
        result.status, result.successful_batches, result.failed_batches
    );
    result
}

/// Send the mandatory first batch, returning the id of the plan to extend
async fn open_plan(
    plan: &SubmissionPlan,
    batch: &Batch,
    service: &dyn RemediationService,
) -> Result<String> {
    match &plan.mode {
        SubmissionMode::Create => {
            let created = service
                .create_remediation(&plan.create_payload(Some(batch)))
                .await?;
            created.id.ok_or_else(|| {
                Error::CompleteFailure("create response did not include a plan id".to_string())
            })
        }
        SubmissionMode::Update(id) => {
            service
                .update_remediation(id, &plan.update_payload(Some(batch)))
                .await?;
            Ok(id.clone())
        }
    }
}

/// One request with no issues; no throttle and no progress records
async fn submit_empty(
    plan: &SubmissionPlan,
    service: &dyn RemediationService,
    mut result: SubmissionResult,
) -> SubmissionResult {
    let outcome = match &plan.mode {
        SubmissionMode::Create => service
            .create_remediation(&plan.create_payload(None))
            .await
            .and_then(|created| {
                created.id.ok_or_else(|| {
                    Error::CompleteFailure("create response did not include a plan id".to_string())
                })
            }),
        SubmissionMode::Update(id) => service
            .update_remediation(id, &plan.update_payload(None))
            .await
            .map(|()| id.clone()),
    };

    match outcome {
        Ok(id) => result.finish(Some(id)),
        Err(e) => {
            warn!("Empty submission failed: {e}");
            result.errors.push(e.to_string());
            result.finish(None)
        }
    }
}
