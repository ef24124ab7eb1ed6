//! Two-phase submission engine
//!
//! Handles creating or extending a remediation plan across many batches:
//! 1. Planning - pack issues into batches and build payloads
//! 2. Execution - open the plan with the first batch, then append the rest

mod execute;
mod plan;
mod progress;

pub use execute::{determine_status, execute_submission, SubmissionResult};
pub use plan::{
    create_submission_plan, PayloadTemplate, SubmissionMode, SubmissionPlan, DEFAULT_THROTTLE,
};
pub use progress::{BatchProgress, ChannelProgress, NoopProgress, Phase, ProgressCallback};

/// Report what a plan would send, without sending it
pub async fn report_dry_run(plan: &SubmissionPlan, progress: &dyn ProgressCallback) {
    if plan.batches.is_empty() {
        let verb = if plan.is_update() { "update" } else { "create" };
        progress
            .on_message(&format!("Would {verb} the plan with no issues (1 request)"))
            .await;
        return;
    }

    let target = match &plan.mode {
        SubmissionMode::Create => format!(
            "create plan {}",
            plan.template.name.as_deref().unwrap_or("(unnamed)")
        ),
        SubmissionMode::Update(id) => format!("update plan {id}"),
    };
    progress
        .on_message(&format!(
            "Would {target} in {} request{}:",
            plan.batches.len(),
            if plan.batches.len() == 1 { "" } else { "s" }
        ))
        .await;

    for (i, batch) in plan.batches.iter().enumerate() {
        progress
            .on_message(&format!(
                "  - batch {}: {} issue{}, {} system{}",
                i + 1,
                batch.len(),
                if batch.len() == 1 { "" } else { "s" },
                batch.system_count(),
                if batch.system_count() == 1 { "" } else { "s" }
            ))
            .await;
    }
}
