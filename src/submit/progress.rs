//! Progress callback trait for interface-agnostic updates
//!
//! Lets the CLI, a server, or a test observe a submission while it runs.

use crate::error::Error;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

/// Submission phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Creating (or identifying) the target plan with the first batch
    Opening,
    /// Adding the remaining batches to the plan
    Appending,
    /// Submission finished
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opening => write!(f, "Opening plan"),
            Self::Appending => write!(f, "Adding batches"),
            Self::Complete => write!(f, "Done"),
        }
    }
}

/// Running totals, emitted once per batch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    /// Number of batches in the submission
    pub total_batches: usize,
    /// Batches applied so far
    pub successful_batches: usize,
    /// Batches failed so far
    pub failed_batches: usize,
    /// Failure messages so far, in attempt order
    pub errors: Vec<String>,
    /// Set on the last record of a submission
    pub is_complete: bool,
}

impl BatchProgress {
    /// Batches attempted so far
    pub const fn attempted(&self) -> usize {
        self.successful_batches + self.failed_batches
    }
}

/// Progress callback trait
///
/// `on_batch` is called after every batch attempt, failed ones included.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called after each batch attempt with running totals
    async fn on_batch(&self, progress: &BatchProgress);

    /// Called when a batch fails (non-fatal unless it was the first)
    async fn on_error(&self, error: &Error);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_batch(&self, _progress: &BatchProgress) {}
    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}

/// Forwards batch progress records over a channel
///
/// Phases and messages are dropped; a closed receiver is ignored.
pub struct ChannelProgress {
    sender: UnboundedSender<BatchProgress>,
}

impl ChannelProgress {
    /// Forward records to `sender`
    pub const fn new(sender: UnboundedSender<BatchProgress>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl ProgressCallback for ChannelProgress {
    async fn on_phase(&self, _phase: Phase) {}

    async fn on_batch(&self, progress: &BatchProgress) {
        let _ = self.sender.send(progress.clone());
    }

    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}
