//! Mock remediation service and progress recorder for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use remedy::error::{Error, Result};
use remedy::platform::RemediationService;
use remedy::submit::{BatchProgress, Phase, ProgressCallback};
use remedy::types::{CreatedRemediation, RemediationPayload};
use std::collections::HashSet;
use std::sync::Mutex;
use tokio::time::Instant;

/// Call record for `update_remediation`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCall {
    pub id: String,
    pub payload: RemediationPayload,
}

/// Call-recording remediation service
///
/// Features:
/// - Configurable create response (including a response without id)
/// - Call tracking with timestamps for throttle checks
/// - Error injection for create and for individual update calls
pub struct MockRemediationService {
    created_id: Mutex<Option<String>>,
    create_calls: Mutex<Vec<RemediationPayload>>,
    update_calls: Mutex<Vec<UpdateCall>>,
    call_times: Mutex<Vec<Instant>>,
    error_on_create: Mutex<Option<String>>,
    failing_updates: Mutex<HashSet<usize>>,
}

impl Default for MockRemediationService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemediationService {
    /// Mock whose create returns id `plan-1`
    pub fn new() -> Self {
        Self {
            created_id: Mutex::new(Some("plan-1".to_string())),
            create_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
            call_times: Mutex::new(Vec::new()),
            error_on_create: Mutex::new(None),
            failing_updates: Mutex::new(HashSet::new()),
        }
    }

    // === Response configuration ===

    /// Make create respond without an id
    pub fn create_without_id(&self) {
        *self.created_id.lock().unwrap() = None;
    }

    /// Make create return an error
    pub fn fail_create(&self, msg: &str) {
        *self.error_on_create.lock().unwrap() = Some(msg.to_string());
    }

    /// Make the `n`th update call (0-based) return an error
    pub fn fail_update_call(&self, n: usize) {
        self.failing_updates.lock().unwrap().insert(n);
    }

    // === Call verification ===

    pub fn create_calls(&self) -> Vec<RemediationPayload> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn update_calls(&self) -> Vec<UpdateCall> {
        self.update_calls.lock().unwrap().clone()
    }

    /// Time of every call, create and update, in call order
    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemediationService for MockRemediationService {
    async fn create_remediation(&self, payload: &RemediationPayload) -> Result<CreatedRemediation> {
        self.call_times.lock().unwrap().push(Instant::now());
        self.create_calls.lock().unwrap().push(payload.clone());

        if let Some(msg) = self.error_on_create.lock().unwrap().as_ref() {
            return Err(Error::Transport(msg.clone()));
        }

        Ok(CreatedRemediation {
            id: self.created_id.lock().unwrap().clone(),
        })
    }

    async fn update_remediation(&self, id: &str, payload: &RemediationPayload) -> Result<()> {
        self.call_times.lock().unwrap().push(Instant::now());
        let index = {
            let mut calls = self.update_calls.lock().unwrap();
            calls.push(UpdateCall {
                id: id.to_string(),
                payload: payload.clone(),
            });
            calls.len() - 1
        };

        if self.failing_updates.lock().unwrap().contains(&index) {
            return Err(Error::Transport(format!("update {index} rejected")));
        }
        Ok(())
    }
}

/// Progress callback that records everything it receives
#[derive(Default)]
pub struct RecordingProgress {
    phases: Mutex<Vec<Phase>>,
    batches: Mutex<Vec<BatchProgress>>,
    errors: Mutex<Vec<String>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn phases(&self) -> Vec<Phase> {
        self.phases.lock().unwrap().clone()
    }

    pub fn batches(&self) -> Vec<BatchProgress> {
        self.batches.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_phase(&self, phase: Phase) {
        self.phases.lock().unwrap().push(phase);
    }

    async fn on_batch(&self, progress: &BatchProgress) {
        self.batches.lock().unwrap().push(progress.clone());
    }

    async fn on_error(&self, error: &Error) {
        self.errors.lock().unwrap().push(error.to_string());
    }

    async fn on_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
