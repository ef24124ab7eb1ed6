//! Terminal progress for batch submission

use crate::cli::style::{batch_bar_style, cross, Stylize};
use anstream::{eprintln, println};
use async_trait::async_trait;
use indicatif::ProgressBar;
use remedy::error::Error;
use remedy::submit::{BatchProgress, Phase, ProgressCallback};

/// Progress callback drawing a batch bar on stderr
///
/// All printing goes through [`ProgressBar::suspend`] so lines never tear the
/// bar.
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Bar sized for `total_batches`
    pub fn new(total_batches: usize) -> Self {
        let bar = ProgressBar::new(total_batches as u64).with_style(batch_bar_style());
        Self { bar }
    }

    /// No bar; messages only (dry runs)
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::Complete => self.bar.finish_and_clear(),
            _ => self.bar.set_message(phase.to_string()),
        }
    }

    async fn on_batch(&self, progress: &BatchProgress) {
        self.bar.set_position(progress.attempted() as u64);
        if progress.failed_batches > 0 {
            self.bar
                .set_message(format!("({} failed)", progress.failed_batches));
        }
    }

    async fn on_error(&self, err: &Error) {
        self.bar
            .suspend(|| eprintln!("  {} {}", cross(), err.to_string().error()));
    }

    async fn on_message(&self, message: &str) {
        self.bar.suspend(|| println!("{}", message.muted()));
    }
}
