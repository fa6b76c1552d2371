//! Terminal progress for the convergence loop

use crate::engine::{CycleListener, RunResult, RunStatus, Stage};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static CYCLE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress bar advancing one step per attempt
pub struct CycleProgress {
    bar: ProgressBar,
}

impl CycleProgress {
    /// Bar for a run over `input` with `max_cycles` attempts
    pub fn new(input: &Path, max_cycles: usize) -> Self {
        let progress = Self::from_bar(ProgressBar::new(0), max_cycles);
        progress.bar.set_style(CYCLE_STYLE.clone());
        progress.bar.set_prefix(
            input
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        );
        progress
    }

    /// Bar that tracks attempts without drawing
    pub fn hidden(max_cycles: usize) -> Self {
        Self::from_bar(ProgressBar::hidden(), max_cycles)
    }

    /// Drive an existing bar, sized to `max_cycles`
    pub fn from_bar(bar: ProgressBar, max_cycles: usize) -> Self {
        bar.set_length(max_cycles as u64);
        Self { bar }
    }
}

impl CycleListener for CycleProgress {
    fn stage_started(&mut self, attempt: usize, max_cycles: usize, stage: Stage) {
        self.bar.set_length(max_cycles as u64);
        self.bar.set_position(attempt.saturating_sub(1) as u64);
        self.bar.set_message(format!("attempt {attempt}: {stage}"));
    }

    fn run_finished(&mut self, result: &RunResult) {
        self.bar.set_position(result.attempts as u64);
        let message = match result.status {
            RunStatus::Success => format!("✓ converged after {} attempts", result.attempts),
            RunStatus::Failure => "✗ no convergence".to_owned(),
        };
        self.bar.finish_with_message(message);
    }
}
