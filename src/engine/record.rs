//! Per-attempt history and the final run result

use crate::io::error::ObserverError;
use crate::measure::InvariantVector;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Terminal status of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// A formula reproduced itself within the cycle budget
    Success,
    /// Budget exhausted or the run aborted
    Failure,
}

/// One attempt's formula and the measurements behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaRecord {
    /// 1-based attempt index
    pub attempt: usize,
    /// Formula inferred at this attempt
    pub formula: String,
    /// Invariants the formula was inferred from
    pub invariants: InvariantVector,
    /// Saved document rendered for this attempt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization: Option<PathBuf>,
    /// Similarity to the previous attempt's formula
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
}

impl FormulaRecord {
    /// Record for the discovery attempt, which has nothing to compare against
    pub const fn discovery(formula: String, invariants: InvariantVector) -> Self {
        Self {
            attempt: 1,
            formula,
            invariants,
            visualization: None,
            similarity_score: None,
        }
    }
}

/// Outcome of one convergence run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Terminal status
    pub status: RunStatus,
    /// Converged formula; `null` unless the run succeeded
    pub formula: Option<String>,
    /// Attempts consumed
    pub attempts: usize,
    /// Every attempt in order
    pub history: Vec<FormulaRecord>,
    /// Message of the error that aborted the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Natural-language explanation of the converged formula
    #[serde(
        rename = "mmss_explanation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub explanation: Option<String>,
}

impl Default for RunResult {
    fn default() -> Self {
        Self::new()
    }
}

impl RunResult {
    /// Empty failed result awaiting attempts
    pub const fn new() -> Self {
        Self {
            status: RunStatus::Failure,
            formula: None,
            attempts: 0,
            history: Vec::new(),
            error: None,
            explanation: None,
        }
    }

    /// Append an attempt
    pub fn push(&mut self, record: FormulaRecord) {
        self.history.push(record);
    }

    /// Mark convergence on `formula` at `attempt`
    pub fn succeed(&mut self, formula: String, attempt: usize) {
        self.status = RunStatus::Success;
        self.formula = Some(formula);
        self.attempts = attempt;
    }

    /// Mark the cycle budget as spent without convergence
    pub fn exhaust(&mut self, max_cycles: usize) {
        self.status = RunStatus::Failure;
        self.formula = None;
        self.attempts = max_cycles;
    }

    /// Mark the run as aborted by an error
    pub fn abort(&mut self, error: &ObserverError) {
        self.status = RunStatus::Failure;
        self.formula = None;
        self.attempts = self.history.len();
        self.error = Some(error.to_string());
    }

    /// Whether the run converged
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }

    /// Most recent attempt
    pub fn last(&self) -> Option<&FormulaRecord> {
        self.history.last()
    }
}
