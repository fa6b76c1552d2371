//! Optional natural-language explanation of a discovered formula
//!
//! The oracle is advisory: it never influences classification or
//! convergence, and its failures are recorded as text instead of aborting
//! the run.

/// Mistral chat-completions client
pub mod mistral;

pub use mistral::MistralOracle;

use crate::io::configuration::DEFAULT_ORACLE_MODEL;
use crate::io::error::Result;
use crate::measure::InvariantVector;
use serde::Deserialize;
use tracing::warn;

/// Prefix placed before the error text when the oracle fails
pub const ERROR_PREFIX: &str = "Error: ";

/// Prompt used when the configuration does not supply one
pub const DEFAULT_PROMPT_TEMPLATE: &str = "You are a mathematician studying fractals. \
An image was measured with these invariants:\n{invariants}\n\
The inferred generating formula is:\n{formula}\n\
Explain in a short paragraph why this formula fits the measurements.";

/// Whether and how to request an explanation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExplanationPolicy {
    /// Request an explanation after a successful run
    pub generate_explanation: bool,
    /// Prompt with `{invariants}` and `{formula}` placeholders
    pub prompt_template: String,
    /// Model identifier passed to the oracle
    pub model: String,
}

impl Default for ExplanationPolicy {
    fn default() -> Self {
        Self {
            generate_explanation: false,
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_owned(),
            model: DEFAULT_ORACLE_MODEL.to_owned(),
        }
    }
}

impl ExplanationPolicy {
    /// Fill the template's placeholders
    pub fn render_prompt(&self, invariants: &InvariantVector, formula: &str) -> String {
        let invariants = serde_json::to_string_pretty(invariants)
            .unwrap_or_else(|e| format!("<unserializable invariants: {e}>"));
        self.prompt_template
            .replace("{invariants}", &invariants)
            .replace("{formula}", formula)
    }
}

/// Text-completion service answering a single prompt
pub trait ExplanationOracle {
    /// Complete the prompt
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or answers malformed data
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Explanation text for a formula, degrading to an error string on failure
///
/// Returns an empty string when explanations are disabled or no oracle is
/// available.
pub fn explain(
    oracle: Option<&dyn ExplanationOracle>,
    invariants: &InvariantVector,
    formula: &str,
    policy: &ExplanationPolicy,
) -> String {
    if !policy.generate_explanation {
        return String::new();
    }
    let Some(oracle) = oracle else {
        return String::new();
    };

    let prompt = policy.render_prompt(invariants, formula);
    match oracle.complete(&prompt) {
        Ok(text) => text.trim().to_owned(),
        Err(error) => {
            warn!(%error, "explanation unavailable");
            format!("{ERROR_PREFIX}{error}")
        }
    }
}

/// Remove a surrounding Markdown code fence, if present
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string on the opening fence line
    let body = body.split_once('\n').map_or("", |(_, rest)| rest);
    body.strip_suffix("```").unwrap_or(body).trim()
}
