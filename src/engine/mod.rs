//! Convergence loop: measure, classify, render, capture, re-measure
//!
//! Attempt 1 is discovery on the input image. Every later attempt renders the
//! previous formula, captures it, measures the capture and compares the new
//! formula with the previous one. The run succeeds as soon as the similarity
//! reaches the configured threshold. Attempts whose render or capture failed
//! re-measure the previous raster and score 0.0, so they never converge.

/// Attempt history and run outcome
pub mod record;
/// Formula comparison
pub mod similarity;

pub use record::{FormulaRecord, RunResult, RunStatus};

use crate::classify::classify;
use crate::io::configuration::EngineConfig;
use crate::io::error::Result;
use crate::io::image::load_image;
use crate::measure::{InvariantVector, measure_with};
use crate::oracle::{ExplanationOracle, explain};
use crate::render::{Capturer, Document, Renderer};
use image::DynamicImage;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Phase of an attempt, reported to listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Measuring the input image
    Discovery,
    /// Rendering and capturing the previous formula
    Embodiment,
    /// Re-measuring the capture and comparing formulas
    Validation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovery => "discovery",
            Self::Embodiment => "embodiment",
            Self::Validation => "validation",
        };
        f.write_str(name)
    }
}

/// Observer of loop progress
pub trait CycleListener {
    /// A stage of `attempt` out of `max_cycles` is starting
    fn stage_started(&mut self, _attempt: usize, _max_cycles: usize, _stage: Stage) {}

    /// The run has ended
    fn run_finished(&mut self, _result: &RunResult) {}
}

/// Listener that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentListener;

impl CycleListener for SilentListener {}

/// Drives one image through the convergence loop
pub struct Controller {
    config: EngineConfig,
    renderer: Box<dyn Renderer>,
    capturer: Box<dyn Capturer>,
    oracle: Option<Box<dyn ExplanationOracle>>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("config", &self.config)
            .field("oracle", &self.oracle.is_some())
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Create a controller with the given collaborators
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is out of range
    pub fn new(
        config: EngineConfig,
        renderer: Box<dyn Renderer>,
        capturer: Box<dyn Capturer>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            renderer,
            capturer,
            oracle: None,
        })
    }

    /// Attach an explanation oracle
    #[must_use]
    pub fn with_oracle(mut self, oracle: Box<dyn ExplanationOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Configuration in use
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load and run an image file
    pub fn run_path(&mut self, path: &Path) -> RunResult {
        self.run_path_with(path, &mut SilentListener)
    }

    /// Load and run an image file, reporting progress
    ///
    /// Load failures produce a failed result carrying the error message.
    pub fn run_path_with(&mut self, path: &Path, listener: &mut dyn CycleListener) -> RunResult {
        match load_image(path) {
            Ok(image) => self.run_with(&image, listener),
            Err(error) => {
                warn!(path = %path.display(), %error, "input rejected");
                let mut result = RunResult::new();
                result.abort(&error);
                listener.run_finished(&result);
                result
            }
        }
    }

    /// Run an already decoded image
    pub fn run(&mut self, image: &DynamicImage) -> RunResult {
        self.run_with(image, &mut SilentListener)
    }

    /// Run an already decoded image, reporting progress
    pub fn run_with(&mut self, image: &DynamicImage, listener: &mut dyn CycleListener) -> RunResult {
        let mut result = RunResult::new();
        match self.converge(image, &mut result, listener) {
            Ok(()) => self.attach_explanation(&mut result),
            Err(error) => {
                warn!(%error, attempts = result.history.len(), "run aborted");
                result.abort(&error);
            }
        }
        listener.run_finished(&result);
        result
    }

    fn converge(
        &mut self,
        image: &DynamicImage,
        result: &mut RunResult,
        listener: &mut dyn CycleListener,
    ) -> Result<()> {
        let max_cycles = self.config.max_cycles;
        let measurement = self.config.measurement;

        listener.stage_started(1, max_cycles, Stage::Discovery);
        let mut invariants = measure_with(image, measurement)?;
        let mut formula = classify(&invariants);
        info!(attempt = 1, formula = %formula, "discovery");
        result.push(FormulaRecord::discovery(formula.clone(), invariants.clone()));

        if max_cycles == 1 {
            result.succeed(formula, 1);
            return Ok(());
        }

        let mut raster = image.clone();
        for attempt in 2..=max_cycles {
            listener.stage_started(attempt, max_cycles, Stage::Embodiment);
            let mut captured = false;
            let visualization = match self.embody(&formula, &invariants, attempt) {
                Some((document, saved)) => {
                    match self.capturer.capture(&document) {
                        Ok(image) => {
                            raster = image;
                            captured = true;
                        }
                        Err(error) => {
                            warn!(attempt, %error, "capture failed, re-measuring previous raster");
                        }
                    }
                    saved
                }
                None => None,
            };

            listener.stage_started(attempt, max_cycles, Stage::Validation);
            let next_invariants = measure_with(&raster, measurement)?;
            let next_formula = classify(&next_invariants);
            // A stale raster reproduces the previous formula and proves nothing
            let score = if captured {
                similarity::similarity(&formula, &next_formula)
            } else {
                0.0
            };
            info!(attempt, formula = %next_formula, similarity = score, captured, "validation");

            result.push(FormulaRecord {
                attempt,
                formula: next_formula.clone(),
                invariants: next_invariants.clone(),
                visualization,
                similarity_score: Some(score),
            });

            if captured && score >= self.config.similarity_threshold {
                info!(attempt, "converged");
                result.succeed(next_formula, attempt);
                return Ok(());
            }

            formula = next_formula;
            invariants = next_invariants;
        }

        info!(max_cycles, "cycle budget exhausted without convergence");
        result.exhaust(max_cycles);
        Ok(())
    }

    /// Render the formula and persist the document when a directory is configured
    ///
    /// Render failures are logged and skip capture for this attempt.
    fn embody(
        &self,
        formula: &str,
        invariants: &InvariantVector,
        attempt: usize,
    ) -> Option<(Document, Option<PathBuf>)> {
        let document = match self
            .renderer
            .render(formula, invariants, &self.config.visualization)
        {
            Ok(document) => document,
            Err(error) => {
                warn!(attempt, %error, "render failed, re-measuring previous raster");
                return None;
            }
        };

        let saved = self
            .config
            .visualization
            .output_dir
            .as_deref()
            .and_then(|dir| match document.save(dir, attempt) {
                Ok(path) => Some(path),
                Err(error) => {
                    warn!(attempt, %error, "visualization not saved");
                    None
                }
            });
        Some((document, saved))
    }

    fn attach_explanation(&self, result: &mut RunResult) {
        let policy = &self.config.explanation;
        if !policy.generate_explanation || !result.is_success() {
            return;
        }
        let (Some(formula), Some(last)) = (result.formula.clone(), result.last()) else {
            return;
        };
        let text = explain(self.oracle.as_deref(), &last.invariants, &formula, policy);
        result.explanation = Some(text);
    }
}
