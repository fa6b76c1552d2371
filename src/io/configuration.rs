//! Runtime configuration defaults and the engine configuration document

use crate::io::error::{Result, WithPath, invalid_parameter};
use crate::oracle::ExplanationPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// Convergence loop defaults
/// Number of measure/render/re-measure cycles before giving up
pub const DEFAULT_MAX_CYCLES: usize = 3;
/// Similarity at or above which two successive formulas are considered converged
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.95;

// Visualization canvas
/// Width of the rendered canvas in pixels
pub const DEFAULT_CANVAS_WIDTH: u32 = 500;
/// Height of the rendered canvas in pixels
pub const DEFAULT_CANVAS_HEIGHT: u32 = 500;
/// Directory receiving per-attempt visualization documents
pub const DEFAULT_VISUALIZATION_DIR: &str = "output/visualizations";

// Capture settings
/// Time allowed for embedded scripts to finish drawing before sampling pixels
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2000;
/// Hard limit on a single browser capture
pub const DEFAULT_CAPTURE_TIMEOUT_SECS: u64 = 30;

// Explanation oracle
/// Request timeout for the explanation oracle
pub const ORACLE_TIMEOUT_SECS: u64 = 15;
/// Chat model used when none is configured
pub const DEFAULT_ORACLE_MODEL: &str = "mistral-large-latest";
/// Environment variable holding the oracle API key
pub const ORACLE_API_KEY_VAR: &str = "MISTRAL_API_KEY";

// Output settings
/// Directory receiving JSON reports
pub const DEFAULT_REPORTS_DIR: &str = "output/reports";
/// Rolling copy of the most recent report
pub const LATEST_REPORT_NAME: &str = "latest.json";
/// Prefix of timestamped report files
pub const REPORT_PREFIX: &str = "result_";

/// Canvas geometry and artifact location for rendered documents
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Where documents are written; `None` keeps them in memory only
    pub output_dir: Option<PathBuf>,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            output_dir: Some(PathBuf::from(DEFAULT_VISUALIZATION_DIR)),
        }
    }
}

/// Switches for the invariant measurer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Apply a 3x3 morphological opening after binarization
    pub denoise: bool,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self { denoise: true }
    }
}

/// Timing for capturers that drive an external process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Settle delay granted to scripted content, in milliseconds
    pub settle_delay_ms: u64,
    /// Wall-clock limit for one capture, in seconds
    pub timeout_secs: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            timeout_secs: DEFAULT_CAPTURE_TIMEOUT_SECS,
        }
    }
}

/// Everything the convergence controller needs, passed in explicitly
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of cycles including discovery
    pub max_cycles: usize,
    /// Convergence criterion on formula similarity
    pub similarity_threshold: f64,
    /// Canvas and artifact settings
    pub visualization: VisualizationConfig,
    /// Measurer settings
    pub measurement: MeasurementConfig,
    /// Capturer timing
    pub capture: CaptureConfig,
    /// Optional natural-language explanation of the final formula
    pub explanation: ExplanationPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            visualization: VisualizationConfig::default(),
            measurement: MeasurementConfig::default(),
            capture: CaptureConfig::default(),
            explanation: ExplanationPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Load a configuration document; absent keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds out-of-range values
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_path(path, "read config")?;
        let config: Self = serde_json::from_str(&text).with_path(path, "parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns an error naming the first parameter that is out of range
    pub fn validate(&self) -> Result<()> {
        if self.max_cycles == 0 {
            return Err(invalid_parameter(
                "max_cycles",
                &self.max_cycles,
                &"must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(invalid_parameter(
                "similarity_threshold",
                &self.similarity_threshold,
                &"must lie in [0, 1]",
            ));
        }
        if self.visualization.width == 0 || self.visualization.height == 0 {
            return Err(invalid_parameter(
                "visualization",
                &format!(
                    "{}x{}",
                    self.visualization.width, self.visualization.height
                ),
                &"canvas dimensions must be positive",
            ));
        }
        Ok(())
    }
}
