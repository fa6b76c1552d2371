//! Command-line interface: one image in, one JSON report out

use crate::engine::{Controller, RunStatus};
use crate::io::configuration::{DEFAULT_REPORTS_DIR, EngineConfig};
use crate::io::error::{ObserverError, Result};
use crate::io::progress::CycleProgress;
use crate::io::report::{ReportPaths, ReportWriter};
use crate::oracle::MistralOracle;
use crate::render::{BrowserCapturer, Capturer, HtmlRenderer, RasterCapturer};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};

/// How rendered documents are turned back into pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CaptureMode {
    /// Draw each family natively
    Native,
    /// Screenshot the HTML document with a headless browser
    Browser,
}

#[derive(Parser, Debug)]
#[command(name = "fractal-observer")]
#[command(
    author,
    version,
    about = "Infer a generating formula for a fractal image and verify it by re-rendering"
)]
/// Command-line arguments for a single inference run
pub struct Cli {
    /// Input image to analyze
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// JSON configuration file; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum cycles including discovery
    #[arg(short, long)]
    pub max_cycles: Option<usize>,

    /// Similarity needed to declare convergence
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Canvas width in pixels
    #[arg(short = 'w', long)]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Directory receiving JSON reports
    #[arg(short, long, default_value = DEFAULT_REPORTS_DIR)]
    pub reports_dir: PathBuf,

    /// Directory receiving rendered documents
    #[arg(long, value_name = "DIR")]
    pub visualizations_dir: Option<PathBuf>,

    /// Keep rendered documents in memory only
    #[arg(long, conflicts_with = "visualizations_dir")]
    pub no_visualizations: bool,

    /// Capture backend
    #[arg(long, value_enum, default_value_t = CaptureMode::Native)]
    pub capture: CaptureMode,

    /// Browser executable used by the browser capture backend
    #[arg(long, default_value = "chromium")]
    pub browser: PathBuf,

    /// Ask the explanation oracle about the converged formula
    #[arg(short, long)]
    pub explain: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Configuration file values with command-line overrides applied
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is unreadable or a value is out of range
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_json_file(path)?,
            None => EngineConfig::default(),
        };

        if let Some(max_cycles) = self.max_cycles {
            config.max_cycles = max_cycles;
        }
        if let Some(threshold) = self.threshold {
            config.similarity_threshold = threshold;
        }
        if let Some(width) = self.width {
            config.visualization.width = width;
        }
        if let Some(height) = self.height {
            config.visualization.height = height;
        }
        if let Some(dir) = &self.visualizations_dir {
            config.visualization.output_dir = Some(dir.clone());
        }
        if self.no_visualizations {
            config.visualization.output_dir = None;
        }
        if self.explain {
            config.explanation.generate_explanation = true;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Runs one image through the loop and writes its report
pub struct FileProcessor {
    cli: Cli,
}

impl FileProcessor {
    /// Create a processor for the given arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Arguments in use
    pub const fn cli(&self) -> &Cli {
        &self.cli
    }

    /// Run the loop and write the report
    ///
    /// A missing input is rejected before anything is written. Any other
    /// failure during the run is recorded in the report instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the input does not exist, the configuration is
    /// invalid, the capture backend cannot start, or the report cannot be written
    pub fn process(&mut self) -> Result<(RunStatus, ReportPaths)> {
        if !self.cli.image.exists() {
            return Err(ObserverError::InputNotFound {
                path: self.cli.image.clone(),
            });
        }

        let config = self.cli.engine_config()?;
        let max_cycles = config.max_cycles;
        let capturer = self.capturer(&config)?;
        let oracle = if config.explanation.generate_explanation {
            let oracle = MistralOracle::from_env(config.explanation.model.clone())?;
            match &oracle {
                Some(client) => info!(model = client.model(), "explanations enabled"),
                None => warn!("explanation requested but no API key is set"),
            }
            oracle
        } else {
            None
        };

        let mut controller = Controller::new(config, Box::new(HtmlRenderer::new()), capturer)?;
        if let Some(oracle) = oracle {
            controller = controller.with_oracle(Box::new(oracle));
        }

        let mut progress = if self.cli.should_show_progress() {
            CycleProgress::new(&self.cli.image, max_cycles)
        } else {
            CycleProgress::hidden(max_cycles)
        };
        let result = controller.run_path_with(&self.cli.image, &mut progress);

        let paths = ReportWriter::new(&self.cli.reports_dir).write(&result)?;
        match &result.formula {
            Some(formula) => info!(attempts = result.attempts, formula = %formula, "run succeeded"),
            None => info!(attempts = result.attempts, "run failed"),
        }
        Ok((result.status, paths))
    }

    fn capturer(&self, config: &EngineConfig) -> Result<Box<dyn Capturer>> {
        Ok(match self.cli.capture {
            CaptureMode::Native => Box::new(RasterCapturer::new()),
            CaptureMode::Browser => {
                Box::new(BrowserCapturer::launch(self.cli.browser.clone(), config.capture)?)
            }
        })
    }
}
