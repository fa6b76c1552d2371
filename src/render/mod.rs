//! Rendering and capture seams used by the convergence loop
//!
//! A [`Renderer`] turns a formula hypothesis into a self-contained
//! [`Document`]; a [`Capturer`] turns that document back into pixels so the
//! measurer can check whether the hypothesis reproduces itself.

/// Headless-browser capture session
pub mod browser;
/// Raster drawing primitives
pub mod draw;
/// HTML/JSXGraph document renderer
pub mod html;
/// Native procedural capturer
pub mod raster;

pub use browser::BrowserCapturer;
pub use html::HtmlRenderer;
pub use raster::RasterCapturer;

use crate::classify::FormulaFamily;
use crate::io::configuration::VisualizationConfig;
use crate::io::error::{Result, WithPath};
use crate::measure::InvariantVector;
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// Renderable visualization of one formula hypothesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Family drawn by the document
    pub family: FormulaFamily,
    /// Formula text embedded in the document
    pub formula: String,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Complete HTML source
    pub markup: String,
}

impl Document {
    /// File name used for the given attempt
    pub fn file_name(attempt: usize) -> String {
        format!("attempt_{attempt}.html")
    }

    /// Write the markup into `dir` and return the written path
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file cannot be written
    pub fn save(&self, dir: &Path, attempt: usize) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).with_path(dir, "create directory")?;
        let path = dir.join(Self::file_name(attempt));
        std::fs::write(&path, &self.markup).with_path(&path, "write visualization")?;
        Ok(path)
    }
}

/// Produces a document from a formula and the invariants behind it
pub trait Renderer {
    /// Render the hypothesis onto a canvas of the configured size
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be produced
    fn render(
        &self,
        formula: &str,
        invariants: &InvariantVector,
        config: &VisualizationConfig,
    ) -> Result<Document>;
}

/// Samples a rendered document into a raster image
pub trait Capturer {
    /// Capture the document's pixels
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be displayed or sampled
    fn capture(&mut self, document: &Document) -> Result<DynamicImage>;
}
