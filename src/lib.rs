//! Generating-formula inference for fractal images with render-and-remeasure verification
//!
//! An image is reduced to a vector of geometric invariants, the invariants are
//! classified into a formula family, and the formula is rendered, captured and
//! measured again until the inferred formula reproduces itself.

#![forbid(unsafe_code)]

/// Deterministic rule table from invariants to formula families
pub mod classify;
/// Convergence controller and run records
pub mod engine;
/// Input/output operations, configuration and error handling
pub mod io;
/// Numeric helpers shared by the estimators
pub mod math;
/// Invariant measurement from raster images
pub mod measure;
/// Optional natural-language explanations
pub mod oracle;
/// Formula rendering and capture
pub mod render;

pub use io::error::{ObserverError, Result};
