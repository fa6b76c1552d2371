//! Input/output operations, configuration and error handling

/// Command-line parsing and single-run orchestration
pub mod cli;
/// Defaults and the engine configuration document
pub mod configuration;
/// Error type shared by every module
pub mod error;
/// Input image loading
pub mod image;
/// Terminal progress display
pub mod progress;
/// JSON run reports
pub mod report;
