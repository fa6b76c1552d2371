//! Error types and context management for observer operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for all observer operations
#[derive(Debug)]
pub enum ObserverError {
    /// Input image path does not exist
    InputNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Failed to decode the source image
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Decoded image cannot be measured
    InvalidImage {
        /// Description of what's wrong with the image
        reason: String,
    },

    /// Configuration parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Renderer could not produce a document
    Render {
        /// Description of the failure
        reason: String,
    },

    /// Capturer could not produce a raster from a document
    Capture {
        /// Description of the failure
        reason: String,
    },

    /// Explanation oracle request failed
    Oracle {
        /// Description of the failure
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// JSON encoding or decoding failure
    Serialization {
        /// Path of the document being read or written
        path: PathBuf,
        /// Underlying serde error
        source: serde_json::Error,
    },
}

impl ObserverError {
    /// Whether this error belongs to the input class (missing, undecodable or unusable image)
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InputNotFound { .. } | Self::ImageLoad { .. } | Self::InvalidImage { .. }
        )
    }

    /// Whether this error was raised by a renderer, capturer or oracle
    pub const fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Self::Render { .. } | Self::Capture { .. } | Self::Oracle { .. }
        )
    }
}

impl fmt::Display for ObserverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputNotFound { path } => {
                write!(f, "File not found: {}", path.display())
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::InvalidImage { reason } => {
                write!(f, "Invalid image: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Render { reason } => {
                write!(f, "Rendering failed: {reason}")
            }
            Self::Capture { reason } => {
                write!(f, "Capture failed: {reason}")
            }
            Self::Oracle { reason } => {
                write!(f, "Explanation oracle failed: {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { path, source } => {
                write!(f, "JSON error in '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ObserverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for observer results
pub type Result<T> = std::result::Result<T, ObserverError>;

/// Attaches the path and operation to raw I/O and JSON failures
pub trait WithPath<T> {
    /// Convert the error, recording which path was being touched
    ///
    /// # Errors
    ///
    /// Propagates the original error wrapped with path context
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T>;
}

impl<T> WithPath<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: &Path, operation: &'static str) -> Result<T> {
        self.map_err(|source| ObserverError::FileSystem {
            path: path.to_path_buf(),
            operation,
            source,
        })
    }
}

impl<T> WithPath<T> for std::result::Result<T, serde_json::Error> {
    fn with_path(self, path: &Path, _operation: &'static str) -> Result<T> {
        self.map_err(|source| ObserverError::Serialization {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> ObserverError {
    ObserverError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

