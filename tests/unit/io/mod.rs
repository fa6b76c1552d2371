//! Tests for errors, configuration, reports and the command line

pub mod error;
pub mod image;
