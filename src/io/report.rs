//! JSON run reports: one timestamped file per run plus a rolling latest copy

use crate::engine::RunResult;
use crate::io::configuration::{LATEST_REPORT_NAME, REPORT_PREFIX};
use crate::io::error::{Result, WithPath};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::info;

/// Files written for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    /// `result_<YYYYmmdd_HHMMSS>.json`
    pub timestamped: PathBuf,
    /// `latest.json`, overwritten by every run
    pub latest: PathBuf,
}

/// Writes run results into a reports directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Writer targeting `dir`, created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reports directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Timestamped report name for a moment in time
    pub fn report_name(at: &DateTime<Local>) -> String {
        format!("{REPORT_PREFIX}{}.json", at.format("%Y%m%d_%H%M%S"))
    }

    /// Write the result stamped with the current local time
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the result cannot
    /// be encoded, or either file cannot be written
    pub fn write(&self, result: &RunResult) -> Result<ReportPaths> {
        self.write_at(result, &Local::now())
    }

    /// Write the result stamped with the given time
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, the result cannot
    /// be encoded, or either file cannot be written
    pub fn write_at(&self, result: &RunResult, at: &DateTime<Local>) -> Result<ReportPaths> {
        std::fs::create_dir_all(&self.dir).with_path(&self.dir, "create reports directory")?;

        let timestamped = self.dir.join(Self::report_name(at));
        let latest = self.dir.join(LATEST_REPORT_NAME);
        let text = serde_json::to_string_pretty(result).with_path(&timestamped, "encode report")?;

        std::fs::write(&timestamped, &text).with_path(&timestamped, "write report")?;
        std::fs::write(&latest, &text).with_path(&latest, "write latest report")?;

        info!(report = %timestamped.display(), "report written");
        Ok(ReportPaths { timestamped, latest })
    }
}
