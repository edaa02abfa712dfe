//! Report writer trait and output errors

use crate::output::AnalysisReport;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to format output: {0}")]
    Format(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A destination for finished analysis reports
pub trait ReportWriter {
    /// Writes one report
    fn write(&self, report: &AnalysisReport) -> OutputResult<()>;

    /// Short label used in logs
    fn describe(&self) -> String;
}
