//! Output module for analysis reports
//!
//! This module handles:
//! - The [`AnalysisReport`] produced by a finished run
//! - Crawl statistics derived from the fetch log
//! - Writing reports as JSON, markdown and into a SQLite archive

mod json;
mod markdown;
mod report;
mod sqlite_output;
pub mod stats;
mod traits;

pub use json::JsonReportWriter;
pub use markdown::{format_markdown_report, MarkdownReportWriter};
pub use report::{AnalysisReport, FailureRecord, PageDetail, ReportKeyword, NO_RESULTS_SUMMARY};
pub use sqlite_output::{insert_report, open_database, SqliteReportWriter};
pub use stats::{format_statistics, print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, ReportWriter};

use crate::config::OutputConfig;
use tracing::info;

/// Builds a writer for every destination named in the output config
pub fn configured_writers(config: &OutputConfig) -> Vec<Box<dyn ReportWriter>> {
    let mut writers: Vec<Box<dyn ReportWriter>> = Vec::new();
    if let Some(path) = &config.report_path {
        writers.push(Box::new(JsonReportWriter::new(path)));
    }
    if let Some(path) = &config.summary_path {
        writers.push(Box::new(MarkdownReportWriter::new(path)));
    }
    if let Some(path) = &config.database_path {
        writers.push(Box::new(SqliteReportWriter::new(path)));
    }
    writers
}

/// Writes a report to every configured destination
///
/// Stops at the first failing writer.
pub fn write_reports(config: &OutputConfig, report: &AnalysisReport) -> OutputResult<usize> {
    let writers = configured_writers(config);
    for writer in &writers {
        writer.write(report)?;
        info!("Wrote {}", writer.describe());
    }
    Ok(writers.len())
}
