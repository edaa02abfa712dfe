//! Markdown report generation
//!
//! Renders an [`AnalysisReport`] as a human-readable document: the combined
//! summary first, then per-page details, failures and crawl statistics.

use crate::output::traits::{OutputResult, ReportWriter};
use crate::output::AnalysisReport;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Writes reports as markdown files
pub struct MarkdownReportWriter {
    path: PathBuf,
}

impl MarkdownReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportWriter for MarkdownReportWriter {
    fn write(&self, report: &AnalysisReport) -> OutputResult<()> {
        let markdown = format_markdown_report(report);

        let mut file = File::create(&self.path)?;
        file.write_all(markdown.as_bytes())?;

        Ok(())
    }

    fn describe(&self) -> String {
        format!("markdown summary at {}", self.path.display())
    }
}

/// Formats a report as markdown
///
/// # Arguments
///
/// * `report` - The finished analysis report
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_report(report: &AnalysisReport) -> String {
    let mut md = String::new();

    md.push_str("# Sift-Crawl Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Query**: {}\n", report.query));
    md.push_str(&format!("- **Source URL**: {}\n", report.source_url));
    md.push_str(&format!(
        "- **Generated**: {}\n",
        report.generated_at.to_rfc3339()
    ));
    md.push_str(&format!("- **Termination**: {}\n", report.termination));
    md.push_str(&format!(
        "- **Cumulative Score**: {:.2}\n",
        report.cumulative_score
    ));
    md.push_str(&format!(
        "- **Collected Pages**: {}\n",
        report.collected_pages
    ));
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Keywords
    if !report.keywords.is_empty() {
        md.push_str(&format!(
            "## Keywords ({})\n\n",
            report.keyword_source
        ));
        for keyword in &report.keywords {
            md.push_str(&format!("- {} ({:.1})\n", keyword.term, keyword.weight));
        }
        md.push('\n');
    }

    md.push_str("## Summary\n\n");
    md.push_str(report.summary.trim());
    md.push_str("\n\n");

    if !report.key_points.is_empty() {
        md.push_str("## Key Points\n\n");
        for point in &report.key_points {
            md.push_str(&format!("- {}\n", point));
        }
        md.push('\n');
    }

    if !report.details.is_empty() {
        md.push_str("## Pages\n\n");
        for detail in &report.details {
            let title = if detail.title.is_empty() {
                detail.url.as_str()
            } else {
                detail.title.as_str()
            };
            md.push_str(&format!("### {}\n\n", title));
            md.push_str(&format!(
                "- **URL**: {}\n- **Depth**: {}\n- **Score**: {:.2}\n\n",
                detail.url, detail.depth, detail.score
            ));
            if !detail.content_summary.trim().is_empty() {
                md.push_str(detail.content_summary.trim());
                md.push_str("\n\n");
            }
        }
    }

    if !report.failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| URL | Depth | Error |\n");
        md.push_str("|-----|-------|-------|\n");
        for failure in &report.failures {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                failure.url, failure.depth, failure.error
            ));
        }
        md.push('\n');
    }

    // Statistics
    let stats = &report.statistics;
    md.push_str("## Crawl Statistics\n\n");
    md.push_str(&format!("- **Pages Fetched**: {}\n", stats.pages_fetched));
    md.push_str(&format!(
        "- **Pages Collected**: {} ({:.1}%)\n",
        stats.pages_collected,
        stats.collection_rate()
    ));
    md.push_str(&format!("- **Pages Discarded**: {}\n", stats.pages_discarded));
    md.push_str(&format!("- **Pages Failed**: {}\n", stats.pages_failed));
    md.push_str(&format!(
        "- **Abandoned In Flight**: {}\n",
        stats.abandoned_in_flight
    ));
    md.push_str(&format!(
        "- **Frontier Remaining**: {}\n",
        stats.frontier_remaining
    ));
    md.push_str(&format!("- **Elapsed**: {} ms\n", stats.elapsed_ms));

    if !stats.depth_breakdown.is_empty() {
        md.push_str("\n### Pages by Depth\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, count) in &stats.depth_breakdown {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
    }

    md
}
