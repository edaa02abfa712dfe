//! SQLite report archive
//!
//! Every analysis run is appended to a local database so earlier results can
//! be compared or queried later.

use crate::output::traits::{OutputResult, ReportWriter};
use crate::output::AnalysisReport;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// SQL schema for the report archive
pub const SCHEMA_SQL: &str = r#"
-- One row per analysis run
CREATE TABLE IF NOT EXISTS reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    query TEXT NOT NULL,
    source_url TEXT NOT NULL,
    keyword_source TEXT NOT NULL,
    termination TEXT NOT NULL,
    cumulative_score REAL NOT NULL,
    collected_pages INTEGER NOT NULL,
    summary TEXT NOT NULL,
    statistics TEXT NOT NULL,
    config_hash TEXT,
    generated_at TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);

-- Collected pages of each run
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL REFERENCES reports(id),
    url TEXT NOT NULL,
    title TEXT,
    depth INTEGER NOT NULL,
    score REAL NOT NULL,
    content_summary TEXT
);

CREATE INDEX IF NOT EXISTS idx_pages_report ON pages(report_id);

-- Key points of the combined summary
CREATE TABLE IF NOT EXISTS key_points (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL REFERENCES reports(id),
    position INTEGER NOT NULL,
    point TEXT NOT NULL
);

-- Fetches that failed
CREATE TABLE IF NOT EXISTS failures (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    report_id INTEGER NOT NULL REFERENCES reports(id),
    url TEXT NOT NULL,
    depth INTEGER NOT NULL,
    kind TEXT NOT NULL,
    error TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_failures_report ON failures(report_id);
"#;

/// Opens (or creates) a report database and applies the schema
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(Connection)` - Successfully opened/created database
/// * `Err(rusqlite::Error)` - Failed to open database
pub fn open_database(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        "#,
    )?;
    conn.execute_batch(SCHEMA_SQL)?;

    Ok(conn)
}

/// Inserts one report and its rows in a single transaction
///
/// Returns the new report id.
pub fn insert_report(conn: &mut Connection, report: &AnalysisReport) -> OutputResult<i64> {
    let statistics = serde_json::to_string(&report.statistics)?;
    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO reports (query, source_url, keyword_source, termination, cumulative_score,
                              collected_pages, summary, statistics, config_hash, generated_at,
                              recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            report.query,
            report.source_url,
            report.keyword_source,
            report.termination.as_str(),
            report.cumulative_score,
            report.collected_pages as i64,
            report.summary,
            statistics,
            report.config_hash,
            report.generated_at.to_rfc3339(),
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    let report_id = tx.last_insert_rowid();

    for detail in &report.details {
        tx.execute(
            "INSERT INTO pages (report_id, url, title, depth, score, content_summary)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                report_id,
                detail.url,
                detail.title,
                detail.depth,
                detail.score,
                detail.content_summary
            ],
        )?;
    }

    for (position, point) in report.key_points.iter().enumerate() {
        tx.execute(
            "INSERT INTO key_points (report_id, position, point) VALUES (?1, ?2, ?3)",
            params![report_id, position as i64, point],
        )?;
    }

    for failure in &report.failures {
        tx.execute(
            "INSERT INTO failures (report_id, url, depth, kind, error)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                report_id,
                failure.url,
                failure.depth,
                failure.kind,
                failure.error
            ],
        )?;
    }

    tx.commit()?;
    Ok(report_id)
}

/// Appends reports to a SQLite database
pub struct SqliteReportWriter {
    path: PathBuf,
}

impl SqliteReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportWriter for SqliteReportWriter {
    fn write(&self, report: &AnalysisReport) -> OutputResult<()> {
        let mut conn = open_database(&self.path)?;
        insert_report(&mut conn, report)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("report database at {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::TerminationReason;
    use crate::output::{CrawlStatistics, FailureRecord, PageDetail};
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            query: "financial aid".to_string(),
            source_url: "https://example.edu/".to_string(),
            keywords: Vec::new(),
            keyword_source: "llm".to_string(),
            termination: TerminationReason::StoppedByExhaustion,
            cumulative_score: 75.5,
            collected_pages: 2,
            summary: "Aid deadlines are in March.".to_string(),
            key_points: vec!["FAFSA due March 1".to_string(), "Grants available".to_string()],
            details: vec![
                PageDetail {
                    title: "Aid".to_string(),
                    url: "https://example.edu/aid".to_string(),
                    depth: 1,
                    score: 50.5,
                    content_summary: "Deadlines.".to_string(),
                    key_points: Vec::new(),
                },
                PageDetail {
                    title: "Grants".to_string(),
                    url: "https://example.edu/grants".to_string(),
                    depth: 2,
                    score: 25.0,
                    content_summary: "Grants.".to_string(),
                    key_points: Vec::new(),
                },
            ],
            failures: vec![FailureRecord {
                url: "https://example.edu/down".to_string(),
                depth: 1,
                kind: "timeout".to_string(),
                error: "request timed out".to_string(),
            }],
            statistics: CrawlStatistics::default(),
            config_hash: None,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_report_rows() {
        let dir = TempDir::new().unwrap();
        let mut conn = open_database(&dir.path().join("reports.db")).unwrap();

        let id = insert_report(&mut conn, &sample_report()).unwrap();

        let termination: String = conn
            .query_row(
                "SELECT termination FROM reports WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(termination, "stopped_by_exhaustion");

        let pages: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pages WHERE report_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(pages, 2);

        let first_point: String = conn
            .query_row(
                "SELECT point FROM key_points WHERE report_id = ?1 ORDER BY position LIMIT 1",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(first_point, "FAFSA due March 1");

        let failure_kind: String = conn
            .query_row(
                "SELECT kind FROM failures WHERE report_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(failure_kind, "timeout");
    }

    #[test]
    fn test_writer_appends_runs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports.db");
        let writer = SqliteReportWriter::new(&path);

        writer.write(&sample_report()).unwrap();
        writer.write(&sample_report()).unwrap();

        let conn = open_database(&path).unwrap();
        let runs: i64 = conn
            .query_row("SELECT COUNT(*) FROM reports", [], |row| row.get(0))
            .unwrap();
        assert_eq!(runs, 2);
    }
}
