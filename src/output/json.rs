use crate::output::traits::{OutputResult, ReportWriter};
use crate::output::AnalysisReport;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Writes reports as pretty-printed JSON
pub struct JsonReportWriter {
    path: PathBuf,
}

impl JsonReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportWriter for JsonReportWriter {
    fn write(&self, report: &AnalysisReport) -> OutputResult<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("JSON report at {}", self.path.display())
    }
}
