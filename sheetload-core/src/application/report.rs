// sheetload-core/src/application/report.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::time::Instant;

use crate::application::export::ExportTarget;
use crate::application::extract::ExtractOutput;
use crate::domain::coercion::CoercionStats;
use crate::error::{ErrorKind, SheetloadError};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

/// Result of one sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SinkOutcome {
    pub sink: &'static str,
    pub target: String,
    pub rows_written: u64,
    pub error_kind: Option<ErrorKind>,
    pub error: Option<String>,
}

impl SinkOutcome {
    pub fn from_result(
        sink: &'static str,
        target: impl Into<String>,
        result: &Result<u64, SheetloadError>,
    ) -> Self {
        let (rows_written, error_kind, error) = match result {
            Ok(rows) => (*rows, None, None),
            Err(e) => (0, Some(e.kind()), Some(e.to_string())),
        };
        Self {
            sink,
            target: target.into(),
            rows_written,
            error_kind,
            error,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error_kind.is_none()
    }
}

/// Summary of one run, written as JSON whether the run succeeded or not.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub target: ExportTarget,
    pub success: bool,
    pub spreadsheet_id: Option<String>,
    pub sheet_id: Option<u64>,
    pub title: Option<String>,
    pub rows_fetched: usize,
    pub records: usize,
    pub stats: CoercionStats,
    pub sinks: Vec<SinkOutcome>,
    pub error_kind: Option<ErrorKind>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn new(target: ExportTarget) -> Self {
        Self {
            target,
            success: false,
            spreadsheet_id: None,
            sheet_id: None,
            title: None,
            rows_fetched: 0,
            records: 0,
            stats: CoercionStats::default(),
            sinks: Vec::new(),
            error_kind: None,
            error: None,
            started_at: Utc::now(),
            duration_ms: 0,
        }
    }

    pub fn record_extract(&mut self, extract: &ExtractOutput) {
        self.title = Some(extract.title.clone());
        self.rows_fetched = extract.rows_fetched;
        self.records = extract.records.len();
        self.stats = extract.stats.clone();
    }

    pub fn finish(&mut self, started: Instant, error: Option<&SheetloadError>) {
        self.duration_ms = started.elapsed().as_millis() as u64;
        self.success = error.is_none();
        self.error_kind = error.map(|e| e.kind());
        self.error = error.map(|e| e.to_string());
    }

    pub fn save(&self, path: &Path) -> Result<(), InfrastructureError> {
        let json = serde_json::to_vec_pretty(self).map_err(std::io::Error::from)?;
        atomic_write(path, json)
    }
}
