// sheetload-core/src/application/export.rs
//
// USE CASE: push one extraction into the file sink, the table sink, or both.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::record::CanonicalRecord;
use crate::error::SheetloadError;
use crate::infrastructure::adapters::DuckDBConnector;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::ensure_parent_dir;
use crate::infrastructure::sinks::{write_csv, write_table};
use crate::ports::connector::Connector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTarget {
    Csv,
    Table,
    All,
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportTarget::Csv => "csv",
            ExportTarget::Table => "table",
            ExportTarget::All => "all",
        })
    }
}

/// File sink, off the async runtime.
pub async fn export_csv(
    records: Arc<[CanonicalRecord]>,
    path: PathBuf,
) -> Result<u64, SheetloadError> {
    tokio::task::spawn_blocking(move || write_csv(&records, &path))
        .await
        .map_err(|e| SheetloadError::InternalError(format!("CSV writer task failed: {}", e)))?
}

pub async fn export_table(
    records: &[CanonicalRecord],
    table_name: &str,
    connector: &dyn Connector,
) -> Result<u64, SheetloadError> {
    write_table(connector, table_name, records).await
}

/// Both sinks at once. Neither waits for, nor is cancelled by, the other.
pub async fn export_all(
    records: Arc<[CanonicalRecord]>,
    csv_path: &Path,
    table_name: &str,
    connector: &dyn Connector,
) -> (Result<u64, SheetloadError>, Result<u64, SheetloadError>) {
    tokio::join!(
        export_csv(Arc::clone(&records), csv_path.to_path_buf()),
        export_table(&records, table_name, connector)
    )
}

/// Opens (or creates) the DuckDB file behind the table sink. Failing to do so
/// is a table sink failure.
pub fn open_database(path: &Path) -> Result<DuckDBConnector, SheetloadError> {
    let target = path.display().to_string();
    let open = || -> Result<DuckDBConnector, InfrastructureError> {
        ensure_parent_dir(path)?;
        DuckDBConnector::new(&path.to_string_lossy())
    };
    open().map_err(|e| {
        InfrastructureError::Export {
            sink: "table",
            target,
            reason: e.to_string(),
        }
        .into()
    })
}
