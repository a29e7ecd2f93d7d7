// sheetload-core/src/application/extract.rs
//
// USE CASE: numeric sheet id -> current title -> raw grid -> canonical records.

use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::domain::coercion::CoercionStats;
use crate::domain::error::DomainError;
use crate::domain::grid::RawGrid;
use crate::domain::record::CanonicalRecord;
use crate::domain::sheet::whole_sheet_range;
use crate::domain::transform::transform;
use crate::error::SheetloadError;
use crate::infrastructure::config::CredentialBundle;
use crate::ports::sheets::SheetSource;

/// One extraction, shared read-only by every sink of the run.
#[derive(Debug, Clone)]
pub struct ExtractOutput {
    pub title: String,
    pub rows_fetched: usize,
    pub records: Arc<[CanonicalRecord]>,
    pub stats: CoercionStats,
}

/// Looks the sheet up by its stable numeric id, so renaming the tab in the
/// spreadsheet UI never breaks the job.
#[instrument(skip(source))]
pub async fn resolve_sheet_title(
    source: &dyn SheetSource,
    spreadsheet_id: &str,
    sheet_id: u64,
) -> Result<String, SheetloadError> {
    let metadata = source.spreadsheet_metadata(spreadsheet_id).await?;

    match metadata.title_for(sheet_id) {
        Ok(title) => {
            info!(title, spreadsheet = %metadata.title, "Sheet resolved");
            Ok(title.to_string())
        }
        Err(e) => {
            error!(available = ?metadata.sheet_ids(), "No sheet carries the configured id");
            Err(e.into())
        }
    }
}

/// Fetches `range`; a grid without at least one data row below the header
/// is an error, never an empty export.
#[instrument(skip(source))]
pub async fn fetch(
    source: &dyn SheetSource,
    spreadsheet_id: &str,
    range: &str,
) -> Result<RawGrid, SheetloadError> {
    let grid = source.values(spreadsheet_id, range).await?;

    if grid.is_empty() {
        return Err(DomainError::EmptyData {
            title: range.to_string(),
            rows: grid.row_count(),
        }
        .into());
    }

    info!(rows = grid.data_row_count(), "Grid fetched");
    Ok(grid)
}

#[instrument(skip_all, fields(spreadsheet_id = %bundle.spreadsheet_id(), sheet_id = bundle.sheet_id()))]
pub async fn extract(
    source: &dyn SheetSource,
    bundle: &CredentialBundle,
) -> Result<ExtractOutput, SheetloadError> {
    let title = resolve_sheet_title(source, bundle.spreadsheet_id(), bundle.sheet_id()).await?;
    let grid = fetch(source, bundle.spreadsheet_id(), &whole_sheet_range(&title)).await?;

    let output = transform(&grid);
    let stats = output.stats;

    if !stats.missing_columns.is_empty() {
        warn!(missing = ?stats.missing_columns, "Sheet lacks schema columns, filled with defaults");
    }
    for (field, count) in &stats.failures {
        warn!(field = field.name(), count, "Cells could not be coerced, defaults substituted");
    }
    info!(records = output.records.len(), "Records ready");

    Ok(ExtractOutput {
        title,
        rows_fetched: grid.data_row_count(),
        records: output.records.into(),
        stats,
    })
}
