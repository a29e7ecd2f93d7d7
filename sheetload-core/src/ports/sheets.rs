// sheetload-core/src/ports/sheets.rs

// Read side of the spreadsheet service. The Google adapter implements it over
// HTTP; tests implement it in memory.

use crate::domain::grid::RawGrid;
use crate::domain::sheet::SpreadsheetMetadata;
use crate::error::SheetloadError;
use async_trait::async_trait;

#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Spreadsheet title plus every sheet's numeric id and current title.
    async fn spreadsheet_metadata(
        &self,
        spreadsheet_id: &str,
    ) -> Result<SpreadsheetMetadata, SheetloadError>;

    /// Cell values of `range` (A1 notation) as formatted strings.
    async fn values(&self, spreadsheet_id: &str, range: &str) -> Result<RawGrid, SheetloadError>;
}
