// sheetload-core/src/domain/sheet.rs

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetProperties {
    /// Stable numeric id (the `gid` in sheet URLs). Survives renames.
    pub sheet_id: u64,
    /// User-editable display name.
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetMetadata {
    pub spreadsheet_id: String,
    pub title: String,
    pub sheets: Vec<SheetProperties>,
}

impl SpreadsheetMetadata {
    /// Current title of the sheet carrying `sheet_id` (exact id match).
    pub fn title_for(&self, sheet_id: u64) -> Result<&str, DomainError> {
        self.sheets
            .iter()
            .find(|s| s.sheet_id == sheet_id)
            .map(|s| s.title.as_str())
            .ok_or_else(|| DomainError::SheetNotFound {
                spreadsheet_id: self.spreadsheet_id.clone(),
                sheet_id,
            })
    }

    pub fn sheet_ids(&self) -> Vec<u64> {
        self.sheets.iter().map(|s| s.sheet_id).collect()
    }
}

/// A1 reference for a whole sheet: `'Fan Support'`, inner quotes doubled.
pub fn whole_sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}
