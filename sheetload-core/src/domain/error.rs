// sheetload-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("No sheet with id {sheet_id} in spreadsheet '{spreadsheet_id}'")]
    #[diagnostic(
        code(sheetload::domain::sheet_not_found),
        help("The sheet was deleted or the id is wrong. Titles can be renamed, ids cannot: check 'sheet_id' in the credential file.")
    )]
    SheetNotFound {
        spreadsheet_id: String,
        sheet_id: u64,
    },

    #[error("Spreadsheet '{0}' not found")]
    #[diagnostic(
        code(sheetload::domain::spreadsheet_not_found),
        help("Check 'spreadsheet_id' and that the spreadsheet is shared with the service account.")
    )]
    SpreadsheetNotFound(String),

    #[error("Range {range} not found in spreadsheet '{spreadsheet_id}'")]
    #[diagnostic(
        code(sheetload::domain::range_not_found),
        help("The sheet disappeared or was renamed between the metadata and values calls. Rerun the job.")
    )]
    RangeNotFound {
        spreadsheet_id: String,
        range: String,
    },

    #[error("Sheet '{title}' has no data rows ({rows} row(s) returned)")]
    #[diagnostic(code(sheetload::domain::empty_data))]
    EmptyData { title: String, rows: usize },
}
