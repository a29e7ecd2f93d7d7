// sheetload-core/src/application/mod.rs

pub mod export;
pub mod extract;
pub mod job;
pub mod report;

// --- RE-EXPORTS (FACADE PATTERN) ---
// The CLI only needs `use sheetload_core::application::{run_job, ExportTarget};`

pub use export::{ExportTarget, export_all, export_csv, export_table};
pub use extract::{ExtractOutput, extract, fetch, resolve_sheet_title};
pub use job::{execute, run_job};
pub use report::{RunReport, SinkOutcome};
