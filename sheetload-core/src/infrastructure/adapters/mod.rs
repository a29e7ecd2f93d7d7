pub mod duckdb;
pub mod google_sheets;

pub use duckdb::DuckDBConnector;
pub use google_sheets::{ClientOptions, GoogleSheetsClient};
