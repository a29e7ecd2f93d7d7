// sheetload-core/src/ports/mod.rs

pub mod connector;
pub mod sheets;

pub use connector::{ColumnSchema, Connector, TableDefinition};
pub use sheets::SheetSource;
