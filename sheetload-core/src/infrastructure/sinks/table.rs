// sheetload-core/src/infrastructure/sinks/table.rs

use tracing::{info, instrument};

use crate::domain::record::CanonicalRecord;
use crate::error::SheetloadError;
use crate::infrastructure::adapters::duckdb::quote_ident;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::connector::{Connector, TableDefinition};

/// Full replace of `table_name` with `records`, then a row count check.
#[instrument(skip(connector, records), fields(engine = connector.engine_name(), rows = records.len()))]
pub async fn write_table(
    connector: &dyn Connector,
    table_name: &str,
    records: &[CanonicalRecord],
) -> Result<u64, SheetloadError> {
    let definition = TableDefinition::canonical(table_name);

    let written = connector
        .replace_table(&definition, records)
        .await
        .map_err(|e| export_error(table_name, e.to_string()))?;

    let stored = connector
        .query_scalar(&format!("SELECT COUNT(*) FROM {}", quote_ident(table_name)))
        .await
        .map_err(|e| export_error(table_name, e.to_string()))?;

    if stored != written {
        return Err(export_error(
            table_name,
            format!("wrote {} rows but the table holds {}", written, stored),
        ));
    }

    info!(table = table_name, rows = stored, "Table replaced");
    Ok(stored)
}

fn export_error(table_name: &str, reason: String) -> SheetloadError {
    InfrastructureError::Export {
        sink: "table",
        target: table_name.to_string(),
        reason,
    }
    .into()
}
