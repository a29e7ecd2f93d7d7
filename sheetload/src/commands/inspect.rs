// sheetload/src/commands/inspect.rs
//
// USE CASE: Inspect the exported DuckDB table (schema + sample rows).

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use std::path::Path;

use sheetload_core::infrastructure::adapters::DuckDBConnector;
use sheetload_core::infrastructure::adapters::duckdb::quote_ident;
use sheetload_core::ports::connector::Connector;

pub async fn execute(db_path: String, table: String, limit: usize) -> anyhow::Result<()> {
    if !Path::new(&db_path).exists() {
        anyhow::bail!(
            "❌ Database not found at: {}\n👉 Have you run 'sheetload export-table'?",
            db_path
        );
    }

    // Read-only so inspecting never blocks or touches a running export
    let connector = DuckDBConnector::open_read_only(&db_path)?;

    println!("\n🔍 Inspecting Table: '{}'", table);

    let columns = connector.fetch_columns(&table).await.unwrap_or_default();
    if columns.is_empty() {
        anyhow::bail!("❌ Table '{}' not found in {}", table, db_path);
    }

    let mut schema = Table::new();
    schema
        .load_preset(UTF8_FULL)
        .set_header(vec!["column", "type"]);
    for column in &columns {
        schema.add_row(vec![column.name.as_str(), column.data_type.as_str()]);
    }
    println!("{schema}");

    let total = connector
        .query_scalar(&format!("SELECT COUNT(*) FROM {}", quote_ident(&table)))
        .await?;
    println!(
        "   --- Rows ({} of {}) ---",
        (limit as u64).min(total),
        total
    );

    let mut sample = Table::new();
    sample
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(columns.iter().map(|c| c.name.as_str()));

    for row in connector.sample_rows(&table, &columns, limit)? {
        sample.add_row(
            row.into_iter()
                .map(|value| value.unwrap_or_else(|| "NULL".to_string())),
        );
    }
    println!("{sample}");

    Ok(())
}
