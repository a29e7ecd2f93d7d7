// sheetload-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::{AccessMode, Config, Connection, params_from_iter};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{Span, debug, instrument};

use crate::domain::record::{CanonicalRecord, FieldValue};
use crate::error::SheetloadError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::{ColumnSchema, Connector, TableDefinition};

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self::from_connection(conn))
    }

    /// Existing database file, opened so that nothing can be written through it.
    pub fn open_read_only(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// First `limit` rows of `table`, every column rendered as text.
    /// SQL NULL comes back as `None`.
    pub fn sample_rows(
        &self,
        table: &str,
        columns: &[ColumnSchema],
        limit: usize,
    ) -> Result<Vec<Vec<Option<String>>>, SheetloadError> {
        let conn = lock(&self.conn)?;
        let select_list: Vec<String> = columns
            .iter()
            .map(|c| format!("CAST({} AS VARCHAR)", quote_ident(&c.name)))
            .collect();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} LIMIT {}",
            select_list.join(", "),
            quote_ident(table),
            limit
        ))?;
        let mut rows = stmt.query([])?;

        let mut sample = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                values.push(row.get::<_, Option<String>>(i)?);
            }
            sample.push(values);
        }
        Ok(sample)
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, SheetloadError> {
    conn.lock()
        .map_err(|_| InfrastructureError::Database(DatabaseError::Poisoned).into())
}

/// Double-quoted SQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `CREATE OR REPLACE TABLE` with the declared column types.
pub fn replace_table_ddl(table: &TableDefinition) -> String {
    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| {
            let null = if c.is_nullable { "" } else { " NOT NULL" };
            format!("    {} {}{}", quote_ident(&c.name), c.data_type, null)
        })
        .collect();
    format!(
        "CREATE OR REPLACE TABLE {} (\n{}\n)",
        quote_ident(&table.name),
        columns.join(",\n")
    )
}

/// Positional INSERT; DATE columns are bound as ISO text and cast.
pub fn insert_sql(table: &TableDefinition) -> String {
    let names: Vec<String> = table.columns.iter().map(|c| quote_ident(&c.name)).collect();
    let placeholders: Vec<String> = table
        .columns
        .iter()
        .map(|c| {
            if c.data_type == "DATE" {
                "CAST(? AS DATE)".to_string()
            } else {
                "?".to_string()
            }
        })
        .collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(&table.name),
        names.join(", "),
        placeholders.join(", ")
    )
}

fn to_sql_value(value: FieldValue<'_>) -> Value {
    match value {
        FieldValue::Text(s) => Value::Text(s.to_string()),
        FieldValue::Integer(Some(i)) => Value::BigInt(i),
        FieldValue::Float(f) => Value::Double(f),
        FieldValue::Date(Some(d)) => Value::Text(d.format("%Y-%m-%d").to_string()),
        FieldValue::Integer(None) | FieldValue::Date(None) => Value::Null,
    }
}

// Runs on a blocking thread; dropping the transaction without commit rolls
// everything back, so a failed insert leaves the previous table in place.
fn load_table(
    conn: &mut Connection,
    table: &TableDefinition,
    rows: &[CanonicalRecord],
) -> Result<u64, SheetloadError> {
    let tx = conn.transaction()?;
    tx.execute_batch(&replace_table_ddl(table))?;
    {
        let mut stmt = tx.prepare(&insert_sql(table))?;
        for record in rows {
            stmt.execute(params_from_iter(record.values().map(to_sql_value)))?;
        }
    }
    tx.commit()?;
    Ok(rows.len() as u64)
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, SheetloadError> {
        let conn = lock(&self.conn)?;

        let mut stmt = conn.prepare(&format!(
            "PRAGMA table_info('{}')",
            table_name.replace('\'', "''")
        ))?;

        let rows = stmt.query_map([], |row| {
            Ok(ColumnSchema {
                name: row.get("name")?,
                data_type: row.get("type")?,
                is_nullable: !row.get::<_, bool>("notnull")?,
            })
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }

        Ok(columns)
    }

    async fn query_scalar(&self, query: &str) -> Result<u64, SheetloadError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(query)?;
        let mut rows = stmt.query([])?;

        let row = rows
            .next()?
            .ok_or_else(|| SheetloadError::InternalError("No scalar value returned".into()))?;

        let value: u64 = row.get(0)?;
        Ok(value)
    }

    #[instrument(skip(self, table, rows), fields(table = %table.name, rows = rows.len()))]
    async fn replace_table(
        &self,
        table: &TableDefinition,
        rows: &[CanonicalRecord],
    ) -> Result<u64, SheetloadError> {
        let conn = Arc::clone(&self.conn);
        let table = table.clone();
        let rows = rows.to_vec();
        let span = Span::current();

        let written = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            let mut conn = lock(&conn)?;
            load_table(&mut conn, &table, &rows)
        })
        .await
        .map_err(|e| SheetloadError::InternalError(format!("table load task failed: {}", e)))??;

        debug!("Table replaced");
        Ok(written)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::NaiveDate;

    fn record(officer: &str, year: Option<i64>, updated: Option<NaiveDate>) -> CanonicalRecord {
        CanonicalRecord {
            officer: officer.to_string(),
            football_club: "FC Alpha".to_string(),
            support_year: year,
            support_quarter: "Q1".to_string(),
            amount_allocated_to_spend_on_team_usd: 350.0,
            amount_used_usd: 0.0,
            total_fan_budget_zmw: 0.0,
            budget_approved_zmw: 0.0,
            sex_of_officer: String::new(),
            dept: String::new(),
            support_status: String::new(),
            last_updated: updated,
        }
    }

    #[tokio::test]
    async fn test_read_only_inspection_of_loaded_table() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("fans.duckdb");
        let path = path.to_string_lossy();
        {
            let writer = DuckDBConnector::new(&path)?;
            let rows = vec![
                record("Jane", Some(2024), NaiveDate::from_ymd_opt(2024, 3, 1)),
                record("Bwalya", None, None),
            ];
            writer
                .replace_table(&TableDefinition::canonical("fan_support"), &rows)
                .await?;
        }

        let reader = DuckDBConnector::open_read_only(&path)?;
        let columns = reader.fetch_columns("fan_support").await?;
        assert_eq!(columns.len(), 12);

        let sample = reader.sample_rows("fan_support", &columns, 1)?;
        assert_eq!(sample.len(), 1);
        assert_eq!(sample[0][0].as_deref(), Some("Jane"));
        assert_eq!(sample[0][2].as_deref(), Some("2024"));
        assert_eq!(sample[0][11].as_deref(), Some("2024-03-01"));

        let all = reader.sample_rows("fan_support", &columns, 10)?;
        assert_eq!(all[1][2], None);

        // Writes are refused through a read-only handle
        let res = reader
            .replace_table(&TableDefinition::canonical("fan_support"), &[])
            .await;
        assert!(res.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_table_has_no_columns_or_rows() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        let columns = connector.fetch_columns("ghost_table").await.unwrap_or_default();
        assert!(columns.is_empty());
        assert!(connector.sample_rows("ghost_table", &columns, 5).is_err());
        Ok(())
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_replace_table_leaves_runtime_responsive() -> Result<()> {
        use std::sync::atomic::{AtomicU64, Ordering};

        let connector = DuckDBConnector::new(":memory:")?;
        let def = TableDefinition::canonical("fan_support");
        let rows: Vec<_> = (0..2_000)
            .map(|i| record(&format!("o{i}"), Some(2024), None))
            .collect();

        let ticks = Arc::new(AtomicU64::new(0));
        let ticker = {
            let ticks = Arc::clone(&ticks);
            tokio::spawn(async move {
                loop {
                    ticks.fetch_add(1, Ordering::Relaxed);
                    tokio::task::yield_now().await;
                }
            })
        };

        let written = connector.replace_table(&def, &rows).await?;
        let seen = ticks.load(Ordering::Relaxed);
        ticker.abort();

        assert_eq!(written, 2_000);
        // The single runtime thread kept polling other tasks during the load
        assert!(seen > 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_table_declared_types() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        let def = TableDefinition::canonical("fan_support");

        // Empty load still creates a fully typed table
        let written = connector.replace_table(&def, &[]).await?;
        assert_eq!(written, 0);

        let columns = connector.fetch_columns("fan_support").await?;
        let types: Vec<(&str, &str)> = columns
            .iter()
            .map(|c| (c.name.as_str(), c.data_type.as_str()))
            .collect();
        assert_eq!(types[0], ("officer", "VARCHAR"));
        assert_eq!(types[2], ("support_year", "BIGINT"));
        assert_eq!(types[4], ("amount_allocated_to_spend_on_team_usd", "DOUBLE"));
        assert_eq!(types[11], ("last_updated", "DATE"));
        assert!(columns[2].is_nullable);
        assert!(!columns[4].is_nullable);
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_table_is_idempotent() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        let def = TableDefinition::canonical("fan_support");
        let rows = vec![
            record("Jane", Some(2024), NaiveDate::from_ymd_opt(2024, 3, 1)),
            record("Bwalya", None, None),
        ];

        connector.replace_table(&def, &rows).await?;
        connector.replace_table(&def, &rows).await?;

        let count = connector
            .query_scalar("SELECT COUNT(*) FROM fan_support")
            .await?;
        assert_eq!(count, 2);

        let nulls = connector
            .query_scalar("SELECT COUNT(*) FROM fan_support WHERE support_year IS NULL AND last_updated IS NULL")
            .await?;
        assert_eq!(nulls, 1);

        let march = connector
            .query_scalar("SELECT COUNT(*) FROM fan_support WHERE last_updated = DATE '2024-03-01'")
            .await?;
        assert_eq!(march, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_table_shrinks() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        let def = TableDefinition::canonical("fan_support");

        let five: Vec<_> = (0..5).map(|i| record(&format!("o{i}"), Some(2024), None)).collect();
        connector.replace_table(&def, &five).await?;
        connector.replace_table(&def, &five[..2]).await?;

        let count = connector
            .query_scalar("SELECT COUNT(*) FROM fan_support")
            .await?;
        assert_eq!(count, 2);
        Ok(())
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("fan_support"), "\"fan_support\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_replace_table_ddl() {
        let def = TableDefinition::canonical("fan_support");
        insta::assert_snapshot!(replace_table_ddl(&def), @r#"
        CREATE OR REPLACE TABLE "fan_support" (
            "officer" VARCHAR NOT NULL,
            "football_club" VARCHAR NOT NULL,
            "support_year" BIGINT,
            "support_quarter" VARCHAR NOT NULL,
            "amount_allocated_to_spend_on_team_usd" DOUBLE NOT NULL,
            "amount_used_usd" DOUBLE NOT NULL,
            "total_fan_budget_zmw" DOUBLE NOT NULL,
            "budget_approved_zmw" DOUBLE NOT NULL,
            "sex_of_officer" VARCHAR NOT NULL,
            "dept" VARCHAR NOT NULL,
            "support_status" VARCHAR NOT NULL,
            "last_updated" DATE
        )
        "#);
    }

    #[test]
    fn test_insert_sql_casts_dates() {
        let sql = insert_sql(&TableDefinition::canonical("t"));
        assert!(sql.starts_with("INSERT INTO \"t\" (\"officer\", "));
        assert!(sql.ends_with("?, CAST(? AS DATE))"));
        assert_eq!(sql.matches('?').count(), 12);
    }
}
