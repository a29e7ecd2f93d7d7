// sheetload-core/src/ports/connector.rs

// What the table sink needs from a relational engine, without knowing which one.

use crate::domain::record::CanonicalRecord;
use crate::domain::schema::CanonicalField;
use crate::error::SheetloadError;
use async_trait::async_trait;

// Simple column description (engine independent)
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
}

/// Target table with explicit column types, so the downstream schema never
/// depends on what a given run's data looks like.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

impl TableDefinition {
    pub fn canonical(name: &str) -> Self {
        let columns = CanonicalField::ALL
            .iter()
            .map(|f| ColumnSchema {
                name: f.name().to_string(),
                data_type: f.field_type().sql_type().to_string(),
                is_nullable: f.field_type().is_nullable(),
            })
            .collect();
        Self {
            name: name.to_string(),
            columns,
        }
    }
}

#[async_trait]
pub trait Connector: Send + Sync {
    async fn fetch_columns(&self, table_name: &str) -> Result<Vec<ColumnSchema>, SheetloadError>;

    async fn query_scalar(&self, query: &str) -> Result<u64, SheetloadError>;

    /// Drop-and-recreate `table` and load `rows`, atomically for readers:
    /// they see either the previous table or the complete new one.
    async fn replace_table(
        &self,
        table: &TableDefinition,
        rows: &[CanonicalRecord],
    ) -> Result<u64, SheetloadError>;

    fn engine_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_definition() {
        let def = TableDefinition::canonical("fan_support");
        assert_eq!(def.name, "fan_support");
        assert_eq!(def.columns.len(), CanonicalField::COUNT);
        assert_eq!(def.columns[2].name, "support_year");
        assert_eq!(def.columns[2].data_type, "BIGINT");
        assert!(def.columns[2].is_nullable);
        assert_eq!(def.columns[4].data_type, "DOUBLE");
        assert!(!def.columns[4].is_nullable);
    }
}
