// sheetload-core/src/infrastructure/sinks/csv.rs

use std::path::Path;
use tracing::{info, instrument};

use crate::domain::record::CanonicalRecord;
use crate::domain::schema::CanonicalField;
use crate::error::SheetloadError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_replace_with;

/// Writes `records` as CSV to `path`, replacing any previous file.
///
/// The header row is always the canonical column names, even for an empty
/// record set, so downstream readers never see a schema-less file. Dates are
/// ISO `YYYY-MM-DD`; null integers and dates are empty fields.
#[instrument(skip(records), fields(rows = records.len()))]
pub fn write_csv(records: &[CanonicalRecord], path: &Path) -> Result<u64, SheetloadError> {
    atomic_replace_with(path, |out| {
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);
        writer.write_record(CanonicalField::ALL.iter().map(|f| f.name()))?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()
    })
    .map_err(|e| export_error(path, e))?;

    info!(path = %path.display(), rows = records.len(), "CSV written");
    Ok(records.len() as u64)
}

fn export_error(path: &Path, err: InfrastructureError) -> SheetloadError {
    InfrastructureError::Export {
        sink: "csv",
        target: path.display().to_string(),
        reason: err.to_string(),
    }
    .into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use anyhow::Result;
    use chrono::NaiveDate;
    use std::fs;

    fn jane() -> CanonicalRecord {
        CanonicalRecord {
            officer: "Jane".to_string(),
            football_club: "FC Alpha".to_string(),
            support_year: Some(2024),
            support_quarter: String::new(),
            amount_allocated_to_spend_on_team_usd: 350.0,
            amount_used_usd: 0.0,
            total_fan_budget_zmw: 0.0,
            budget_approved_zmw: 0.0,
            sex_of_officer: String::new(),
            dept: String::new(),
            support_status: String::new(),
            last_updated: NaiveDate::from_ymd_opt(2024, 3, 1),
        }
    }

    #[test]
    fn test_write_csv() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out/fan_support.csv");

        let mut bwalya = jane();
        bwalya.officer = "Mulenga, B.".to_string();
        bwalya.support_year = None;
        bwalya.last_updated = None;

        let written = write_csv(&[jane(), bwalya], &path)?;
        assert_eq!(written, 2);

        insta::assert_snapshot!(fs::read_to_string(&path)?, @r#"
        officer,football_club,support_year,support_quarter,amount_allocated_to_spend_on_team_usd,amount_used_usd,total_fan_budget_zmw,budget_approved_zmw,sex_of_officer,dept,support_status,last_updated
        Jane,FC Alpha,2024,,350.0,0.0,0.0,0.0,,,,2024-03-01
        "Mulenga, B.",FC Alpha,,,350.0,0.0,0.0,0.0,,,,
        "#);
        Ok(())
    }

    #[test]
    fn test_empty_records_still_have_header() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("fan_support.csv");
        assert_eq!(write_csv(&[], &path)?, 0);

        let content = fs::read_to_string(&path)?;
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("officer,football_club,"));
        Ok(())
    }

    #[test]
    fn test_rewrite_replaces_previous_output() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("fan_support.csv");
        write_csv(&[jane(), jane(), jane()], &path)?;
        write_csv(&[jane()], &path)?;

        let content = fs::read_to_string(&path)?;
        assert_eq!(content.lines().count(), 2);
        Ok(())
    }

    #[test]
    fn test_unwritable_target_is_export_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        // A directory sits where the file should go
        let path = dir.path().join("taken");
        fs::create_dir(&path)?;

        let err = write_csv(&[jane()], &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExportError);
        assert!(err.to_string().contains("csv"));
        Ok(())
    }
}
