// sheetload-core/src/domain/transform.rs
//
// RawGrid -> CanonicalRecords. Pure: no I/O, no hidden state.

use crate::domain::coercion::{CoercionStats, coerce_currency, coerce_date, coerce_integer};
use crate::domain::grid::{RawGrid, cell};
use crate::domain::record::CanonicalRecord;
use crate::domain::schema::CanonicalField;

#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub records: Vec<CanonicalRecord>,
    pub stats: CoercionStats,
}

/// Header position of each canonical field (None when the sheet lacks it).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    positions: [Option<usize>; CanonicalField::COUNT],
}

impl ColumnMap {
    /// Unknown headers are ignored; on duplicates the first occurrence wins.
    pub fn from_header(header: &[String]) -> Self {
        let mut positions = [None; CanonicalField::COUNT];
        for (idx, name) in header.iter().enumerate() {
            if let Some(field) = CanonicalField::from_header(name)
                && positions[field.index()].is_none()
            {
                positions[field.index()] = Some(idx);
            }
        }
        Self { positions }
    }

    pub fn position(&self, field: CanonicalField) -> Option<usize> {
        self.positions[field.index()]
    }

    pub fn missing(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .filter(|f| self.position(*f).is_none())
            .collect()
    }

    fn raw<'r>(&self, row: &'r [String], field: CanonicalField) -> &'r str {
        match self.position(field) {
            Some(idx) => cell(row, idx),
            None => "",
        }
    }
}

/// Converts every data row into exactly one record, in source order.
/// Per-cell failures substitute null / 0.0 and are counted in the stats.
pub fn transform(grid: &RawGrid) -> TransformOutput {
    let Some(header) = grid.header() else {
        return TransformOutput::default();
    };

    let columns = ColumnMap::from_header(header);
    let mut stats = CoercionStats {
        missing_columns: columns.missing(),
        ..Default::default()
    };

    let records = grid
        .data_rows()
        .map(|row| build_record(&columns, row, &mut stats))
        .collect();

    TransformOutput { records, stats }
}

fn build_record(columns: &ColumnMap, row: &[String], stats: &mut CoercionStats) -> CanonicalRecord {
    let text = |field: CanonicalField| columns.raw(row, field).to_string();

    let mut currency = |field: CanonicalField| {
        let c = coerce_currency(columns.raw(row, field));
        stats.record(field, &c);
        c.value
    };
    let amount_allocated_to_spend_on_team_usd =
        currency(CanonicalField::AmountAllocatedToSpendOnTeamUsd);
    let amount_used_usd = currency(CanonicalField::AmountUsedUsd);
    let total_fan_budget_zmw = currency(CanonicalField::TotalFanBudgetZmw);
    let budget_approved_zmw = currency(CanonicalField::BudgetApprovedZmw);

    let year = coerce_integer(columns.raw(row, CanonicalField::SupportYear));
    stats.record(CanonicalField::SupportYear, &year);

    let updated = coerce_date(columns.raw(row, CanonicalField::LastUpdated));
    stats.record(CanonicalField::LastUpdated, &updated);

    CanonicalRecord {
        officer: text(CanonicalField::Officer),
        football_club: text(CanonicalField::FootballClub),
        support_year: year.value,
        support_quarter: text(CanonicalField::SupportQuarter),
        amount_allocated_to_spend_on_team_usd,
        amount_used_usd,
        total_fan_budget_zmw,
        budget_approved_zmw,
        sex_of_officer: text(CanonicalField::SexOfOfficer),
        dept: text(CanonicalField::Dept),
        support_status: text(CanonicalField::SupportStatus),
        last_updated: updated.value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        RawGrid::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    const FULL_HEADER: [&str; 12] = [
        "Officer",
        "Football Club",
        "Support Year",
        "Support Quarter",
        "Amount Allocated to Spend on Team (USD)",
        "Amount Used (USD)",
        "Total Fan Budget (ZMW)",
        "Budget Approved (ZMW)",
        "Sex",
        "Department",
        "Support Status",
        "Last updated",
    ];

    #[test]
    fn test_end_to_end_partial_header() {
        let g = grid(&[
            &[
                "Officer",
                "Football Club",
                "Support Year",
                "Amount Used (USD)",
                "Last updated",
            ],
            &["Jane", "FC Alpha", "2024", "$350.00", "3/1/2024"],
        ]);

        let out = transform(&g);
        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        assert_eq!(r.officer, "Jane");
        assert_eq!(r.football_club, "FC Alpha");
        assert_eq!(r.support_year, Some(2024));
        assert_eq!(r.amount_used_usd, 350.0);
        assert_eq!(r.last_updated, NaiveDate::from_ymd_opt(2024, 3, 1));

        // Absent columns get their defaults, and are reported
        assert_eq!(r.support_quarter, "");
        assert_eq!(r.budget_approved_zmw, 0.0);
        assert_eq!(out.stats.missing_columns.len(), 7);
        assert!(
            out.stats
                .missing_columns
                .contains(&CanonicalField::SupportStatus)
        );
        assert_eq!(out.stats.total_failures(), 0);
    }

    #[test]
    fn test_one_record_per_row_in_order() {
        let mut rows: Vec<Vec<String>> = vec![FULL_HEADER.iter().map(|h| h.to_string()).collect()];
        for i in 0..50 {
            rows.push(vec![format!("officer-{i}"), "Club".into(), "TBD".into()]);
        }
        let out = transform(&RawGrid::new(rows));

        assert_eq!(out.records.len(), 50);
        for (i, r) in out.records.iter().enumerate() {
            assert_eq!(r.officer, format!("officer-{i}"));
            assert_eq!(r.support_year, None);
        }
        assert_eq!(out.stats.failures_for(CanonicalField::SupportYear), 50);
        assert!(out.stats.missing_columns.is_empty());
    }

    #[test]
    fn test_column_order_independent_and_extra_columns_dropped() {
        let g = grid(&[
            &["Notes", "Budget Approved (ZMW)", "Officer", "Sex"],
            &["ignore me", "ZMW 1,000", "Mwila", "F"],
        ]);
        let out = transform(&g);
        let r = &out.records[0];
        assert_eq!(r.officer, "Mwila");
        assert_eq!(r.budget_approved_zmw, 1000.0);
        assert_eq!(r.sex_of_officer, "F");
    }

    #[test]
    fn test_malformed_cells_never_drop_rows() {
        let g = grid(&[
            &FULL_HEADER,
            &[
                "A", "B", "TBD", "Q1", "lots", "$12.50", "", "1.2.3", "M", "Ops", "Open", "never",
            ],
        ]);
        let out = transform(&g);
        assert_eq!(out.records.len(), 1);
        let r = &out.records[0];
        assert_eq!(r.support_year, None);
        assert_eq!(r.amount_allocated_to_spend_on_team_usd, 0.0);
        assert_eq!(r.amount_used_usd, 12.5);
        assert_eq!(r.total_fan_budget_zmw, 0.0);
        assert_eq!(r.budget_approved_zmw, 0.0);
        assert_eq!(r.last_updated, None);

        assert_eq!(out.stats.failures_for(CanonicalField::SupportYear), 1);
        assert_eq!(
            out.stats
                .failures_for(CanonicalField::AmountAllocatedToSpendOnTeamUsd),
            1
        );
        // blank cell is a default, not a failure
        assert_eq!(out.stats.failures_for(CanonicalField::TotalFanBudgetZmw), 0);
        assert_eq!(out.stats.failures_for(CanonicalField::BudgetApprovedZmw), 1);
        assert_eq!(out.stats.failures_for(CanonicalField::LastUpdated), 1);
    }

    #[test]
    fn test_short_rows_and_empty_strings_pass_through() {
        let g = grid(&[&FULL_HEADER, &["Only Officer"]]);
        let out = transform(&g);
        let r = &out.records[0];
        assert_eq!(r.officer, "Only Officer");
        assert_eq!(r.football_club, "");
        assert_eq!(r.dept, "");
        assert_eq!(r.support_year, None);
        assert_eq!(out.stats.total_failures(), 0);
    }

    #[test]
    fn test_duplicate_header_first_wins() {
        let g = grid(&[&["Officer", "Officer"], &["first", "second"]]);
        let out = transform(&g);
        assert_eq!(out.records[0].officer, "first");
    }

    #[test]
    fn test_empty_grid_yields_nothing() {
        assert!(transform(&RawGrid::default()).records.is_empty());
        assert!(transform(&grid(&[&FULL_HEADER])).records.is_empty());
    }
}
