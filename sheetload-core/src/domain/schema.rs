// sheetload-core/src/domain/schema.rs
//
// The fixed relational schema the sheet is normalized into.
// Column order here IS the output column order of both sinks.

use serde::Serialize;

/// How a column is coerced from its raw string cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Passthrough, empty string stays empty.
    Text,
    /// Tolerant integer parse, null on failure.
    Integer,
    /// Decoration stripped float, 0.0 on failure.
    Currency,
    /// Best-effort date parse, null on failure.
    Date,
}

impl FieldType {
    pub fn sql_type(self) -> &'static str {
        match self {
            FieldType::Text => "VARCHAR",
            FieldType::Integer => "BIGINT",
            FieldType::Currency => "DOUBLE",
            FieldType::Date => "DATE",
        }
    }

    pub fn is_nullable(self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Officer,
    FootballClub,
    SupportYear,
    SupportQuarter,
    AmountAllocatedToSpendOnTeamUsd,
    AmountUsedUsd,
    TotalFanBudgetZmw,
    BudgetApprovedZmw,
    SexOfOfficer,
    Dept,
    SupportStatus,
    LastUpdated,
}

impl CanonicalField {
    pub const COUNT: usize = 12;

    pub const ALL: [CanonicalField; Self::COUNT] = [
        CanonicalField::Officer,
        CanonicalField::FootballClub,
        CanonicalField::SupportYear,
        CanonicalField::SupportQuarter,
        CanonicalField::AmountAllocatedToSpendOnTeamUsd,
        CanonicalField::AmountUsedUsd,
        CanonicalField::TotalFanBudgetZmw,
        CanonicalField::BudgetApprovedZmw,
        CanonicalField::SexOfOfficer,
        CanonicalField::Dept,
        CanonicalField::SupportStatus,
        CanonicalField::LastUpdated,
    ];

    /// Position in the output schema.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::Officer => "officer",
            CanonicalField::FootballClub => "football_club",
            CanonicalField::SupportYear => "support_year",
            CanonicalField::SupportQuarter => "support_quarter",
            CanonicalField::AmountAllocatedToSpendOnTeamUsd => {
                "amount_allocated_to_spend_on_team_usd"
            }
            CanonicalField::AmountUsedUsd => "amount_used_usd",
            CanonicalField::TotalFanBudgetZmw => "total_fan_budget_zmw",
            CanonicalField::BudgetApprovedZmw => "budget_approved_zmw",
            CanonicalField::SexOfOfficer => "sex_of_officer",
            CanonicalField::Dept => "dept",
            CanonicalField::SupportStatus => "support_status",
            CanonicalField::LastUpdated => "last_updated",
        }
    }

    /// Header as it appears in the source sheet.
    pub fn source_header(self) -> &'static str {
        match self {
            CanonicalField::Officer => "Officer",
            CanonicalField::FootballClub => "Football Club",
            CanonicalField::SupportYear => "Support Year",
            CanonicalField::SupportQuarter => "Support Quarter",
            CanonicalField::AmountAllocatedToSpendOnTeamUsd => {
                "Amount Allocated to Spend on Team (USD)"
            }
            CanonicalField::AmountUsedUsd => "Amount Used (USD)",
            CanonicalField::TotalFanBudgetZmw => "Total Fan Budget (ZMW)",
            CanonicalField::BudgetApprovedZmw => "Budget Approved (ZMW)",
            CanonicalField::SexOfOfficer => "Sex",
            CanonicalField::Dept => "Department",
            CanonicalField::SupportStatus => "Support Status",
            CanonicalField::LastUpdated => "Last updated",
        }
    }

    pub fn field_type(self) -> FieldType {
        match self {
            CanonicalField::SupportYear => FieldType::Integer,
            CanonicalField::AmountAllocatedToSpendOnTeamUsd
            | CanonicalField::AmountUsedUsd
            | CanonicalField::TotalFanBudgetZmw
            | CanonicalField::BudgetApprovedZmw => FieldType::Currency,
            CanonicalField::LastUpdated => FieldType::Date,
            _ => FieldType::Text,
        }
    }

    /// Maps a sheet header to its canonical field.
    ///
    /// Matching is trim + ASCII case-insensitive. The allocation header is long
    /// and has been re-worded in the sheet before, so anything starting with
    /// "Amount Allocated" maps to it.
    pub fn from_header(header: &str) -> Option<CanonicalField> {
        let header = header.trim();
        if header.is_empty() {
            return None;
        }

        if let Some(field) = Self::ALL
            .iter()
            .copied()
            .find(|f| f.source_header().eq_ignore_ascii_case(header))
        {
            return Some(field);
        }

        const ALLOCATED_PREFIX: &str = "amount allocated";
        let lowered = header.to_ascii_lowercase();
        if lowered.starts_with(ALLOCATED_PREFIX) {
            return Some(CanonicalField::AmountAllocatedToSpendOnTeamUsd);
        }

        None
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
