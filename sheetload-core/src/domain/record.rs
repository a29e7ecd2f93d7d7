// sheetload-core/src/domain/record.rs

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::schema::CanonicalField;

/// One typed, schema-mapped row. Field declaration order is the output
/// column order (the CSV writer serializes in this order).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub officer: String,
    pub football_club: String,
    pub support_year: Option<i64>,
    pub support_quarter: String,
    pub amount_allocated_to_spend_on_team_usd: f64,
    pub amount_used_usd: f64,
    pub total_fan_budget_zmw: f64,
    pub budget_approved_zmw: f64,
    pub sex_of_officer: String,
    pub dept: String,
    pub support_status: String,
    pub last_updated: Option<NaiveDate>,
}

/// Engine-neutral view of a single field, used by the table sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Integer(Option<i64>),
    Float(f64),
    Date(Option<NaiveDate>),
}

impl CanonicalRecord {
    pub fn get(&self, field: CanonicalField) -> FieldValue<'_> {
        match field {
            CanonicalField::Officer => FieldValue::Text(&self.officer),
            CanonicalField::FootballClub => FieldValue::Text(&self.football_club),
            CanonicalField::SupportYear => FieldValue::Integer(self.support_year),
            CanonicalField::SupportQuarter => FieldValue::Text(&self.support_quarter),
            CanonicalField::AmountAllocatedToSpendOnTeamUsd => {
                FieldValue::Float(self.amount_allocated_to_spend_on_team_usd)
            }
            CanonicalField::AmountUsedUsd => FieldValue::Float(self.amount_used_usd),
            CanonicalField::TotalFanBudgetZmw => FieldValue::Float(self.total_fan_budget_zmw),
            CanonicalField::BudgetApprovedZmw => FieldValue::Float(self.budget_approved_zmw),
            CanonicalField::SexOfOfficer => FieldValue::Text(&self.sex_of_officer),
            CanonicalField::Dept => FieldValue::Text(&self.dept),
            CanonicalField::SupportStatus => FieldValue::Text(&self.support_status),
            CanonicalField::LastUpdated => FieldValue::Date(self.last_updated),
        }
    }

    /// All fields in schema order.
    pub fn values(&self) -> [FieldValue<'_>; CanonicalField::COUNT] {
        CanonicalField::ALL.map(|f| self.get(f))
    }
}
