// sheetload-core/src/domain/coercion.rs
//
// Tolerant cell parsers. A malformed cell never fails the row: it is
// substituted (null or 0.0) and the substitution is counted.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::schema::CanonicalField;

/// Result of coercing one cell. `substituted` is set when a non-blank cell
/// could not be parsed and the fallback value was used instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coercion<T> {
    pub value: T,
    pub substituted: bool,
}

impl<T> Coercion<T> {
    fn parsed(value: T) -> Self {
        Self {
            value,
            substituted: false,
        }
    }

    fn fallback(value: T, raw: &str) -> Self {
        Self {
            value,
            substituted: !raw.trim().is_empty(),
        }
    }
}

// --- INTEGER ---

/// Accepts surrounding whitespace and whole-valued floats ("2024.0").
pub fn parse_integer(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

pub fn coerce_integer(raw: &str) -> Coercion<Option<i64>> {
    match parse_integer(raw) {
        Some(v) => Coercion::parsed(Some(v)),
        None => Coercion::fallback(None, raw),
    }
}

// --- CURRENCY ---

/// Drops every character that is not an ASCII digit or a '.'.
/// "$1,250.00" -> "1250.00", "ZMW 99" -> "99".
pub fn strip_currency(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

pub fn coerce_currency(raw: &str) -> Coercion<f64> {
    let stripped = strip_currency(raw);
    if stripped.is_empty() {
        return Coercion::fallback(0.0, raw);
    }
    match stripped.parse::<f64>() {
        Ok(v) => Coercion::parsed(v),
        // "1.2.3" and friends
        Err(_) => Coercion::fallback(0.0, raw),
    }
}

// --- DATE ---

const DATE_FORMATS: [&str; 9] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%m/%d/%y",
];

const TIME_SUFFIXES: [&str; 4] = [" %H:%M:%S", " %H:%M", "T%H:%M:%S", "T%H:%M:%S%.f"];

// %Y happily reads "24" as year 24.
fn plausible(date: NaiveDate) -> bool {
    use chrono::Datelike;
    date.year() >= 1000
}

/// Best-effort date parse. Date-times keep their date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt)
            && plausible(date)
        {
            return Some(date);
        }
    }

    for fmt in DATE_FORMATS {
        for suffix in TIME_SUFFIXES {
            let full = format!("{fmt}{suffix}");
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, &full)
                && plausible(dt.date())
            {
                return Some(dt.date());
            }
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
        .filter(|d| plausible(*d))
}

pub fn coerce_date(raw: &str) -> Coercion<Option<NaiveDate>> {
    match parse_date(raw) {
        Some(d) => Coercion::parsed(Some(d)),
        None => Coercion::fallback(None, raw),
    }
}

// --- STATS ---

/// Per-run data-quality counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoercionStats {
    /// Substituted cells per field. Fields with zero failures are absent.
    pub failures: BTreeMap<CanonicalField, u64>,
    /// Schema fields whose header was not found in the sheet.
    pub missing_columns: Vec<CanonicalField>,
}

impl CoercionStats {
    pub fn record<T>(&mut self, field: CanonicalField, coercion: &Coercion<T>) {
        if coercion.substituted {
            *self.failures.entry(field).or_insert(0) += 1;
        }
    }

    pub fn failures_for(&self, field: CanonicalField) -> u64 {
        self.failures.get(&field).copied().unwrap_or(0)
    }

    pub fn total_failures(&self) -> u64 {
        self.failures.values().sum()
    }
}
