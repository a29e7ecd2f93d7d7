// sheetload-core/src/domain/grid.rs

/// The service's wire format: rows of string cells, row 0 is the header.
/// Rows can be shorter than the header when trailing cells are empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<String>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn data_rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().skip(1).map(Vec::as_slice)
    }

    /// Total rows including the header.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// No data rows (header-only grids count as empty).
    pub fn is_empty(&self) -> bool {
        self.data_row_count() == 0
    }
}

/// Cell at `index`, or "" past the end of a short row.
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}
