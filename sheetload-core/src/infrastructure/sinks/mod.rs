// Load side: the same records, two destinations.

pub mod csv;
pub mod table;

pub use self::csv::write_csv;
pub use self::table::write_table;
