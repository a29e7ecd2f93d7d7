pub mod coercion;
pub mod error;
pub mod grid;
pub mod record;
pub mod schema;
pub mod sheet;
pub mod transform;

// Handy re-exports to keep imports short elsewhere
pub use error::DomainError;
pub use grid::RawGrid;
pub use record::CanonicalRecord;
pub use schema::CanonicalField;
pub use transform::{TransformOutput, transform};
