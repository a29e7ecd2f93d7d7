// sheetload-core/src/lib.rs

// 1. Documentation is enforced on the public facade only
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts for the spreadsheet service and the relational engine.
pub mod ports;

// 2. Domain (business core)
// Canonical schema, coercion policy, transformer, sheet resolution.
// Depends on NOTHING else (no infra, no app).
pub mod domain;

// 3. Infrastructure (Adapters)
// Config files, service-account auth, Google Sheets HTTP, DuckDB, CSV.
pub mod infrastructure;

// 4. Application (Use Cases)
// Extract, export to file / table / both, run report.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// use sheetload_core::{SheetloadError, ErrorKind};
pub use error::{ErrorKind, SheetloadError};
