// sheetload/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetload")]
#[command(about = "Hourly Google Sheets extract into CSV and DuckDB", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📄 Extracts the sheet and overwrites the CSV file
    ExportCsv {
        /// Project directory (holds sheetload.yaml and the credential file)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🦆 Extracts the sheet and replaces the DuckDB table
    ExportTable {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🚀 Extracts once and writes both the CSV file and the table
    Run {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔍 Inspects a DuckDB table (schema + sample rows)
    Inspect {
        /// Path to the DuckDB database file
        #[arg(long, default_value = "output/sheetload.duckdb")]
        db_path: String,

        /// Table name to inspect
        #[arg(long, short, default_value = "fan_support")]
        table: String,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}
