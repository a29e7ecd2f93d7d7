// sheetload/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use sheetload_core::application::ExportTarget;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug sheetload run ... to see HTTP calls and coercion details.
    // Logs go to stderr, stdout stays for the command's own output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ExportCsv { project_dir } => {
            commands::export::execute(project_dir, ExportTarget::Csv).await?
        }
        Commands::ExportTable { project_dir } => {
            commands::export::execute(project_dir, ExportTarget::Table).await?
        }
        Commands::Run { project_dir } => {
            commands::export::execute(project_dir, ExportTarget::All).await?
        }
        Commands::Inspect {
            db_path,
            table,
            limit,
        } => commands::inspect::execute(db_path, table, limit).await?,
    }

    Ok(())
}
