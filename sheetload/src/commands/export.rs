// sheetload/src/commands/export.rs
//
// USE CASE: export-csv / export-table / run. One extract, the requested sinks.

use std::path::PathBuf;

use sheetload_core::application::{ExportTarget, run_job};

/// Exits the process with the error kind's code on failure, so the scheduler
/// can tell a bad credential file from a network blip.
pub async fn execute(project_dir: PathBuf, target: ExportTarget) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    println!("⚙️  Exporting ({}) from {}...", target, project_dir.display());
    tracing::debug!(?project_dir, %target, "Dispatching export");

    match run_job(&project_dir, target).await {
        Ok(report) => {
            println!(
                "   Sheet: '{}' ({} rows fetched)",
                report.title.as_deref().unwrap_or_default(),
                report.rows_fetched
            );
            for sink in &report.sinks {
                println!("   ✅ {} -> {} ({} rows)", sink.sink, sink.target, sink.rows_written);
            }
            let failures = report.stats.total_failures();
            if failures > 0 || !report.stats.missing_columns.is_empty() {
                println!(
                    "   ⚠️  {} cell(s) substituted, {} column(s) missing from the sheet",
                    failures,
                    report.stats.missing_columns.len()
                );
            }
            println!("\n✨ SUCCESS! Export finished in {:.2?}", start.elapsed());
            Ok(())
        }
        Err(e) => {
            let kind = e.kind();
            eprintln!("\n💥 {}: {}", kind, e);
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(i32::from(kind.exit_code()));
        }
    }
}
