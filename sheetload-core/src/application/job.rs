// sheetload-core/src/application/job.rs
//
// USE CASE: one scheduled run, from config files to sinks to run report.

use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

use crate::application::export::{
    ExportTarget, export_all, export_csv, export_table, open_database,
};
use crate::application::extract::extract;
use crate::application::report::{RunReport, SinkOutcome};
use crate::error::SheetloadError;
use crate::infrastructure::adapters::{ClientOptions, GoogleSheetsClient};
use crate::infrastructure::config::{
    CredentialBundle, ResolvedJobConfig, load_credentials, load_job_config,
};
use crate::ports::sheets::SheetSource;

/// Loads the job config from `project_dir`, runs the export and writes the
/// run report. The report is written on failure too; a failure to write it
/// is only logged.
#[instrument]
pub async fn run_job(
    project_dir: &Path,
    target: ExportTarget,
) -> Result<RunReport, SheetloadError> {
    let config = match load_job_config(project_dir) {
        Ok(config) => config,
        Err(e) => {
            let e = SheetloadError::from(e);
            error!(kind = %e.kind(), error = %e, "Job configuration rejected");
            return Err(e);
        }
    };

    let started = Instant::now();
    let mut report = RunReport::new(target);

    let result = authenticate_and_run(&config, target, &mut report).await;
    report.finish(started, result.as_ref().err());

    if let Some(path) = &config.report_path {
        match report.save(path) {
            Ok(()) => info!(path = %path.display(), "Run report written"),
            Err(e) => warn!(path = %path.display(), error = %e, "Could not write run report"),
        }
    }

    match result {
        Ok(()) => {
            info!(duration_ms = report.duration_ms, records = report.records, "Run succeeded");
            Ok(report)
        }
        Err(e) => {
            error!(kind = %e.kind(), error = %e, "Run failed");
            Err(e)
        }
    }
}

async fn authenticate_and_run(
    config: &ResolvedJobConfig,
    target: ExportTarget,
    report: &mut RunReport,
) -> Result<(), SheetloadError> {
    let bundle = load_credentials(&config.credentials_path)?;
    report.spreadsheet_id = Some(bundle.spreadsheet_id().to_string());
    report.sheet_id = Some(bundle.sheet_id());

    let options = ClientOptions {
        base_url: config.api_base_url.clone(),
        timeout: Duration::from_secs(config.request_timeout_secs),
    };
    let session = GoogleSheetsClient::authenticate(&bundle, &options).await?;

    execute(&session, &bundle, config, target, report).await
}

/// Extract once, then the sinks `target` asks for. Every sink that was
/// attempted gets an outcome in the report; the first failing one fails the run.
pub async fn execute(
    source: &dyn SheetSource,
    bundle: &CredentialBundle,
    config: &ResolvedJobConfig,
    target: ExportTarget,
    report: &mut RunReport,
) -> Result<(), SheetloadError> {
    let extracted = extract(source, bundle).await?;
    report.record_extract(&extracted);
    let records = extracted.records;

    let csv_target = config.csv_path.display().to_string();
    let table_target = config.table_name.as_str();

    let (csv, table) = match target {
        ExportTarget::Csv => (Some(export_csv(records, config.csv_path.clone()).await), None),
        ExportTarget::Table => {
            let table = match open_database(&config.database_path) {
                Ok(db) => export_table(&records, table_target, &db).await,
                Err(e) => Err(e),
            };
            (None, Some(table))
        }
        ExportTarget::All => match open_database(&config.database_path) {
            Ok(db) => {
                let (csv, table) =
                    export_all(records, &config.csv_path, table_target, &db).await;
                (Some(csv), Some(table))
            }
            // The file sink does not depend on the database
            Err(e) => (
                Some(export_csv(records, config.csv_path.clone()).await),
                Some(Err(e)),
            ),
        },
    };

    let mut failure = None;
    let attempted = [
        ("csv", csv_target.as_str(), csv),
        ("table", table_target, table),
    ];
    for (sink, sink_target, result) in attempted {
        let Some(result) = result else { continue };
        report
            .sinks
            .push(SinkOutcome::from_result(sink, sink_target, &result));
        match result {
            Ok(rows) => info!(sink, destination = sink_target, rows, "Sink done"),
            Err(e) => {
                error!(sink, destination = sink_target, kind = %e.kind(), error = %e, "Sink failed");
                failure.get_or_insert(e);
            }
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
