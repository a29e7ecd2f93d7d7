// sheetload-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(sheetload::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("DuckDB connection mutex poisoned")]
    #[diagnostic(code(sheetload::infra::database::poisoned))]
    Poisoned,
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- CONFIG / CREDENTIALS ---
    #[error("Configuration not found at '{0}'")]
    #[diagnostic(
        code(sheetload::infra::config_missing),
        help("Check 'credentials_path' in sheetload.yaml or SHEETLOAD_CREDENTIALS.")
    )]
    ConfigNotFound(String),

    #[error("Configuration at '{path}' is not valid YAML/JSON: {source}")]
    #[diagnostic(
        code(sheetload::infra::config_parse),
        help("Check your YAML/JSON syntax (indentation, quotes, braces).")
    )]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(sheetload::infra::config))]
    ConfigError(String),

    #[error("Invalid job configuration: {0}")]
    #[diagnostic(code(sheetload::infra::config_invalid))]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("Missing or invalid key '{key}' in credential file: {reason}")]
    #[diagnostic(
        code(sheetload::infra::config_key),
        help("The credential file needs 'service_account', 'spreadsheet_id' and 'sheet_id'.")
    )]
    ConfigKey { key: &'static str, reason: String },

    // --- SPREADSHEET SERVICE ---
    #[error("Authentication failed: {0}")]
    #[diagnostic(
        code(sheetload::infra::auth),
        help("Check the service account key and that the spreadsheet is shared with its client_email.")
    )]
    Auth(String),

    #[error("Transport error during {operation}: {source}")]
    #[diagnostic(
        code(sheetload::infra::transport),
        help("Network failure talking to the spreadsheet service. Safe to retry.")
    )]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Token endpoint unreachable: {0}")]
    #[diagnostic(
        code(sheetload::infra::token_transport),
        help("Network failure talking to the OAuth token endpoint. Safe to retry.")
    )]
    TokenTransport(String),

    #[error("HTTP {status} during {operation}: {body}")]
    #[diagnostic(code(sheetload::infra::http_status))]
    HttpStatus {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Malformed response during {operation}: {reason}")]
    #[diagnostic(code(sheetload::infra::malformed_response))]
    MalformedResponse { operation: String, reason: String },

    // --- SINKS ---
    #[error("Export to {sink} '{target}' failed: {reason}")]
    #[diagnostic(
        code(sheetload::infra::export),
        help("Check permissions and free space on the target. The previous output is left untouched.")
    )]
    Export {
        sink: &'static str,
        target: String,
        reason: String,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(sheetload::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
