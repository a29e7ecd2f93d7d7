// sheetload-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum SheetloadError {
    // --- DOMAIN ERRORS (sheet resolution, empty data) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (config, auth, HTTP, sinks) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for SheetloadError {
    fn from(err: std::io::Error) -> Self {
        SheetloadError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for SheetloadError {
    fn from(err: duckdb::Error) -> Self {
        SheetloadError::Infrastructure(err.into())
    }
}

/// Operator-facing failure classes. Each one maps to its own process exit code
/// so the scheduler can tell "credentials wrong" from "sheet empty" from
/// "network down" without reading logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ConfigError,
    ConfigKeyError,
    AuthError,
    NotFoundError,
    FetchTransportError,
    EmptyDataError,
    ExportError,
    MalformedResponseError,
    InternalError,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InternalError => 1,
            ErrorKind::ConfigError => 2,
            ErrorKind::ConfigKeyError => 3,
            ErrorKind::AuthError => 4,
            ErrorKind::NotFoundError => 5,
            ErrorKind::FetchTransportError => 6,
            ErrorKind::EmptyDataError => 7,
            ErrorKind::ExportError => 8,
            ErrorKind::MalformedResponseError => 9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ConfigError => "ConfigError",
            ErrorKind::ConfigKeyError => "ConfigKeyError",
            ErrorKind::AuthError => "AuthError",
            ErrorKind::NotFoundError => "NotFoundError",
            ErrorKind::FetchTransportError => "FetchTransportError",
            ErrorKind::EmptyDataError => "EmptyDataError",
            ErrorKind::ExportError => "ExportError",
            ErrorKind::MalformedResponseError => "MalformedResponseError",
            ErrorKind::InternalError => "InternalError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SheetloadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SheetloadError::Domain(e) => match e {
                DomainError::SheetNotFound { .. }
                | DomainError::SpreadsheetNotFound(_)
                | DomainError::RangeNotFound { .. } => ErrorKind::NotFoundError,
                DomainError::EmptyData { .. } => ErrorKind::EmptyDataError,
            },
            SheetloadError::Infrastructure(e) => match e {
                InfrastructureError::ConfigNotFound(_)
                | InfrastructureError::ConfigParse { .. }
                | InfrastructureError::ConfigError(_)
                | InfrastructureError::InvalidConfig(_) => ErrorKind::ConfigError,
                InfrastructureError::ConfigKey { .. } => ErrorKind::ConfigKeyError,
                InfrastructureError::Auth(_) => ErrorKind::AuthError,
                InfrastructureError::Transport { .. }
                | InfrastructureError::TokenTransport(_)
                | InfrastructureError::HttpStatus { .. } => ErrorKind::FetchTransportError,
                InfrastructureError::MalformedResponse { .. } => {
                    ErrorKind::MalformedResponseError
                }
                InfrastructureError::Export { .. } | InfrastructureError::Database(_) => {
                    ErrorKind::ExportError
                }
                InfrastructureError::Io(_) => ErrorKind::InternalError,
            },
            SheetloadError::InternalError(_) => ErrorKind::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let kinds = [
            ErrorKind::ConfigError,
            ErrorKind::ConfigKeyError,
            ErrorKind::AuthError,
            ErrorKind::NotFoundError,
            ErrorKind::FetchTransportError,
            ErrorKind::EmptyDataError,
            ErrorKind::ExportError,
            ErrorKind::MalformedResponseError,
            ErrorKind::InternalError,
        ];
        let mut codes: Vec<u8> = kinds.iter().map(|k| k.exit_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
        assert!(!codes.contains(&0));
    }

    #[test]
    fn test_kind_classification() {
        let err = SheetloadError::from(DomainError::EmptyData {
            title: "Fans".into(),
            rows: 1,
        });
        assert_eq!(err.kind(), ErrorKind::EmptyDataError);

        let err = SheetloadError::from(DomainError::SheetNotFound {
            spreadsheet_id: "abc".into(),
            sheet_id: 7,
        });
        assert_eq!(err.kind(), ErrorKind::NotFoundError);

        let err = SheetloadError::from(InfrastructureError::ConfigKey {
            key: "sheet_id",
            reason: "missing".into(),
        });
        assert_eq!(err.kind(), ErrorKind::ConfigKeyError);

        let err = SheetloadError::from(InfrastructureError::TokenTransport(
            "connection refused".into(),
        ));
        assert_eq!(err.kind(), ErrorKind::FetchTransportError);

        let err = SheetloadError::from(DomainError::RangeNotFound {
            spreadsheet_id: "abc".into(),
            range: "'Fans'".into(),
        });
        assert_eq!(err.kind(), ErrorKind::NotFoundError);

        let err = SheetloadError::from(InfrastructureError::Export {
            sink: "csv",
            target: "out.csv".into(),
            reason: "disk full".into(),
        });
        assert_eq!(err.kind(), ErrorKind::ExportError);
        assert_eq!(err.kind().to_string(), "ExportError");
    }
}
