// sheetload-core/src/infrastructure/adapters/google_sheets.rs
//
// Google Sheets API v4 over reqwest. Every failure is classified so the
// operator can tell credentials, missing sheets, network and bad payloads apart.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::domain::error::DomainError;
use crate::domain::grid::RawGrid;
use crate::domain::sheet::{SheetProperties, SpreadsheetMetadata};
use crate::error::SheetloadError;
use crate::infrastructure::auth::{AccessToken, fetch_access_token};
use crate::infrastructure::config::CredentialBundle;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::sheets::SheetSource;

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4";

const METADATA_FIELDS: &str = "properties.title,sheets.properties(sheetId,title)";
const BODY_EXCERPT_LEN: usize = 300;

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// An authenticated, read-scoped session. Owned by a single run.
#[derive(Debug)]
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    base_url: Url,
    token: AccessToken,
}

impl GoogleSheetsClient {
    /// Authentication handshake: service account key -> bearer token -> session.
    pub async fn authenticate(
        bundle: &CredentialBundle,
        options: &ClientOptions,
    ) -> Result<Self, SheetloadError> {
        let token = fetch_access_token(bundle).await?;
        Ok(Self::with_token(token, options)?)
    }

    pub fn with_token(
        token: AccessToken,
        options: &ClientOptions,
    ) -> Result<Self, InfrastructureError> {
        let base_url = Url::parse(&options.base_url).map_err(|e| {
            InfrastructureError::ConfigError(format!(
                "invalid api_base_url '{}': {}",
                options.base_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(InfrastructureError::ConfigError(format!(
                "api_base_url '{}' cannot be used as a base URL",
                options.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|source| InfrastructureError::Transport {
                operation: "client setup".to_string(),
                source,
            })?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// `{base}/spreadsheets/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("spreadsheets").extend(segments);
        }
        url
    }

    async fn get_text(
        &self,
        operation: &str,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<String, SheetloadError> {
        debug!(%url, operation, "GET");
        let response = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .map_err(|source| transport(operation, source))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| transport(operation, source))?;

        if !status.is_success() {
            return Err(classify_status(operation, status, &body));
        }
        Ok(body)
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsClient {
    #[instrument(skip(self))]
    async fn spreadsheet_metadata(
        &self,
        spreadsheet_id: &str,
    ) -> Result<SpreadsheetMetadata, SheetloadError> {
        let operation = "spreadsheet metadata";
        let url = self.endpoint(&[spreadsheet_id]);
        let body = self
            .get_text(operation, url, &[("fields", METADATA_FIELDS)])
            .await
            .map_err(|e| {
                on_not_found(e, || DomainError::SpreadsheetNotFound(spreadsheet_id.to_string()))
            })?;
        Ok(parse_metadata(spreadsheet_id, &body)?)
    }

    #[instrument(skip(self))]
    async fn values(&self, spreadsheet_id: &str, range: &str) -> Result<RawGrid, SheetloadError> {
        let operation = "sheet values";
        let url = self.endpoint(&[spreadsheet_id, "values", range]);
        let body = self
            .get_text(
                operation,
                url,
                &[
                    ("majorDimension", "ROWS"),
                    ("valueRenderOption", "FORMATTED_VALUE"),
                ],
            )
            .await
            .map_err(|e| {
                on_not_found(e, || DomainError::RangeNotFound {
                    spreadsheet_id: spreadsheet_id.to_string(),
                    range: range.to_string(),
                })
            })?;
        Ok(parse_values(&body)?)
    }
}

// --- CLASSIFICATION ---

fn transport(operation: &str, source: reqwest::Error) -> SheetloadError {
    InfrastructureError::Transport {
        operation: operation.to_string(),
        source,
    }
    .into()
}

/// Maps a non-success HTTP status to the operator-facing error classes.
/// 401/403 are credential problems and 404 a missing resource. Any other
/// status is reported with its code and body excerpt; it is not necessarily
/// transient (a 400 for a bad range will fail again on retry).
pub fn classify_status(operation: &str, status: StatusCode, body: &str) -> SheetloadError {
    let excerpt: String = body.chars().take(BODY_EXCERPT_LEN).collect();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => InfrastructureError::Auth(format!(
            "{} rejected with HTTP {}: {}",
            operation,
            status.as_u16(),
            excerpt
        ))
        .into(),
        StatusCode::NOT_FOUND => DomainError::SpreadsheetNotFound(String::new()).into(),
        _ => InfrastructureError::HttpStatus {
            operation: operation.to_string(),
            status: status.as_u16(),
            body: excerpt,
        }
        .into(),
    }
}

// A 404 only says "not here"; the caller knows what was being looked up
fn on_not_found(err: SheetloadError, resource: impl FnOnce() -> DomainError) -> SheetloadError {
    match err {
        SheetloadError::Domain(DomainError::SpreadsheetNotFound(_)) => resource().into(),
        other => other,
    }
}

// --- WIRE FORMAT ---

#[derive(Debug, Deserialize)]
struct SpreadsheetDto {
    #[serde(default)]
    properties: Option<SpreadsheetPropertiesDto>,
    #[serde(default)]
    sheets: Vec<SheetDto>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetPropertiesDto {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct SheetDto {
    properties: SheetPropertiesDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetPropertiesDto {
    // proto3 JSON may omit a zero id
    #[serde(default)]
    sheet_id: u64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRangeDto {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

pub fn parse_metadata(
    spreadsheet_id: &str,
    body: &str,
) -> Result<SpreadsheetMetadata, InfrastructureError> {
    let dto: SpreadsheetDto =
        serde_json::from_str(body).map_err(|e| malformed("spreadsheet metadata", e))?;
    Ok(SpreadsheetMetadata {
        spreadsheet_id: spreadsheet_id.to_string(),
        title: dto.properties.map(|p| p.title).unwrap_or_default(),
        sheets: dto
            .sheets
            .into_iter()
            .map(|s| SheetProperties {
                sheet_id: s.properties.sheet_id,
                title: s.properties.title,
            })
            .collect(),
    })
}

/// The service omits `values` entirely for an empty range.
pub fn parse_values(body: &str) -> Result<RawGrid, InfrastructureError> {
    let dto: ValueRangeDto =
        serde_json::from_str(body).map_err(|e| malformed("sheet values", e))?;
    let rows = dto
        .values
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect();
    Ok(RawGrid::new(rows))
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn malformed(operation: &str, err: serde_json::Error) -> InfrastructureError {
    InfrastructureError::MalformedResponse {
        operation: operation.to_string(),
        reason: err.to_string(),
    }
}
