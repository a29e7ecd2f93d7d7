// sheetload-core/src/infrastructure/config/credentials.rs

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

use crate::infrastructure::error::InfrastructureError;

const KEY_SERVICE_ACCOUNT: &str = "service_account";
const KEY_SPREADSHEET_ID: &str = "spreadsheet_id";
const KEY_SHEET_ID: &str = "sheet_id";

/// Everything a run needs to reach its sheet. Loaded once per run, never
/// written anywhere.
#[derive(Clone, PartialEq)]
pub struct CredentialBundle {
    service_account_json: String,
    spreadsheet_id: String,
    sheet_id: u64,
}

impl CredentialBundle {
    pub fn new(service_account_json: String, spreadsheet_id: String, sheet_id: u64) -> Self {
        Self {
            service_account_json,
            spreadsheet_id,
            sheet_id,
        }
    }

    /// Service account key as JSON text (identity material).
    pub fn service_account_json(&self) -> &str {
        &self.service_account_json
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn sheet_id(&self) -> u64 {
        self.sheet_id
    }
}

// Never print key material
impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("service_account_json", &"<redacted>")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("sheet_id", &self.sheet_id)
            .finish()
    }
}

/// Loads the credential file (YAML or JSON).
///
/// The identity material is either nested under `service_account`, or the
/// file itself is a Google service account key with `spreadsheet_id` and
/// `sheet_id` added next to `private_key`/`client_email`.
#[instrument]
pub fn load_credentials(path: &Path) -> Result<CredentialBundle, InfrastructureError> {
    let display = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => InfrastructureError::ConfigNotFound(display.clone()),
        _ => InfrastructureError::ConfigError(format!("cannot read '{}': {}", display, e)),
    })?;

    let document: Value =
        serde_yaml::from_str(&content).map_err(|source| InfrastructureError::ConfigParse {
            path: display.clone(),
            source,
        })?;

    let map = document.as_mapping().ok_or_else(|| {
        InfrastructureError::ConfigError(format!(
            "'{}' must contain a mapping of keys, found {}",
            display,
            value_kind(&document)
        ))
    })?;

    let spreadsheet_id = read_spreadsheet_id(map)?;
    let sheet_id = read_sheet_id(map)?;
    let service_account_json = read_service_account(map)?;

    info!(spreadsheet_id = %spreadsheet_id, sheet_id, "Credential bundle loaded");

    Ok(CredentialBundle {
        service_account_json,
        spreadsheet_id,
        sheet_id,
    })
}

fn read_spreadsheet_id(map: &Mapping) -> Result<String, InfrastructureError> {
    match map.get(KEY_SPREADSHEET_ID) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(key_error(KEY_SPREADSHEET_ID, "is empty")),
        Some(other) => Err(key_error(
            KEY_SPREADSHEET_ID,
            &format!("expected a string, found {}", value_kind(other)),
        )),
        None => Err(key_error(KEY_SPREADSHEET_ID, "is missing")),
    }
}

fn read_sheet_id(map: &Mapping) -> Result<u64, InfrastructureError> {
    match map.get(KEY_SHEET_ID) {
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| key_error(KEY_SHEET_ID, "must be a non-negative integer")),
        // Sheet ids copied from a URL (`#gid=123`) often end up quoted
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| key_error(KEY_SHEET_ID, &format!("'{}' is not a numeric sheet id", s))),
        Some(other) => Err(key_error(
            KEY_SHEET_ID,
            &format!("expected an integer, found {}", value_kind(other)),
        )),
        None => Err(key_error(KEY_SHEET_ID, "is missing")),
    }
}

fn read_service_account(map: &Mapping) -> Result<String, InfrastructureError> {
    match map.get(KEY_SERVICE_ACCOUNT) {
        Some(Value::Mapping(inner)) => to_json(inner),
        // Key stored as an escaped JSON string; validated by the auth step
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(other) => Err(key_error(
            KEY_SERVICE_ACCOUNT,
            &format!("expected a mapping or JSON string, found {}", value_kind(other)),
        )),
        None if map.contains_key("private_key") && map.contains_key("client_email") => {
            let mut key = map.clone();
            key.remove(KEY_SPREADSHEET_ID);
            key.remove(KEY_SHEET_ID);
            to_json(&key)
        }
        None => Err(key_error(KEY_SERVICE_ACCOUNT, "is missing")),
    }
}

fn to_json(map: &Mapping) -> Result<String, InfrastructureError> {
    serde_json::to_string(map).map_err(|e| key_error(KEY_SERVICE_ACCOUNT, &e.to_string()))
}

fn key_error(key: &'static str, reason: &str) -> InfrastructureError {
    InfrastructureError::ConfigKey {
        key,
        reason: reason.to_string(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
