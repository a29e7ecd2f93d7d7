// sheetload-core/src/infrastructure/auth.rs
//
// Service-account handshake. The key from the credential bundle is exchanged
// for a short-lived, read-only bearer token.

use gcp_auth::{CustomServiceAccount, TokenProvider};
use tracing::{debug, instrument};

use crate::infrastructure::config::CredentialBundle;
use crate::infrastructure::error::InfrastructureError;

/// Read-only access to spreadsheets; the job never writes to the sheet.
pub const SHEETS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Parses the service account key and fetches a token eagerly, so a bad or
/// revoked key fails here as an auth error instead of later as a fetch error.
/// An unreachable token endpoint is a transport failure, not a credential one.
#[instrument(skip(bundle), fields(spreadsheet_id = %bundle.spreadsheet_id()))]
pub async fn fetch_access_token(bundle: &CredentialBundle) -> Result<AccessToken, InfrastructureError> {
    let account = CustomServiceAccount::from_json(bundle.service_account_json())
        .map_err(|e| InfrastructureError::Auth(format!("invalid service account key: {}", e)))?;

    let token = account
        .token(&[SHEETS_READONLY_SCOPE])
        .await
        .map_err(classify_token_error)?;

    debug!("Access token acquired");
    Ok(AccessToken::new(token.as_str()))
}

fn classify_token_error(err: gcp_auth::Error) -> InfrastructureError {
    if is_network_failure(&err) {
        InfrastructureError::TokenTransport(err.to_string())
    } else {
        InfrastructureError::Auth(format!("token request rejected: {}", err))
    }
}

/// True when any cause in the chain is a socket-level failure (refused,
/// reset, DNS, timeout) rather than an answer from the token endpoint.
fn is_network_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut cause = Some(err);
    while let Some(e) = cause {
        if e.is::<std::io::Error>() {
            return true;
        }
        let text = e.to_string();
        if text.contains("client error (Connect)")
            || text.contains("dns error")
            || text.contains("timed out")
        {
            return true;
        }
        cause = e.source();
    }
    false
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, SheetloadError};

    const TEST_PRIVATE_KEY: &str = include_str!("../../tests/fixtures/test_service_account_key.pem");

    fn key_with_token_uri(token_uri: &str) -> String {
        serde_json::json!({
            "type": "service_account",
            "project_id": "sheetload-test",
            "private_key_id": "0000",
            "private_key": TEST_PRIVATE_KEY,
            "client_email": "loader@sheetload-test.iam.gserviceaccount.com",
            "client_id": "1",
            "auth_uri": "http://127.0.0.1:1/auth",
            "token_uri": token_uri,
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_unreachable_token_endpoint_is_transport_error() {
        let bundle = CredentialBundle::new(
            key_with_token_uri("http://127.0.0.1:1/token"),
            "sheet".to_string(),
            0,
        );
        let err = fetch_access_token(&bundle).await.unwrap_err();
        assert!(matches!(err, InfrastructureError::TokenTransport(_)), "{err:?}");
        assert_eq!(
            SheetloadError::from(err).kind(),
            ErrorKind::FetchTransportError
        );
    }

    #[test]
    fn test_network_failure_detection() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(is_network_failure(&io));

        // e.g. an error payload from the endpoint that failed to parse
        let rejected = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!is_network_failure(&rejected));
    }

    #[tokio::test]
    async fn test_malformed_key_is_auth_error() {
        let bundle = CredentialBundle::new(
            r#"{"type": "service_account"}"#.to_string(),
            "sheet".to_string(),
            0,
        );
        let res = fetch_access_token(&bundle).await;
        assert!(matches!(res, Err(InfrastructureError::Auth(_))));
    }

    #[tokio::test]
    async fn test_non_json_key_is_auth_error() {
        let bundle = CredentialBundle::new("not json".to_string(), "sheet".to_string(), 0);
        let res = fetch_access_token(&bundle).await;
        assert!(matches!(res, Err(InfrastructureError::Auth(_))));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let t = AccessToken::new("ya29.secret");
        assert_eq!(format!("{:?}", t), "AccessToken(<redacted>)");
        assert_eq!(t.as_str(), "ya29.secret");
    }
}
