//! Client-credentials token exchange.

use std::fmt;

use reqwest::{Client, StatusCode};
use tracing::{debug, error};

use crate::error::HelixError;
use crate::models::TokenResponse;

/// App access token. `Debug` never prints the secret value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Exchanges the client id and secret for an app access token.
///
/// The token is assumed valid for the lifetime of the process; there is no
/// refresh.
pub async fn request_app_token(
    client: &Client,
    oauth_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<AccessToken, HelixError> {
    let response = client
        .post(oauth_url)
        .query(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("grant_type", "client_credentials"),
        ])
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    parse_token_response(status, body)
}

/// Turns the token endpoint's answer into a token, or the status error.
pub fn parse_token_response(status: StatusCode, body: String) -> Result<AccessToken, HelixError> {
    if !status.is_success() {
        error!(%status, body = %body, "failed to get bearer token");
        return Err(HelixError::UnexpectedStatus {
            endpoint: "oauth2/token",
            status,
            body,
        });
    }

    let token: TokenResponse = serde_json::from_str(&body)?;
    debug!(
        expires_in = ?token.expires_in,
        token_type = ?token.token_type,
        "obtained app access token"
    );
    Ok(AccessToken::new(token.access_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let token = AccessToken::new("super-secret");
        let printed = format!("{token:?}");
        assert!(!printed.contains("super-secret"));
        assert_eq!(token.as_str(), "super-secret");
    }

    #[test]
    fn test_parse_token_success() {
        let body = r#"{"access_token":"jostpf5q0uzmxmkba9iyug38kjtgh","expires_in":5011271,"token_type":"bearer"}"#;
        let token = parse_token_response(StatusCode::OK, body.to_string()).unwrap();
        assert_eq!(token.as_str(), "jostpf5q0uzmxmkba9iyug38kjtgh");
    }

    #[test]
    fn test_parse_token_rejected_secret() {
        let body = r#"{"status":403,"message":"invalid client secret"}"#;
        let err = parse_token_response(StatusCode::FORBIDDEN, body.to_string()).unwrap_err();
        assert!(err.is_status());
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert!(err.to_string().contains("invalid client secret"));
    }

    #[test]
    fn test_parse_token_unauthorized() {
        let err = parse_token_response(StatusCode::UNAUTHORIZED, String::new()).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_parse_token_garbage_body() {
        let err = parse_token_response(StatusCode::OK, "<html>".to_string()).unwrap_err();
        assert!(matches!(err, HelixError::Json(_)));
    }
}
