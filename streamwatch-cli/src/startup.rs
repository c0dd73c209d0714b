//! Authenticate and resolve the category before any polling starts.
//!
//! Both steps are fatal on failure: the caller exits instead of building a
//! [`crate::monitor::Monitor`].

use helix_client::{HelixClient, HelixError, default_client, request_app_token};
use tracing::info;

use crate::config::AppConfig;
use crate::{Error, Result};

pub struct Connection {
    pub helix: HelixClient,
    pub category_id: String,
}

pub async fn connect(config: &AppConfig) -> Result<Connection> {
    let http = default_client(config.request_timeout())?;

    let token = request_app_token(
        &http,
        config.oauth_url.as_str(),
        &config.client_id,
        &config.client_secret,
    )
    .await
    .map_err(token_failure)?;

    let helix = HelixClient::new(http, config.api_base.clone(), &config.client_id, &token)?;

    let category_id = helix
        .resolve_category_id(&config.category)
        .await
        .map_err(|e| category_failure(&config.category, e))?;
    info!(category = %config.category, id = %category_id, "watching category");

    Ok(Connection { helix, category_id })
}

pub fn token_failure(e: HelixError) -> Error {
    Error::startup(format!("failed to obtain bearer token: {e}"))
}

pub fn category_failure(category: &str, e: HelixError) -> Error {
    Error::startup(format!("failed to obtain category id for '{category}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use helix_client::{StatusCode, parse_category, parse_token_response};

    #[test]
    fn test_rejected_token_is_fatal() {
        let err = parse_token_response(StatusCode::UNAUTHORIZED, "invalid client".to_string())
            .map_err(token_failure)
            .unwrap_err();
        assert!(matches!(&err, Error::Startup(msg) if msg.contains("bearer token")));
    }

    #[test]
    fn test_unknown_category_is_fatal_and_named() {
        let err = parse_category("Nope Category", StatusCode::OK, r#"{"data":[]}"#.to_string())
            .map_err(|e| category_failure("Nope Category", e))
            .unwrap_err();
        assert!(matches!(&err, Error::Startup(msg) if msg.contains("'Nope Category'")));
    }
}
