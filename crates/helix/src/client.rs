use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, error};
use url::Url;

use crate::auth::AccessToken;
use crate::error::HelixError;
use crate::models::{DataResponse, Game, Stream, StreamsPage};

/// Largest page size `helix/streams` accepts.
pub const PAGE_SIZE: u32 = 100;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const CLIENT_ID_HEADER: HeaderName = HeaderName::from_static("client-id");

pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            // Another crate installed one first.
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// Builds the shared HTTP client. Every request made through it fails after
/// `request_timeout`.
pub fn default_client(request_timeout: Duration) -> Result<Client, HelixError> {
    install_rustls_provider();
    let client = Client::builder()
        .timeout(request_timeout)
        .user_agent(concat!("streamwatch/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Joins `path` onto `base`, treating `base` as a directory even when it was
/// configured without a trailing slash.
pub fn endpoint(base: &Url, path: &str) -> Result<Url, HelixError> {
    if base.path().ends_with('/') {
        return Ok(base.join(path)?);
    }
    let mut base = base.clone();
    base.set_path(&format!("{}/", base.path()));
    Ok(base.join(path)?)
}

/// Source of stream pages for one category.
///
/// The monitor only depends on this seam, so tests can feed it canned pages.
#[async_trait]
pub trait StreamsApi: Send + Sync {
    async fn streams_page(
        &self,
        category_id: &str,
        cursor: Option<&str>,
    ) -> Result<StreamsPage, HelixError>;
}

#[async_trait]
impl<T: StreamsApi + ?Sized> StreamsApi for Arc<T> {
    async fn streams_page(
        &self,
        category_id: &str,
        cursor: Option<&str>,
    ) -> Result<StreamsPage, HelixError> {
        (**self).streams_page(category_id, cursor).await
    }
}

/// Authenticated client for the `helix/*` endpoints.
#[derive(Debug, Clone)]
pub struct HelixClient {
    client: Client,
    api_base: Url,
    headers: HeaderMap,
}

impl HelixClient {
    pub fn new(
        client: Client,
        api_base: Url,
        client_id: &str,
        token: &AccessToken,
    ) -> Result<Self, HelixError> {
        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_ID_HEADER, header_value("Client-Id", client_id)?);
        headers.insert(
            AUTHORIZATION,
            header_value("Authorization", &format!("Bearer {}", token.as_str()))?,
        );
        Ok(Self {
            client,
            api_base,
            headers,
        })
    }

    fn get(&self, path: &str) -> Result<RequestBuilder, HelixError> {
        let url = endpoint(&self.api_base, path)?;
        Ok(self.client.get(url).headers(self.headers.clone()))
    }

    /// Looks up the id of the category called `name`.
    pub async fn resolve_category_id(&self, name: &str) -> Result<String, HelixError> {
        let response = self.get("helix/games")?.query(&[("name", name)]).send().await?;

        let status = response.status();
        let body = response.text().await?;
        parse_category(name, status, body)
    }
}

/// Picks the category id out of a `helix/games` answer. When several
/// categories match, the first one is used.
pub fn parse_category(name: &str, status: StatusCode, body: String) -> Result<String, HelixError> {
    if !status.is_success() {
        error!(%status, body = %body, category = name, "failed to get category id");
        return Err(HelixError::UnexpectedStatus {
            endpoint: "helix/games",
            status,
            body,
        });
    }

    let games: DataResponse<Game> = serde_json::from_str(&body)?;
    if games.data.len() > 1 {
        debug!(
            category = name,
            matches = games.data.len(),
            "multiple categories matched, using the first"
        );
    }
    let Some(game) = games.data.into_iter().next() else {
        error!(category = name, "failed to get category id: no matches");
        return Err(HelixError::CategoryNotFound(name.to_string()));
    };
    debug!(category = %game.name, id = %game.id, "resolved category");
    Ok(game.id)
}

#[async_trait]
impl StreamsApi for HelixClient {
    async fn streams_page(
        &self,
        category_id: &str,
        cursor: Option<&str>,
    ) -> Result<StreamsPage, HelixError> {
        let first = PAGE_SIZE.to_string();
        let mut params = vec![("game_id", category_id), ("first", first.as_str())];
        if let Some(cursor) = cursor {
            params.push(("after", cursor));
        }

        let response = self.get("helix/streams")?.query(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(HelixError::UnexpectedStatus {
                endpoint: "helix/streams",
                status,
                body,
            });
        }

        let page: DataResponse<Stream> = serde_json::from_str(&body)?;
        Ok(page.into())
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, HelixError> {
    let mut value = HeaderValue::from_str(value).map_err(|_| HelixError::InvalidHeader(name))?;
    value.set_sensitive(true);
    Ok(value)
}
