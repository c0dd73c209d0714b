//! Startup configuration.
//!
//! Read once from a JSON file whose keys match the deployed `config.json`
//! files, then overlaid with `TWITCH_CLIENT_ID` / `TWITCH_CLIENT_SECRET`
//! from the environment (a `.env` file is honoured by the caller).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

const ENV_CLIENT_ID: &str = "TWITCH_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "TWITCH_CLIENT_SECRET";

fn default_searches_file() -> PathBuf {
    PathBuf::from("searches.txt")
}

fn default_usernames_file() -> PathBuf {
    PathBuf::from("usernames.txt")
}

fn default_census_file() -> PathBuf {
    PathBuf::from("streamer_data.csv")
}

fn default_request_timeout() -> u64 {
    helix_client::DEFAULT_REQUEST_TIMEOUT.as_secs()
}

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    #[serde(rename = "TWITCH_CLIENT_ID", default)]
    pub client_id: String,

    #[serde(rename = "TWITCH_CLIENT_SECRET", default)]
    pub client_secret: String,

    /// Token endpoint for the client-credentials grant.
    #[serde(rename = "OAUTH_URL")]
    pub oauth_url: Url,

    /// Base URL the `helix/...` paths are joined onto.
    #[serde(rename = "TWITCH_API_BASE")]
    pub api_base: Url,

    /// Human-readable category name, resolved to an id at startup.
    #[serde(rename = "TWITCH_CATEGORY")]
    pub category: String,

    /// Seconds to sleep between full poll cycles.
    #[serde(rename = "TIMEOUT")]
    pub cooldown_secs: u64,

    #[serde(rename = "REQUEST_TIMEOUT", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(rename = "SEARCHES_FILE", default = "default_searches_file")]
    pub searches_file: PathBuf,

    #[serde(rename = "USERNAMES_FILE", default = "default_usernames_file")]
    pub usernames_file: PathBuf,

    #[serde(rename = "STREAMER_DATA_FILE", default = "default_census_file")]
    pub census_file: PathBuf,
}

impl AppConfig {
    /// Loads, overlays environment credentials, and validates.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::io_path("reading", path, e))?;
        let mut config = Self::from_json(&raw)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Replaces credentials with non-empty values returned by `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup(ENV_CLIENT_ID).filter(|v| !v.is_empty()) {
            self.client_id = id;
        }
        if let Some(secret) = lookup(ENV_CLIENT_SECRET).filter(|v| !v.is_empty()) {
            self.client_secret = secret;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(Error::config("TWITCH_CLIENT_ID is empty"));
        }
        if self.client_secret.trim().is_empty() {
            return Err(Error::config("TWITCH_CLIENT_SECRET is empty"));
        }
        if self.category.trim().is_empty() {
            return Err(Error::config("TWITCH_CATEGORY is empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::config("REQUEST_TIMEOUT must be at least 1 second"));
        }
        for (key, url) in [("OAUTH_URL", &self.oauth_url), ("TWITCH_API_BASE", &self.api_base)] {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::config(format!("{key} must be an http(s) URL, got {url}")));
            }
        }
        Ok(())
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("oauth_url", &self.oauth_url.as_str())
            .field("api_base", &self.api_base.as_str())
            .field("category", &self.category)
            .field("cooldown_secs", &self.cooldown_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("searches_file", &self.searches_file)
            .field("usernames_file", &self.usernames_file)
            .field("census_file", &self.census_file)
            .finish()
    }
}
