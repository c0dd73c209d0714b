//! Async client for the Twitch Helix endpoints streamwatch polls:
//! client-credentials token exchange, category lookup and paged stream
//! listing.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;

pub use auth::{AccessToken, parse_token_response, request_app_token};
pub use client::{
    DEFAULT_REQUEST_TIMEOUT, HelixClient, PAGE_SIZE, StreamsApi, default_client,
    parse_category,
};
pub use error::HelixError;
pub use models::{Stream, StreamsPage};
pub use reqwest::StatusCode;
