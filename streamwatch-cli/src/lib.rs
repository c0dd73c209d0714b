//! Library target for the `streamwatch` package.
//!
//! `src/main.rs` wires these pieces together; the library split lets the
//! integration tests drive a [`monitor::Monitor`] against canned pages.

pub mod census;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod record;
pub mod startup;
pub mod watchlist;

pub use error::{Error, Result};
