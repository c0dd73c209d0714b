//! Search-term and username watchlists.
//!
//! Both files are re-read before every page request, so edits take effect
//! on the next page without restarting.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::record::StreamRecord;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct WatchlistFiles {
    pub searches: PathBuf,
    pub usernames: PathBuf,
}

impl WatchlistFiles {
    pub fn new(searches: impl Into<PathBuf>, usernames: impl Into<PathBuf>) -> Self {
        Self {
            searches: searches.into(),
            usernames: usernames.into(),
        }
    }

    pub async fn load(&self) -> Result<Watchlist> {
        Ok(Watchlist {
            search_terms: read_terms(&self.searches).await?,
            usernames: read_terms(&self.usernames).await?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watchlist {
    pub search_terms: HashSet<String>,
    pub usernames: HashSet<String>,
}

impl Watchlist {
    /// A stream matches when any search term occurs anywhere in its title,
    /// or when its display name or login is a watched username.
    ///
    /// Titles are lowercased by [`StreamRecord`], terms by [`parse_terms`].
    pub fn matches(&self, record: &StreamRecord) -> bool {
        self.search_terms
            .iter()
            .any(|term| record.title.contains(term.as_str()))
            || self.usernames.contains(&record.user_name.to_lowercase())
            || self.usernames.contains(&record.user_login.to_lowercase())
    }
}

/// One entry per line, trimmed and lowercased. Blank lines are dropped since
/// an empty term would match every title.
pub fn parse_terms(raw: &str) -> HashSet<String> {
    raw.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect()
}

async fn read_terms(path: &Path) -> Result<HashSet<String>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io_path("reading watchlist", path, e))?;
    Ok(parse_terms(&raw))
}
