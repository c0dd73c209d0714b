//! The poll-and-dedup loop.
//!
//! One cycle walks every page of live streams in the category, cursor by
//! cursor, classifying each stream twice:
//! - against the watchlists, alerting once per distinct title;
//! - against the census, appending one row per new display name.
//!
//! Errors inside a cycle abandon the remaining pages and are logged; the
//! loop then cools down and starts over from the first page.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use helix_client::{HelixError, StreamsApi, StreamsPage};
use tracing::{debug, error, info, warn};

use crate::census::CensusLog;
use crate::record::StreamRecord;
use crate::watchlist::{Watchlist, WatchlistFiles};
use crate::{Error, Result};

/// Dedup state that spans poll cycles.
#[derive(Debug, Default, Clone)]
pub struct MonitorSession {
    seen_titles: HashSet<String>,
    logged_names: HashSet<String>,
}

impl MonitorSession {
    /// Starts a session that already knows the display names in the census.
    pub fn with_logged_names(logged_names: HashSet<String>) -> Self {
        Self {
            seen_titles: HashSet::new(),
            logged_names,
        }
    }

    /// Returns true, and remembers the title, the first time a matching
    /// title is seen. Identity is the exact lowercased title string.
    pub fn check_alert(&mut self, record: &StreamRecord, watchlist: &Watchlist) -> bool {
        if self.seen_titles.contains(&record.title) || !watchlist.matches(record) {
            return false;
        }
        self.seen_titles.insert(record.title.clone())
    }

    pub fn is_logged(&self, user_name: &str) -> bool {
        self.logged_names.contains(user_name)
    }

    pub fn mark_logged(&mut self, user_name: &str) {
        self.logged_names.insert(user_name.to_string());
    }

    pub fn seen_titles(&self) -> usize {
        self.seen_titles.len()
    }

    pub fn logged_names(&self) -> usize {
        self.logged_names.len()
    }
}

/// Why a cycle stopped before running out of pages.
#[derive(Debug)]
pub enum Abandoned {
    /// The provider answered a page request with a non-success status.
    Rejected(HelixError),
    /// Anything else: transport, decoding, watchlist or census I/O.
    Failed(Error),
}

impl fmt::Display for Abandoned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Abandoned::Rejected(e) => write!(f, "rejected: {e}"),
            Abandoned::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

impl From<Error> for Abandoned {
    fn from(e: Error) -> Self {
        match e {
            Error::Helix(e) if e.is_status() => Abandoned::Rejected(e),
            other => Abandoned::Failed(other),
        }
    }
}

impl From<HelixError> for Abandoned {
    fn from(e: HelixError) -> Self {
        Error::from(e).into()
    }
}

#[derive(Debug, Default)]
pub struct CycleReport {
    pub pages: usize,
    pub streams: usize,
    pub alerts: usize,
    pub new_broadcasters: usize,
    pub abandoned: Option<Abandoned>,
}

impl CycleReport {
    pub fn is_complete(&self) -> bool {
        self.abandoned.is_none()
    }
}

pub struct Monitor<A> {
    api: A,
    category_id: String,
    watchlists: WatchlistFiles,
    census: CensusLog,
    session: MonitorSession,
    cooldown: Duration,
}

impl<A: StreamsApi> Monitor<A> {
    pub fn new(
        api: A,
        category_id: impl Into<String>,
        watchlists: WatchlistFiles,
        census: CensusLog,
        session: MonitorSession,
        cooldown: Duration,
    ) -> Self {
        Self {
            api,
            category_id: category_id.into(),
            watchlists,
            census,
            session,
            cooldown,
        }
    }

    pub fn session(&self) -> &MonitorSession {
        &self.session
    }

    /// Polls forever: a full cycle, then the cool-down, regardless of how
    /// the cycle ended.
    pub async fn run(&mut self) {
        loop {
            let report = self.poll_cycle().await;
            info!(
                pages = report.pages,
                streams = report.streams,
                alerts = report.alerts,
                new_broadcasters = report.new_broadcasters,
                complete = report.is_complete(),
                "poll cycle finished"
            );
            debug!(cooldown_secs = self.cooldown.as_secs(), "sleeping");
            tokio::time::sleep(self.cooldown).await;
        }
    }

    /// Walks all pages once, starting without a cursor.
    pub async fn poll_cycle(&mut self) -> CycleReport {
        let mut report = CycleReport::default();
        if let Err(abandoned) = self.walk_pages(&mut report).await {
            match &abandoned {
                Abandoned::Rejected(e) => warn!(
                    error = %e,
                    retry_in_secs = self.cooldown.as_secs(),
                    "page request rejected, abandoning cycle"
                ),
                Abandoned::Failed(e) => error!(
                    error = %e,
                    retry_in_secs = self.cooldown.as_secs(),
                    "poll cycle failed, abandoning cycle"
                ),
            }
            report.abandoned = Some(abandoned);
        }
        report
    }

    async fn walk_pages(&mut self, report: &mut CycleReport) -> std::result::Result<(), Abandoned> {
        let mut cursor: Option<String> = None;
        loop {
            // Watchlists are re-read per page so edits apply mid-cycle.
            let watchlist = self.watchlists.load().await?;

            let page = self
                .api
                .streams_page(&self.category_id, cursor.as_deref())
                .await?;
            report.pages += 1;

            if page.streams.is_empty() {
                debug!(page = report.pages, "empty page, cycle complete");
                return Ok(());
            }
            debug!(page = report.pages, streams = page.streams.len(), "retrieved streams");

            let StreamsPage { streams, cursor: next } = page;
            for stream in streams {
                report.streams += 1;
                self.observe(StreamRecord::from(stream), &watchlist, report)?;
            }

            match next {
                Some(next) => cursor = Some(next),
                None => return Ok(()),
            }
        }
    }

    fn observe(
        &mut self,
        record: StreamRecord,
        watchlist: &Watchlist,
        report: &mut CycleReport,
    ) -> Result<()> {
        if self.session.check_alert(&record, watchlist) {
            report.alerts += 1;
            info!(
                login = %record.user_login,
                display_name = %record.user_name,
                title = %record.title,
                viewers = record.viewer_count,
                language = %record.language,
                game = %record.game_name,
                "watchlist match"
            );
        }

        if !self.session.is_logged(&record.user_name) {
            self.census.append(&record)?;
            self.session.mark_logged(&record.user_name);
            report.new_broadcasters += 1;
            debug!(display_name = %record.user_name, "logged new broadcaster");
        }
        Ok(())
    }
}
