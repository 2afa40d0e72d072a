use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::{ingest_entries, FeedFetcher, FetchError, PullOutcome, UserSyncer};
use crate::domain::entry::EntryRepository;
use crate::domain::feed::{Feed, FeedRepository};
use crate::domain::pagination::Page;
use crate::domain::shared::{RepositoryError, RepositoryResult};

/// Number of feeds read per listing call while syncing one user.
pub const FEED_PAGE_SIZE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("storage failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// What happened to a single feed during a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSync {
    /// Pulled too recently.
    NotDue,
    NotModified,
    Updated { created: usize },
}

/// Per-user tally of one sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub feeds_seen: usize,
    pub feeds_not_due: usize,
    pub feeds_not_modified: usize,
    pub feeds_updated: usize,
    pub feeds_failed: usize,
    pub entries_created: usize,
    pub entries_deleted: u64,
}

impl SyncReport {
    fn record(&mut self, outcome: FeedSync) {
        match outcome {
            FeedSync::NotDue => self.feeds_not_due += 1,
            FeedSync::NotModified => self.feeds_not_modified += 1,
            FeedSync::Updated { created } => {
                self.feeds_updated += 1;
                self.entries_created += created;
            }
        }
    }
}

/// Refreshes every due feed of one user, one feed at a time.
pub struct SyncWorker {
    feeds: Arc<dyn FeedRepository>,
    entries: Arc<dyn EntryRepository>,
    fetcher: Arc<dyn FeedFetcher>,
    sync_interval: Duration,
    retention: Option<Duration>,
}

impl SyncWorker {
    pub fn new(
        feeds: Arc<dyn FeedRepository>,
        entries: Arc<dyn EntryRepository>,
        fetcher: Arc<dyn FeedFetcher>,
        sync_interval: Duration,
    ) -> Self {
        Self {
            feeds,
            entries,
            fetcher,
            sync_interval,
            retention: None,
        }
    }

    /// Delete unsaved entries older than `retention` after each user sync.
    pub fn with_retention(mut self, retention: Option<Duration>) -> Self {
        self.retention = retention;
        self
    }

    /// Sync all feeds of a user.
    ///
    /// Only a failure to list the user's feeds is returned; errors of
    /// individual feeds are logged, counted and skipped.
    pub async fn sync_user(&self, user_id: &str) -> RepositoryResult<SyncReport> {
        let mut report = SyncReport::default();
        let mut page = Page::new(FEED_PAGE_SIZE);

        loop {
            let listing = self.feeds.list(user_id, &page).await?;

            for feed in listing.items {
                report.feeds_seen += 1;
                let feed_id = feed.id.clone();
                let url = feed.subscription.clone();

                match self.sync_feed(user_id, feed).await {
                    Ok(outcome) => report.record(outcome),
                    Err(e) => {
                        report.feeds_failed += 1;
                        tracing::warn!(
                            user_id = %user_id,
                            feed_id = %feed_id,
                            url = %url,
                            error = %e,
                            "Feed sync failed"
                        );
                    }
                }
            }

            match listing.continuation_id {
                Some(next) => page = page.after(next),
                None => break,
            }
        }

        if let Some(retention) = self.retention {
            let before = Utc::now() - retention;
            match self.entries.delete_old_entries(user_id, before).await {
                Ok(deleted) => report.entries_deleted = deleted,
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "Entry retention failed");
                }
            }
        }

        Ok(report)
    }

    /// Pull one feed and store what changed.
    pub async fn sync_feed(&self, user_id: &str, mut feed: Feed) -> Result<FeedSync, SyncError> {
        if !feed.is_due(Utc::now(), self.sync_interval) {
            return Ok(FeedSync::NotDue);
        }

        let pulled = match self.fetcher.pull(&feed.subscription, &feed.etag).await? {
            PullOutcome::NotModified => {
                tracing::debug!(feed_id = %feed.id, "Feed not modified");
                return Ok(FeedSync::NotModified);
            }
            PullOutcome::Modified(pulled) => pulled,
        };

        // The new validator is only stored once every entry is in.
        let cutoff = self.retention.map(|retention| Utc::now() - retention);
        let created =
            ingest_entries(self.entries.as_ref(), user_id, &feed.id, pulled.entries, cutoff)
                .await?;

        pulled.descriptor.apply_to(&mut feed);
        self.feeds.refresh(user_id, &feed).await?;
        tracing::debug!(feed_id = %feed.id, created, "Feed updated");

        Ok(FeedSync::Updated { created })
    }
}

#[async_trait]
impl UserSyncer for SyncWorker {
    async fn sync(&self, user_id: &str) {
        match self.sync_user(user_id).await {
            Ok(report) => tracing::info!(
                user_id = %user_id,
                feeds = report.feeds_seen,
                updated = report.feeds_updated,
                failed = report.feeds_failed,
                entries = report.entries_created,
                "User synced"
            ),
            Err(e) => tracing::warn!(user_id = %user_id, error = %e, "User sync failed"),
        }
    }
}
