use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::feed::{Feed, FeedStatus};

/// Errors that can occur while pulling a feed. None of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    /// Any status other than 2xx or 304
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Body is neither RSS nor Atom
    #[error("parse error: {0}")]
    Parse(String),
    #[error("response too large")]
    TooLarge,
}

/// Feed-level metadata of a successful pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDescriptor {
    pub title: String,
    pub description: String,
    pub source: String,
    /// When the pull happened.
    pub last_updated: DateTime<Utc>,
    /// `ETag` of the response, empty when the server sent none.
    pub etag: String,
}

impl FeedDescriptor {
    /// Overwrite the mutable fields of a stored feed. An empty upstream
    /// title keeps the current one.
    pub fn apply_to(&self, feed: &mut Feed) {
        if !self.title.is_empty() {
            feed.title = self.title.clone();
        }
        feed.description = self.description.clone();
        feed.source = self.source.clone();
        feed.last_updated = Some(self.last_updated);
        feed.etag = self.etag.clone();
        feed.status = FeedStatus::Ok;
    }
}

/// One item of a pulled feed, before it becomes an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedEntry {
    pub guid: String,
    pub title: String,
    pub link: String,
    pub author: String,
    pub published: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct PulledFeed {
    pub descriptor: FeedDescriptor,
    /// Items in document order.
    pub entries: Vec<FetchedEntry>,
}

#[derive(Debug, Clone)]
pub enum PullOutcome {
    Modified(PulledFeed),
    /// The server answered 304 to the validator; nothing changed.
    NotModified,
}

/// Performs a single conditional GET of a feed and parses the result.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// `validator` is sent as `If-None-Match` when non-empty.
    async fn pull(&self, url: &str, validator: &str) -> Result<PullOutcome, FetchError>;
}
