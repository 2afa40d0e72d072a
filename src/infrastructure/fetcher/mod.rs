//! HTTP feed fetcher.

mod parser;

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{ETAG, IF_NONE_MATCH};
use reqwest::{Client, StatusCode};

use crate::domain::sync::{FeedDescriptor, FeedFetcher, FetchError, PullOutcome, PulledFeed};

pub use parser::{parse_feed, ParsedFeed};

/// Largest accepted response body.
pub const MAX_FEED_SIZE: u64 = 10 * 1024 * 1024;

const MAX_REDIRECTS: usize = 5;

const USER_AGENT: &str = concat!("feedhub/", env!("CARGO_PKG_VERSION"));

pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    /// `timeout` bounds the whole request, body included.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

fn request_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(err.to_string())
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn pull(&self, url: &str, validator: &str) -> Result<PullOutcome, FetchError> {
        let mut request = self.client.get(url);
        if !validator.is_empty() {
            request = request.header(IF_NONE_MATCH, validator);
        }

        let response = request.send().await.map_err(request_error)?;
        let status = response.status();
        if status == StatusCode::NOT_MODIFIED {
            return Ok(PullOutcome::NotModified);
        }
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        if response.content_length().is_some_and(|len| len > MAX_FEED_SIZE) {
            return Err(FetchError::TooLarge);
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response.bytes().await.map_err(request_error)?;
        if bytes.len() as u64 > MAX_FEED_SIZE {
            return Err(FetchError::TooLarge);
        }

        let parsed = parse_feed(&bytes)?;
        tracing::debug!(url = %url, entries = parsed.entries.len(), "Feed pulled");

        Ok(PullOutcome::Modified(PulledFeed {
            descriptor: FeedDescriptor {
                title: parsed.title,
                description: parsed.description,
                source: parsed.source,
                last_updated: Utc::now(),
                etag,
            },
            entries: parsed.entries,
        }))
    }
}
