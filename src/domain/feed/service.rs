use super::error::FeedServiceError;
use crate::domain::category::CategoryRepository;
use crate::domain::entry::{EntryRepository, EntryResponse};
use crate::domain::feed::{CreateFeedRequest, Feed, FeedRepository, FeedResponse, UpdateFeedRequest};
use crate::domain::pagination::{Listing, Mark, Page};
use crate::domain::shared::{RepositoryError, Stats};
use crate::domain::sync::{ingest_entries, FeedFetcher, PullOutcome};
use std::sync::Arc;

pub struct FeedService {
    feed_repo: Arc<dyn FeedRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    entry_repo: Arc<dyn EntryRepository>,
    fetcher: Arc<dyn FeedFetcher>,
}

impl FeedService {
    pub fn new(
        feed_repo: Arc<dyn FeedRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        entry_repo: Arc<dyn EntryRepository>,
        fetcher: Arc<dyn FeedFetcher>,
    ) -> Self {
        Self {
            feed_repo,
            category_repo,
            entry_repo,
            fetcher,
        }
    }

    /// Subscribe to a feed. The feed is pulled once up front so an
    /// unreachable or unparseable subscription is rejected immediately and
    /// the first batch of entries is available right away.
    pub async fn create_feed(
        &self,
        user_id: &str,
        request: CreateFeedRequest,
    ) -> Result<FeedResponse, FeedServiceError> {
        let subscription = Self::validate_url(&request.subscription)?;
        let requested_title = request
            .title
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let outcome = self
            .fetcher
            .pull(&subscription, "")
            .await
            .map_err(|e| FeedServiceError::Upstream(e.to_string()))?;

        let mut feed = Feed::new(user_id, &subscription, &requested_title);
        feed.category_id = request.category.filter(|id| !id.is_empty());

        let entries = match outcome {
            PullOutcome::Modified(pulled) => {
                pulled.descriptor.apply_to(&mut feed);
                if !requested_title.is_empty() {
                    feed.title = requested_title;
                }
                pulled.entries
            }
            PullOutcome::NotModified => Vec::new(),
        };

        match self.feed_repo.create(user_id, &feed).await {
            Ok(()) => {}
            Err(RepositoryError::ModelNotFound) => {
                return Err(FeedServiceError::Invalid(
                    "Category does not exist".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        let created =
            ingest_entries(self.entry_repo.as_ref(), user_id, &feed.id, entries, None).await?;
        tracing::info!(
            user_id = %user_id,
            feed_id = %feed.id,
            entries = created,
            "Subscribed to feed"
        );

        Ok(FeedResponse::from(feed))
    }

    pub async fn list_feeds(
        &self,
        user_id: &str,
        page: &Page,
    ) -> Result<Listing<FeedResponse>, FeedServiceError> {
        let listing = self.feed_repo.list(user_id, page).await?;
        Ok(listing.map(FeedResponse::from))
    }

    pub async fn list_uncategorized(
        &self,
        user_id: &str,
        page: &Page,
    ) -> Result<Listing<FeedResponse>, FeedServiceError> {
        let listing = self.category_repo.uncategorized(user_id, page).await?;
        Ok(listing.map(FeedResponse::from))
    }

    pub async fn get_feed(
        &self,
        user_id: &str,
        feed_id: &str,
    ) -> Result<FeedResponse, FeedServiceError> {
        let feed = self.feed_repo.feed_with_id(user_id, feed_id).await?;
        Ok(FeedResponse::from(feed))
    }

    pub async fn update_feed(
        &self,
        user_id: &str,
        feed_id: &str,
        request: UpdateFeedRequest,
    ) -> Result<FeedResponse, FeedServiceError> {
        let mut feed = self.feed_repo.feed_with_id(user_id, feed_id).await?;

        if let Some(title) = request.title {
            feed.title = title.trim().to_string();
        }
        if let Some(subscription) = request.subscription {
            let subscription = Self::validate_url(&subscription)?;
            if subscription != feed.subscription {
                // A new address invalidates the stored validator.
                feed.subscription = subscription;
                feed.etag.clear();
                feed.last_updated = None;
            }
        }

        self.feed_repo.update(user_id, &feed).await?;
        Ok(FeedResponse::from(feed))
    }

    pub async fn delete_feed(&self, user_id: &str, feed_id: &str) -> Result<(), FeedServiceError> {
        self.feed_repo.delete(user_id, feed_id).await?;
        Ok(())
    }

    pub async fn list_entries(
        &self,
        user_id: &str,
        feed_id: &str,
        page: Page,
    ) -> Result<Listing<EntryResponse>, FeedServiceError> {
        let page = page.filtered(feed_id);
        let listing = self.entry_repo.list_from_feed(user_id, &page).await?;
        Ok(listing.map(EntryResponse::from))
    }

    pub async fn mark_feed(
        &self,
        user_id: &str,
        feed_id: &str,
        mark: Mark,
    ) -> Result<(), FeedServiceError> {
        self.feed_repo.mark(user_id, feed_id, mark).await?;
        Ok(())
    }

    pub async fn feed_stats(&self, user_id: &str, feed_id: &str) -> Result<Stats, FeedServiceError> {
        Ok(self.feed_repo.stats(user_id, feed_id).await?)
    }

    fn validate_url(raw: &str) -> Result<String, FeedServiceError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(FeedServiceError::Invalid(
                "Subscription URL is required".to_string(),
            ));
        }

        let url = url::Url::parse(raw)
            .map_err(|e| FeedServiceError::Invalid(format!("Invalid subscription URL: {}", e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url.to_string()),
            scheme => Err(FeedServiceError::Invalid(format!(
                "Unsupported URL scheme: {}",
                scheme
            ))),
        }
    }
}
