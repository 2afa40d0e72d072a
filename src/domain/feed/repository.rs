use async_trait::async_trait;

use super::Feed;
use crate::domain::pagination::{Listing, Mark, Page};
use crate::domain::shared::{RepositoryResult, Stats};

/// Feed storage, scoped by owner on every call.
#[async_trait]
pub trait FeedRepository: Send + Sync {
    /// When `feed.category_id` is set it must name a category of the same
    /// user, otherwise `ModelNotFound` is returned.
    async fn create(&self, user_id: &str, feed: &Feed) -> RepositoryResult<()>;

    /// Overwrite title, subscription, description, source, last-updated,
    /// validator and status. Category membership is changed through
    /// `CategoryRepository::add_feeds`.
    async fn update(&self, user_id: &str, feed: &Feed) -> RepositoryResult<()>;

    /// Store the outcome of a pull: title, description, source,
    /// last-updated, validator and status. Other fields are left as stored.
    async fn refresh(&self, user_id: &str, feed: &Feed) -> RepositoryResult<()>;

    /// Deletes the feed together with its entries.
    async fn delete(&self, user_id: &str, feed_id: &str) -> RepositoryResult<()>;

    async fn feed_with_id(&self, user_id: &str, feed_id: &str) -> RepositoryResult<Feed>;

    /// Feeds ordered by creation time.
    async fn list(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Feed>>;

    async fn mark(&self, user_id: &str, feed_id: &str, mark: Mark) -> RepositoryResult<()>;

    async fn stats(&self, user_id: &str, feed_id: &str) -> RepositoryResult<Stats>;
}
