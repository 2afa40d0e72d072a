use async_trait::async_trait;

use super::Category;
use crate::domain::feed::Feed;
use crate::domain::pagination::{Listing, Mark, Page};
use crate::domain::shared::{RepositoryResult, Stats};

/// Category storage, scoped by owner on every call.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Fails with `Conflict` when the user already has a category with the
    /// same name, compared case-insensitively.
    async fn create(&self, user_id: &str, category: &Category) -> RepositoryResult<()>;

    async fn update(&self, user_id: &str, category: &Category) -> RepositoryResult<()>;

    /// Feeds of a deleted category become uncategorized.
    async fn delete(&self, user_id: &str, category_id: &str) -> RepositoryResult<()>;

    async fn category_with_id(&self, user_id: &str, category_id: &str)
        -> RepositoryResult<Category>;

    async fn category_with_name(&self, user_id: &str, name: &str) -> RepositoryResult<Category>;

    async fn list(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Category>>;

    /// Feeds of the category named by `page.filter_id`.
    async fn feeds(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Feed>>;

    /// Feeds that belong to no category.
    async fn uncategorized(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Feed>>;

    /// Move the feeds into the category, removing them from any other.
    /// Either every feed moves or none does: `ModelNotFound` when the
    /// category or any of the feeds is not the user's.
    async fn add_feeds(&self, user_id: &str, category_id: &str, feed_ids: &[String])
        -> RepositoryResult<()>;

    /// Set the mark of every entry of every feed in the category.
    async fn mark(&self, user_id: &str, category_id: &str, mark: Mark) -> RepositoryResult<()>;

    async fn stats(&self, user_id: &str, category_id: &str) -> RepositoryResult<Stats>;
}
