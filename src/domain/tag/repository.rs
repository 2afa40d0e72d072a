use async_trait::async_trait;

use super::Tag;
use crate::domain::pagination::{Listing, Page};
use crate::domain::shared::RepositoryResult;

#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Fails with `Conflict` when the user already has a tag with this name.
    async fn create(&self, user_id: &str, tag: &Tag) -> RepositoryResult<()>;

    async fn update(&self, user_id: &str, tag: &Tag) -> RepositoryResult<()>;

    /// Removes the tag from every entry it was applied to.
    async fn delete(&self, user_id: &str, tag_id: &str) -> RepositoryResult<()>;

    async fn tag_with_id(&self, user_id: &str, tag_id: &str) -> RepositoryResult<Tag>;

    async fn tag_with_name(&self, user_id: &str, name: &str) -> RepositoryResult<Tag>;

    async fn list(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Tag>>;
}
