use async_trait::async_trait;

use super::User;
use crate::domain::pagination::{Listing, Page};
use crate::domain::shared::RepositoryResult;

/// Account storage. Deleting a user removes everything the user owns.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the username is taken.
    async fn create(&self, user: &User) -> RepositoryResult<()>;

    async fn update(&self, user: &User) -> RepositoryResult<()>;

    async fn delete(&self, user_id: &str) -> RepositoryResult<()>;

    async fn user_with_id(&self, user_id: &str) -> RepositoryResult<User>;

    /// Exact, case-sensitive match.
    async fn user_with_name(&self, username: &str) -> RepositoryResult<User>;

    /// Users ordered by creation time.
    async fn list(&self, page: &Page) -> RepositoryResult<Listing<User>>;
}
