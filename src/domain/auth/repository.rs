use async_trait::async_trait;

use super::ApiKey;
use crate::domain::shared::RepositoryResult;

#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    async fn create(&self, user_id: &str, key: &ApiKey) -> RepositoryResult<()>;

    async fn key_with_value(&self, user_id: &str, key: &str) -> RepositoryResult<ApiKey>;

    async fn delete(&self, user_id: &str, key_id: &str) -> RepositoryResult<()>;
}
