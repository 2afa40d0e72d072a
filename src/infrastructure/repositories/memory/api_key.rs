use async_trait::async_trait;

use super::MemoryStore;
use crate::domain::auth::{ApiKey, ApiKeyRepository};
use crate::domain::shared::{RepositoryError, RepositoryResult};

pub struct MemoryApiKeyRepository {
    store: MemoryStore,
}

impl MemoryApiKeyRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ApiKeyRepository for MemoryApiKeyRepository {
    async fn create(&self, user_id: &str, key: &ApiKey) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.require_user(user_id)?;
        if tables.api_keys.iter().any(|k| k.key == key.key || k.id == key.id) {
            return Err(RepositoryError::Conflict("api key already exists".to_string()));
        }
        let mut key = key.clone();
        key.user_id = user_id.to_string();
        tables.api_keys.push(key);
        Ok(())
    }

    async fn key_with_value(&self, user_id: &str, key: &str) -> RepositoryResult<ApiKey> {
        self.store
            .read()
            .api_keys
            .iter()
            .find(|k| k.key == key && k.user_id == user_id)
            .cloned()
            .ok_or(RepositoryError::ModelNotFound)
    }

    async fn delete(&self, user_id: &str, key_id: &str) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        let before = tables.api_keys.len();
        tables
            .api_keys
            .retain(|k| !(k.id == key_id && k.user_id == user_id));
        if tables.api_keys.len() == before {
            return Err(RepositoryError::ModelNotFound);
        }
        Ok(())
    }
}
