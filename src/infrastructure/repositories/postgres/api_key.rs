use std::sync::Arc;

use async_trait::async_trait;

use super::affected;
use crate::domain::auth::{ApiKey, ApiKeyRepository};
use crate::domain::shared::RepositoryResult;
use crate::infrastructure::db::DbPool;

pub struct PgApiKeyRepository {
    pool: Arc<DbPool>,
}

impl PgApiKeyRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyRepository for PgApiKeyRepository {
    async fn create(&self, user_id: &str, key: &ApiKey) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            INSERT INTO api_keys (id, user_id, key, key_type, expires_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&key.id)
        .bind(user_id)
        .bind(&key.key)
        .bind(key.key_type)
        .bind(key.expires_at)
        .bind(key.created_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn key_with_value(&self, user_id: &str, key: &str) -> RepositoryResult<ApiKey> {
        let pool = self.pool.as_ref();
        let key = sqlx::query_as::<_, ApiKey>(
            r#"
            SELECT id, user_id, key, key_type, expires_at, created_at
            FROM api_keys
            WHERE key = $1 AND user_id = $2
            "#,
        )
        .bind(key)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(key)
    }

    async fn delete(&self, user_id: &str, key_id: &str) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1 AND user_id = $2")
            .bind(key_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        affected(result.rows_affected())
    }
}
