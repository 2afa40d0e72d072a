use std::sync::Arc;

use async_trait::async_trait;
use sqlx::QueryBuilder;

use super::{affected, into_listing, push_window, CursorKey};
use crate::domain::pagination::{Listing, Page};
use crate::domain::shared::RepositoryResult;
use crate::domain::user::{User, UserRepository};
use crate::infrastructure::db::DbPool;

pub struct PgUserRepository {
    pool: Arc<DbPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, password_salt, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.password_salt)
        .bind(user.created_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn update(&self, user: &User) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $1, password_hash = $2, password_salt = $3
            WHERE id = $4
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.password_salt)
        .bind(&user.id)
        .execute(pool)
        .await?;

        affected(result.rows_affected())
    }

    /// Owned rows go with the user through `ON DELETE CASCADE`.
    async fn delete(&self, user_id: &str) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        affected(result.rows_affected())
    }

    async fn user_with_id(&self, user_id: &str) -> RepositoryResult<User> {
        let pool = self.pool.as_ref();
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(user)
    }

    async fn user_with_name(&self, username: &str) -> RepositoryResult<User> {
        let pool = self.pool.as_ref();
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_one(pool)
            .await?;

        Ok(user)
    }

    async fn list(&self, page: &Page) -> RepositoryResult<Listing<User>> {
        let pool = self.pool.as_ref();
        let cursor = match page.continuation_id.as_deref() {
            Some(id) => {
                sqlx::query_as::<_, CursorKey>("SELECT created_at, id FROM users WHERE id = $1")
                    .bind(id)
                    .fetch_optional(pool)
                    .await?
            }
            None => None,
        };

        let mut builder = QueryBuilder::new("SELECT * FROM users WHERE TRUE");
        push_window(&mut builder, "created_at", cursor, false, page.limit());
        let rows = builder.build_query_as::<User>().fetch_all(pool).await?;

        Ok(into_listing(rows, page, |u| u.id.as_str()))
    }
}
