use std::sync::Arc;

use async_trait::async_trait;
use sqlx::QueryBuilder;

use super::{affected, into_listing, push_window, resolve_cursor};
use crate::domain::pagination::{Listing, Page};
use crate::domain::shared::RepositoryResult;
use crate::domain::tag::{Tag, TagRepository};
use crate::infrastructure::db::DbPool;

const TAG_CURSOR: &str = "SELECT created_at, id FROM tags WHERE id = $1 AND user_id = $2";

pub struct PgTagRepository {
    pool: Arc<DbPool>,
}

impl PgTagRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn create(&self, user_id: &str, tag: &Tag) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query("INSERT INTO tags (id, user_id, name, created_at) VALUES ($1, $2, $3, $4)")
            .bind(&tag.id)
            .bind(user_id)
            .bind(&tag.name)
            .bind(tag.created_at)
            .execute(pool)
            .await?;

        Ok(())
    }

    async fn update(&self, user_id: &str, tag: &Tag) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("UPDATE tags SET name = $1 WHERE id = $2 AND user_id = $3")
            .bind(&tag.name)
            .bind(&tag.id)
            .bind(user_id)
            .execute(pool)
            .await?;

        affected(result.rows_affected())
    }

    async fn delete(&self, user_id: &str, tag_id: &str) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM tags WHERE id = $1 AND user_id = $2")
            .bind(tag_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        affected(result.rows_affected())
    }

    async fn tag_with_id(&self, user_id: &str, tag_id: &str) -> RepositoryResult<Tag> {
        let pool = self.pool.as_ref();
        let tag = sqlx::query_as::<_, Tag>(
            "SELECT id, user_id, name, created_at FROM tags WHERE id = $1 AND user_id = $2",
        )
        .bind(tag_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(tag)
    }

    async fn tag_with_name(&self, user_id: &str, name: &str) -> RepositoryResult<Tag> {
        let pool = self.pool.as_ref();
        let tag = sqlx::query_as::<_, Tag>(
            "SELECT id, user_id, name, created_at FROM tags WHERE user_id = $1 AND name = $2",
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(tag)
    }

    async fn list(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Tag>> {
        let pool = self.pool.as_ref();
        let cursor = resolve_cursor(pool, TAG_CURSOR, user_id, page).await?;

        let mut builder =
            QueryBuilder::new("SELECT id, user_id, name, created_at FROM tags WHERE user_id = ");
        builder.push_bind(user_id);
        push_window(&mut builder, "created_at", cursor, false, page.limit());
        let rows = builder.build_query_as::<Tag>().fetch_all(pool).await?;

        Ok(into_listing(rows, page, |t| t.id.as_str()))
    }
}
