use std::sync::Arc;

use async_trait::async_trait;
use sqlx::QueryBuilder;

use super::{
    affected, into_listing, push_window, require, resolve_cursor, CATEGORY_EXISTS, FEED_COLUMNS,
};
use crate::domain::category::{Category, CategoryRepository};
use crate::domain::feed::Feed;
use crate::domain::pagination::{Listing, Mark, Page};
use crate::domain::shared::{RepositoryError, RepositoryResult, Stats};
use crate::infrastructure::db::DbPool;

const CATEGORY_CURSOR: &str = "SELECT created_at, id FROM categories WHERE id = $1 AND user_id = $2";
const FEED_CURSOR: &str = "SELECT created_at, id FROM feeds WHERE id = $1 AND user_id = $2";

pub struct PgCategoryRepository {
    pool: Arc<DbPool>,
}

impl PgCategoryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    async fn feed_listing(
        &self,
        user_id: &str,
        category_id: Option<&str>,
        page: &Page,
    ) -> RepositoryResult<Listing<Feed>> {
        let pool = self.pool.as_ref();
        let cursor = resolve_cursor(pool, FEED_CURSOR, user_id, page).await?;

        let mut builder = QueryBuilder::new(format!("SELECT {FEED_COLUMNS} FROM feeds WHERE user_id = "));
        builder.push_bind(user_id);
        match category_id {
            Some(category_id) => {
                builder.push(" AND category_id = ");
                builder.push_bind(category_id);
            }
            None => {
                builder.push(" AND category_id IS NULL");
            }
        }
        push_window(&mut builder, "created_at", cursor, false, page.limit());
        let rows = builder.build_query_as::<Feed>().fetch_all(pool).await?;

        Ok(into_listing(rows, page, |f| f.id.as_str()))
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, user_id: &str, category: &Category) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            INSERT INTO categories (id, user_id, name, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&category.id)
        .bind(user_id)
        .bind(&category.name)
        .bind(category.created_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn update(&self, user_id: &str, category: &Category) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("UPDATE categories SET name = $1 WHERE id = $2 AND user_id = $3")
            .bind(&category.name)
            .bind(&category.id)
            .bind(user_id)
            .execute(pool)
            .await?;

        affected(result.rows_affected())
    }

    async fn delete(&self, user_id: &str, category_id: &str) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(category_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        affected(result.rows_affected())
    }

    async fn category_with_id(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> RepositoryResult<Category> {
        let pool = self.pool.as_ref();
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, user_id, name, created_at FROM categories WHERE id = $1 AND user_id = $2",
        )
        .bind(category_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(category)
    }

    async fn category_with_name(&self, user_id: &str, name: &str) -> RepositoryResult<Category> {
        let pool = self.pool.as_ref();
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, user_id, name, created_at
            FROM categories
            WHERE user_id = $1 AND lower(name) = lower($2)
            "#,
        )
        .bind(user_id)
        .bind(name.trim())
        .fetch_one(pool)
        .await?;

        Ok(category)
    }

    async fn list(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Category>> {
        let pool = self.pool.as_ref();
        let cursor = resolve_cursor(pool, CATEGORY_CURSOR, user_id, page).await?;

        let mut builder =
            QueryBuilder::new("SELECT id, user_id, name, created_at FROM categories WHERE user_id = ");
        builder.push_bind(user_id);
        push_window(&mut builder, "created_at", cursor, false, page.limit());
        let rows = builder.build_query_as::<Category>().fetch_all(pool).await?;

        Ok(into_listing(rows, page, |c| c.id.as_str()))
    }

    async fn feeds(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Feed>> {
        let category_id = page.filter_id.as_deref().unwrap_or_default();
        require(self.pool.as_ref(), CATEGORY_EXISTS, category_id, user_id).await?;
        self.feed_listing(user_id, Some(category_id), page).await
    }

    async fn uncategorized(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Feed>> {
        self.feed_listing(user_id, None, page).await
    }

    async fn add_feeds(
        &self,
        user_id: &str,
        category_id: &str,
        feed_ids: &[String],
    ) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        require(pool, CATEGORY_EXISTS, category_id, user_id).await?;

        let mut wanted = feed_ids.to_vec();
        wanted.sort();
        wanted.dedup();

        let mut tx = pool.begin().await?;
        let owned = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM feeds WHERE user_id = $1 AND id = ANY($2)",
        )
        .bind(user_id)
        .bind(&wanted)
        .fetch_one(&mut *tx)
        .await?;
        if owned as usize != wanted.len() {
            return Err(RepositoryError::ModelNotFound);
        }

        sqlx::query("UPDATE feeds SET category_id = $1 WHERE user_id = $2 AND id = ANY($3)")
            .bind(category_id)
            .bind(user_id)
            .bind(&wanted)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    async fn mark(&self, user_id: &str, category_id: &str, mark: Mark) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        require(pool, CATEGORY_EXISTS, category_id, user_id).await?;

        sqlx::query(
            r#"
            UPDATE entries SET mark = $1
            WHERE user_id = $2
              AND feed_id IN (SELECT id FROM feeds WHERE user_id = $2 AND category_id = $3)
            "#,
        )
        .bind(mark)
        .bind(user_id)
        .bind(category_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn stats(&self, user_id: &str, category_id: &str) -> RepositoryResult<Stats> {
        let pool = self.pool.as_ref();
        require(pool, CATEGORY_EXISTS, category_id, user_id).await?;

        let stats = sqlx::query_as::<_, Stats>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE mark = 'unread') AS unread,
                COUNT(*) FILTER (WHERE mark = 'read') AS read,
                COUNT(*) FILTER (WHERE saved) AS saved,
                COUNT(*) AS total
            FROM entries
            WHERE user_id = $1
              AND feed_id IN (SELECT id FROM feeds WHERE user_id = $1 AND category_id = $2)
            "#,
        )
        .bind(user_id)
        .bind(category_id)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }
}
