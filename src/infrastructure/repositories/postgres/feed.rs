use std::sync::Arc;

use async_trait::async_trait;
use sqlx::QueryBuilder;

use super::{
    affected, into_listing, push_window, require, resolve_cursor, CATEGORY_EXISTS, FEED_COLUMNS,
    FEED_EXISTS,
};
use crate::domain::feed::{Feed, FeedRepository};
use crate::domain::pagination::{Listing, Mark, Page};
use crate::domain::shared::{RepositoryResult, Stats};
use crate::infrastructure::db::DbPool;

const FEED_CURSOR: &str = "SELECT created_at, id FROM feeds WHERE id = $1 AND user_id = $2";

pub struct PgFeedRepository {
    pool: Arc<DbPool>,
}

impl PgFeedRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedRepository for PgFeedRepository {
    async fn create(&self, user_id: &str, feed: &Feed) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        if let Some(category_id) = feed.category_id.as_deref() {
            require(pool, CATEGORY_EXISTS, category_id, user_id).await?;
        }

        sqlx::query(
            r#"
            INSERT INTO feeds (id, user_id, category_id, title, subscription, description,
                               source, last_updated, etag, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&feed.id)
        .bind(user_id)
        .bind(&feed.category_id)
        .bind(&feed.title)
        .bind(&feed.subscription)
        .bind(&feed.description)
        .bind(&feed.source)
        .bind(feed.last_updated)
        .bind(&feed.etag)
        .bind(feed.status)
        .bind(feed.created_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn update(&self, user_id: &str, feed: &Feed) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE feeds
            SET title = $1, subscription = $2, description = $3, source = $4,
                last_updated = $5, etag = $6, status = $7
            WHERE id = $8 AND user_id = $9
            "#,
        )
        .bind(&feed.title)
        .bind(&feed.subscription)
        .bind(&feed.description)
        .bind(&feed.source)
        .bind(feed.last_updated)
        .bind(&feed.etag)
        .bind(feed.status)
        .bind(&feed.id)
        .bind(user_id)
        .execute(pool)
        .await?;

        affected(result.rows_affected())
    }

    async fn refresh(&self, user_id: &str, feed: &Feed) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE feeds
            SET title = $1, description = $2, source = $3,
                last_updated = $4, etag = $5, status = $6
            WHERE id = $7 AND user_id = $8
            "#,
        )
        .bind(&feed.title)
        .bind(&feed.description)
        .bind(&feed.source)
        .bind(feed.last_updated)
        .bind(&feed.etag)
        .bind(feed.status)
        .bind(&feed.id)
        .bind(user_id)
        .execute(pool)
        .await?;

        affected(result.rows_affected())
    }

    async fn delete(&self, user_id: &str, feed_id: &str) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM feeds WHERE id = $1 AND user_id = $2")
            .bind(feed_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        affected(result.rows_affected())
    }

    async fn feed_with_id(&self, user_id: &str, feed_id: &str) -> RepositoryResult<Feed> {
        let pool = self.pool.as_ref();
        let feed = sqlx::query_as::<_, Feed>(&format!(
            "SELECT {FEED_COLUMNS} FROM feeds WHERE id = $1 AND user_id = $2"
        ))
        .bind(feed_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(feed)
    }

    async fn list(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Feed>> {
        let pool = self.pool.as_ref();
        let cursor = resolve_cursor(pool, FEED_CURSOR, user_id, page).await?;

        let mut builder =
            QueryBuilder::new(format!("SELECT {FEED_COLUMNS} FROM feeds WHERE user_id = "));
        builder.push_bind(user_id);
        push_window(&mut builder, "created_at", cursor, false, page.limit());
        let rows = builder.build_query_as::<Feed>().fetch_all(pool).await?;

        Ok(into_listing(rows, page, |f| f.id.as_str()))
    }

    async fn mark(&self, user_id: &str, feed_id: &str, mark: Mark) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        require(pool, FEED_EXISTS, feed_id, user_id).await?;

        sqlx::query("UPDATE entries SET mark = $1 WHERE user_id = $2 AND feed_id = $3")
            .bind(mark)
            .bind(user_id)
            .bind(feed_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    async fn stats(&self, user_id: &str, feed_id: &str) -> RepositoryResult<Stats> {
        let pool = self.pool.as_ref();
        require(pool, FEED_EXISTS, feed_id, user_id).await?;

        let stats = sqlx::query_as::<_, Stats>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE mark = 'unread') AS unread,
                COUNT(*) FILTER (WHERE mark = 'read') AS read,
                COUNT(*) FILTER (WHERE saved) AS saved,
                COUNT(*) AS total
            FROM entries
            WHERE user_id = $1 AND feed_id = $2
            "#,
        )
        .bind(user_id)
        .bind(feed_id)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }
}
