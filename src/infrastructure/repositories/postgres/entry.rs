use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use super::{
    affected, into_listing, push_window, require, resolve_cursor, CATEGORY_EXISTS, ENTRY_COLUMNS,
    FEED_EXISTS, TAG_EXISTS,
};
use crate::domain::entry::{Entry, EntryRepository};
use crate::domain::pagination::{Listing, Mark, Page};
use crate::domain::shared::{RepositoryError, RepositoryResult, Stats};
use crate::infrastructure::db::DbPool;

const ENTRY_CURSOR: &str = "SELECT published, id FROM entries WHERE id = $1 AND user_id = $2";

pub struct PgEntryRepository {
    pool: Arc<DbPool>,
}

impl PgEntryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Run an entry listing. `scope` appends extra conditions to the
    /// owner filter.
    async fn listing<'a>(
        &self,
        user_id: &'a str,
        page: &'a Page,
        scope: impl FnOnce(&mut QueryBuilder<'a, Postgres>),
    ) -> RepositoryResult<Listing<Entry>> {
        let pool = self.pool.as_ref();
        let cursor = resolve_cursor(pool, ENTRY_CURSOR, user_id, page).await?;

        let mut builder =
            QueryBuilder::new(format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE user_id = "));
        builder.push_bind(user_id);
        scope(&mut builder);
        if let Some(mark) = page.marker.as_mark() {
            builder.push(" AND mark = ");
            builder.push_bind(mark);
        }
        push_window(&mut builder, "published", cursor, page.newest, page.limit());
        let rows = builder.build_query_as::<Entry>().fetch_all(pool).await?;

        Ok(into_listing(rows, page, |e| e.id.as_str()))
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    async fn create(&self, user_id: &str, entry: &Entry) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            INSERT INTO entries (id, user_id, feed_id, guid, title, link, author,
                                 published, saved, mark, created_at)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11
            WHERE EXISTS (SELECT 1 FROM feeds WHERE id = $3 AND user_id = $2)
            "#,
        )
        .bind(&entry.id)
        .bind(user_id)
        .bind(&entry.feed_id)
        .bind(&entry.guid)
        .bind(&entry.title)
        .bind(&entry.link)
        .bind(&entry.author)
        .bind(entry.published)
        .bind(entry.saved)
        .bind(entry.mark)
        .bind(entry.created_at)
        .execute(pool)
        .await?;

        affected(result.rows_affected())
    }

    async fn entry_with_id(&self, user_id: &str, entry_id: &str) -> RepositoryResult<Entry> {
        let pool = self.pool.as_ref();
        let entry = sqlx::query_as::<_, Entry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE id = $1 AND user_id = $2"
        ))
        .bind(entry_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }

    async fn entry_with_guid(&self, user_id: &str, guid: &str) -> RepositoryResult<Entry> {
        let pool = self.pool.as_ref();
        let entry = sqlx::query_as::<_, Entry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE guid = $1 AND user_id = $2 LIMIT 1"
        ))
        .bind(guid)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(entry)
    }

    async fn list(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Entry>> {
        self.listing(user_id, page, |_| {}).await
    }

    async fn list_from_feed(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Entry>> {
        let feed_id = page.filter_id.as_deref().unwrap_or_default();
        require(self.pool.as_ref(), FEED_EXISTS, feed_id, user_id).await?;

        self.listing(user_id, page, |builder| {
            builder.push(" AND feed_id = ");
            builder.push_bind(feed_id);
        })
        .await
    }

    async fn list_from_category(
        &self,
        user_id: &str,
        page: &Page,
    ) -> RepositoryResult<Listing<Entry>> {
        let category_id = page.filter_id.as_deref().unwrap_or_default();
        require(self.pool.as_ref(), CATEGORY_EXISTS, category_id, user_id).await?;

        self.listing(user_id, page, |builder| {
            builder.push(" AND feed_id IN (SELECT id FROM feeds WHERE user_id = ");
            builder.push_bind(user_id);
            builder.push(" AND category_id = ");
            builder.push_bind(category_id);
            builder.push(")");
        })
        .await
    }

    async fn list_from_tags(
        &self,
        user_id: &str,
        tag_ids: &[String],
        page: &Page,
    ) -> RepositoryResult<Listing<Entry>> {
        self.listing(user_id, page, |builder| {
            builder.push(
                " AND EXISTS (SELECT 1 FROM entry_tags et WHERE et.entry_id = entries.id AND et.user_id = ",
            );
            builder.push_bind(user_id);
            builder.push(" AND et.tag_id = ANY(");
            builder.push_bind(tag_ids);
            builder.push("))");
        })
        .await
    }

    async fn tag_entries(
        &self,
        user_id: &str,
        tag_id: &str,
        entry_ids: &[String],
    ) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        require(pool, TAG_EXISTS, tag_id, user_id).await?;

        let mut wanted = entry_ids.to_vec();
        wanted.sort();
        wanted.dedup();

        let mut tx = pool.begin().await?;
        let owned = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM entries WHERE user_id = $1 AND id = ANY($2)",
        )
        .bind(user_id)
        .bind(&wanted)
        .fetch_one(&mut *tx)
        .await?;
        if owned as usize != wanted.len() {
            return Err(RepositoryError::ModelNotFound);
        }

        sqlx::query(
            r#"
            INSERT INTO entry_tags (user_id, tag_id, entry_id)
            SELECT $1, $2, id FROM entries WHERE user_id = $1 AND id = ANY($3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(tag_id)
        .bind(&wanted)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(())
    }

    async fn mark(&self, user_id: &str, entry_id: &str, mark: Mark) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("UPDATE entries SET mark = $1 WHERE id = $2 AND user_id = $3")
            .bind(mark)
            .bind(entry_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        affected(result.rows_affected())
    }

    async fn mark_all(&self, user_id: &str, mark: Mark) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query("UPDATE entries SET mark = $1 WHERE user_id = $2")
            .bind(mark)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    async fn set_saved(&self, user_id: &str, entry_id: &str, saved: bool) -> RepositoryResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("UPDATE entries SET saved = $1 WHERE id = $2 AND user_id = $3")
            .bind(saved)
            .bind(entry_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        affected(result.rows_affected())
    }

    async fn delete_old_entries(
        &self,
        user_id: &str,
        before: DateTime<Utc>,
    ) -> RepositoryResult<u64> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            "DELETE FROM entries WHERE user_id = $1 AND published < $2 AND NOT saved",
        )
        .bind(user_id)
        .bind(before)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn stats(&self, user_id: &str) -> RepositoryResult<Stats> {
        let pool = self.pool.as_ref();
        let stats = sqlx::query_as::<_, Stats>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE mark = 'unread') AS unread,
                COUNT(*) FILTER (WHERE mark = 'read') AS read,
                COUNT(*) FILTER (WHERE saved) AS saved,
                COUNT(*) AS total
            FROM entries
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }
}
