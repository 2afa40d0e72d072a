//! Postgres repositories.
//!
//! Listings resolve the continuation id to its sort key first and then read
//! `limit + 1` rows starting at that key, so a cursor stays valid while rows
//! before it are deleted or change state.

mod api_key;
mod category;
mod entry;
mod feed;
mod tag;
mod user;

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use crate::domain::pagination::{Listing, Page};
use crate::domain::shared::{RepositoryError, RepositoryResult};
use crate::infrastructure::db::DbPool;

pub use api_key::PgApiKeyRepository;
pub use category::PgCategoryRepository;
pub use entry::PgEntryRepository;
pub use feed::PgFeedRepository;
pub use tag::PgTagRepository;
pub use user::PgUserRepository;

pub(crate) const FEED_COLUMNS: &str = "id, user_id, category_id, title, subscription, description, \
     source, last_updated, etag, status, created_at";

pub(crate) const ENTRY_COLUMNS: &str =
    "id, user_id, feed_id, guid, title, link, author, published, saved, mark, created_at";

/// Sort key of a listing row: a timestamp plus the id as tie-breaker.
type CursorKey = (DateTime<Utc>, String);

/// Look up the sort key of the continuation row. `sql` selects the key
/// columns with the row id as `$1` and the owner as `$2`.
async fn resolve_cursor(
    pool: &DbPool,
    sql: &'static str,
    user_id: &str,
    page: &Page,
) -> RepositoryResult<Option<CursorKey>> {
    let Some(id) = page.continuation_id.as_deref() else {
        return Ok(None);
    };

    let key = sqlx::query_as::<_, CursorKey>(sql)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(key)
}

/// Append the cursor condition, the ordering and the limit.
fn push_window(
    builder: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    cursor: Option<CursorKey>,
    descending: bool,
    limit: usize,
) {
    let (cmp, dir) = if descending { ("<=", "DESC") } else { (">=", "ASC") };

    if let Some((at, id)) = cursor {
        builder.push(format!(" AND ({column}, id) {cmp} ("));
        builder.push_bind(at);
        builder.push(", ");
        builder.push_bind(id);
        builder.push(")");
    }

    builder.push(format!(" ORDER BY {column} {dir}, id {dir} LIMIT "));
    builder.push_bind(limit as i64 + 1);
}

fn into_listing<T>(rows: Vec<T>, page: &Page, id: impl Fn(&T) -> &str) -> Listing<T> {
    Listing::from_rows(rows, page.limit(), id)
}

/// Fail with `ModelNotFound` unless `sql` (an EXISTS query over `$1` and
/// `$2`) holds.
async fn require(pool: &DbPool, sql: &'static str, id: &str, user_id: &str) -> RepositoryResult<()> {
    let exists = sqlx::query_scalar::<_, bool>(sql)
        .bind(id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    if exists {
        Ok(())
    } else {
        Err(RepositoryError::ModelNotFound)
    }
}

fn affected(rows: u64) -> RepositoryResult<()> {
    if rows == 0 {
        Err(RepositoryError::ModelNotFound)
    } else {
        Ok(())
    }
}

const FEED_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM feeds WHERE id = $1 AND user_id = $2)";
const CATEGORY_EXISTS: &str =
    "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1 AND user_id = $2)";
const TAG_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM tags WHERE id = $1 AND user_id = $2)";
