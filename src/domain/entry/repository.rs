use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Entry;
use crate::domain::pagination::{Listing, Mark, Page};
use crate::domain::shared::{RepositoryResult, Stats};

/// Entry storage, scoped by owner on every call.
///
/// Listings are ordered by publication time, newest first unless
/// `page.newest` is false, and honour `page.marker`.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// The feed must belong to the user. Fails with `Conflict` when the
    /// feed already has an entry with the same non-empty GUID.
    async fn create(&self, user_id: &str, entry: &Entry) -> RepositoryResult<()>;

    async fn entry_with_id(&self, user_id: &str, entry_id: &str) -> RepositoryResult<Entry>;

    async fn entry_with_guid(&self, user_id: &str, guid: &str) -> RepositoryResult<Entry>;

    async fn list(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Entry>>;

    /// Entries of the feed named by `page.filter_id`.
    async fn list_from_feed(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Entry>>;

    /// Entries of every feed in the category named by `page.filter_id`.
    async fn list_from_category(&self, user_id: &str, page: &Page)
        -> RepositoryResult<Listing<Entry>>;

    /// Entries carrying at least one of the tags, each listed once.
    async fn list_from_tags(
        &self,
        user_id: &str,
        tag_ids: &[String],
        page: &Page,
    ) -> RepositoryResult<Listing<Entry>>;

    /// Apply a tag to entries. Entries already tagged are left as they are.
    async fn tag_entries(&self, user_id: &str, tag_id: &str, entry_ids: &[String])
        -> RepositoryResult<()>;

    async fn mark(&self, user_id: &str, entry_id: &str, mark: Mark) -> RepositoryResult<()>;

    async fn mark_all(&self, user_id: &str, mark: Mark) -> RepositoryResult<()>;

    async fn set_saved(&self, user_id: &str, entry_id: &str, saved: bool) -> RepositoryResult<()>;

    /// Delete entries published before `before`. Saved entries are kept.
    /// Returns the number of deleted entries.
    async fn delete_old_entries(&self, user_id: &str, before: DateTime<Utc>)
        -> RepositoryResult<u64>;

    async fn stats(&self, user_id: &str) -> RepositoryResult<Stats>;
}
