//! In-memory repositories.
//!
//! All repositories of one store share a single set of tables behind a
//! lock, so cascades and cross-table checks behave like the foreign keys of
//! the Postgres schema.

mod api_key;
mod category;
mod entry;
mod feed;
mod tag;
mod user;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::auth::ApiKey;
use crate::domain::category::Category;
use crate::domain::entry::Entry;
use crate::domain::feed::Feed;
use crate::domain::pagination::{paginate, Listing, Mark, Page};
use crate::domain::shared::{RepositoryError, RepositoryResult, Stats};
use crate::domain::tag::Tag;
use crate::domain::user::User;

pub use api_key::MemoryApiKeyRepository;
pub use category::MemoryCategoryRepository;
pub use entry::MemoryEntryRepository;
pub use feed::MemoryFeedRepository;
pub use tag::MemoryTagRepository;
pub use user::MemoryUserRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
struct EntryTag {
    user_id: String,
    tag_id: String,
    entry_id: String,
}

#[derive(Debug, Default)]
pub struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    feeds: Vec<Feed>,
    entries: Vec<Entry>,
    tags: Vec<Tag>,
    entry_tags: Vec<EntryTag>,
    api_keys: Vec<ApiKey>,
}

pub type MemoryStore = Arc<RwLock<Tables>>;

pub fn new_store() -> MemoryStore {
    Arc::new(RwLock::new(Tables::default()))
}

impl Tables {
    fn user_exists(&self, user_id: &str) -> bool {
        self.users.iter().any(|u| u.id == user_id)
    }

    fn require_user(&self, user_id: &str) -> RepositoryResult<()> {
        if self.user_exists(user_id) {
            Ok(())
        } else {
            Err(RepositoryError::ModelNotFound)
        }
    }

    fn category(&self, user_id: &str, category_id: &str) -> RepositoryResult<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == category_id && c.user_id == user_id)
            .ok_or(RepositoryError::ModelNotFound)
    }

    fn feed(&self, user_id: &str, feed_id: &str) -> RepositoryResult<&Feed> {
        self.feeds
            .iter()
            .find(|f| f.id == feed_id && f.user_id == user_id)
            .ok_or(RepositoryError::ModelNotFound)
    }

    fn tag(&self, user_id: &str, tag_id: &str) -> RepositoryResult<&Tag> {
        self.tags
            .iter()
            .find(|t| t.id == tag_id && t.user_id == user_id)
            .ok_or(RepositoryError::ModelNotFound)
    }

    fn entry_mut(&mut self, user_id: &str, entry_id: &str) -> RepositoryResult<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|e| e.id == entry_id && e.user_id == user_id)
            .ok_or(RepositoryError::ModelNotFound)
    }

    fn remove_entries(&mut self, doomed: impl Fn(&Entry) -> bool) -> u64 {
        let before = self.entries.len();
        let mut removed = Vec::new();
        self.entries.retain(|e| {
            if doomed(e) {
                removed.push(e.id.clone());
                false
            } else {
                true
            }
        });
        self.entry_tags.retain(|et| !removed.contains(&et.entry_id));
        (before - self.entries.len()) as u64
    }

    fn remove_feed(&mut self, feed_id: &str) {
        self.feeds.retain(|f| f.id != feed_id);
        self.remove_entries(|e| e.feed_id == feed_id);
    }

    fn remove_user(&mut self, user_id: &str) {
        self.users.retain(|u| u.id != user_id);
        self.categories.retain(|c| c.user_id != user_id);
        self.feeds.retain(|f| f.user_id != user_id);
        self.entries.retain(|e| e.user_id != user_id);
        self.tags.retain(|t| t.user_id != user_id);
        self.entry_tags.retain(|et| et.user_id != user_id);
        self.api_keys.retain(|k| k.user_id != user_id);
    }

    /// Sort key of an owned entry, for resolving entry cursors.
    fn entry_key(&self, user_id: &str, entry_id: &str) -> Option<(DateTime<Utc>, String)> {
        self.entries
            .iter()
            .find(|e| e.id == entry_id && e.user_id == user_id)
            .map(entry_order)
    }

    fn feed_key(&self, user_id: &str, feed_id: &str) -> Option<(DateTime<Utc>, String)> {
        self.feed(user_id, feed_id).ok().map(|f| (f.created_at, f.id.clone()))
    }

    /// Entries selected by `matches`, filtered by the page's marker and
    /// ordered by publication time.
    fn entry_listing(
        &self,
        user_id: &str,
        page: &Page,
        matches: impl Fn(&Entry) -> bool,
    ) -> Listing<Entry> {
        let mut rows: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| e.user_id == user_id && matches(e) && page.marker.matches(e.mark))
            .cloned()
            .collect();
        rows.sort_by_key(entry_order);
        if page.newest {
            rows.reverse();
        }

        let cursor = page
            .continuation_id
            .as_deref()
            .and_then(|id| self.entry_key(user_id, id));
        paginate(rows, page, cursor, page.newest, entry_order, |e| e.id.as_str())
    }

    /// Feeds selected by `matches`, ordered by creation time.
    fn feed_listing(
        &self,
        user_id: &str,
        page: &Page,
        matches: impl Fn(&Feed) -> bool,
    ) -> Listing<Feed> {
        let rows: Vec<Feed> = self
            .feeds
            .iter()
            .filter(|f| f.user_id == user_id && matches(f))
            .cloned()
            .collect();
        let cursor = page
            .continuation_id
            .as_deref()
            .and_then(|id| self.feed_key(user_id, id));
        by_creation(rows, page, cursor, |f| f.created_at, |f| f.id.as_str())
    }

    fn stats(&self, user_id: &str, matches: impl Fn(&Entry) -> bool) -> Stats {
        let mut stats = Stats::default();
        for entry in self.entries.iter().filter(|e| e.user_id == user_id && matches(e)) {
            stats.total += 1;
            if entry.saved {
                stats.saved += 1;
            }
            match entry.mark {
                Mark::Read => stats.read += 1,
                Mark::Unread => stats.unread += 1,
            }
        }
        stats
    }
}

fn entry_order(entry: &Entry) -> (DateTime<Utc>, String) {
    (entry.published, entry.id.clone())
}

/// Page rows ordered by `(created_at, id)`.
fn by_creation<T>(
    mut rows: Vec<T>,
    page: &Page,
    cursor: Option<(DateTime<Utc>, String)>,
    created_at: impl Fn(&T) -> DateTime<Utc>,
    id: impl Fn(&T) -> &str,
) -> Listing<T> {
    rows.sort_by(|a, b| (created_at(a), id(a)).cmp(&(created_at(b), id(b))));
    paginate(
        rows,
        page,
        cursor,
        false,
        |row| (created_at(row), id(row).to_string()),
        &id,
    )
}
