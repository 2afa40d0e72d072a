use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{EntryTag, MemoryStore};
use crate::domain::entry::{Entry, EntryRepository};
use crate::domain::pagination::{Listing, Mark, Page};
use crate::domain::shared::{RepositoryError, RepositoryResult, Stats};

pub struct MemoryEntryRepository {
    store: MemoryStore,
}

impl MemoryEntryRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl EntryRepository for MemoryEntryRepository {
    async fn create(&self, user_id: &str, entry: &Entry) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.feed(user_id, &entry.feed_id)?;
        let duplicate = tables.entries.iter().any(|e| {
            e.id == entry.id
                || (!entry.guid.is_empty()
                    && e.user_id == user_id
                    && e.feed_id == entry.feed_id
                    && e.guid == entry.guid)
        });
        if duplicate {
            return Err(RepositoryError::Conflict(format!(
                "entry {} already exists",
                entry.guid
            )));
        }
        let mut entry = entry.clone();
        entry.user_id = user_id.to_string();
        tables.entries.push(entry);
        Ok(())
    }

    async fn entry_with_id(&self, user_id: &str, entry_id: &str) -> RepositoryResult<Entry> {
        self.store
            .read()
            .entries
            .iter()
            .find(|e| e.id == entry_id && e.user_id == user_id)
            .cloned()
            .ok_or(RepositoryError::ModelNotFound)
    }

    async fn entry_with_guid(&self, user_id: &str, guid: &str) -> RepositoryResult<Entry> {
        self.store
            .read()
            .entries
            .iter()
            .find(|e| e.guid == guid && e.user_id == user_id)
            .cloned()
            .ok_or(RepositoryError::ModelNotFound)
    }

    async fn list(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Entry>> {
        Ok(self.store.read().entry_listing(user_id, page, |_| true))
    }

    async fn list_from_feed(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Entry>> {
        let tables = self.store.read();
        let feed_id = page.filter_id.as_deref().unwrap_or_default();
        tables.feed(user_id, feed_id)?;
        Ok(tables.entry_listing(user_id, page, |e| e.feed_id == feed_id))
    }

    async fn list_from_category(
        &self,
        user_id: &str,
        page: &Page,
    ) -> RepositoryResult<Listing<Entry>> {
        let tables = self.store.read();
        let category_id = page.filter_id.as_deref().unwrap_or_default();
        tables.category(user_id, category_id)?;
        let feed_ids: Vec<&str> = tables
            .feeds
            .iter()
            .filter(|f| f.user_id == user_id && f.category_id.as_deref() == Some(category_id))
            .map(|f| f.id.as_str())
            .collect();
        Ok(tables.entry_listing(user_id, page, |e| feed_ids.contains(&e.feed_id.as_str())))
    }

    async fn list_from_tags(
        &self,
        user_id: &str,
        tag_ids: &[String],
        page: &Page,
    ) -> RepositoryResult<Listing<Entry>> {
        let tables = self.store.read();
        let tagged: Vec<&str> = tables
            .entry_tags
            .iter()
            .filter(|et| et.user_id == user_id && tag_ids.contains(&et.tag_id))
            .map(|et| et.entry_id.as_str())
            .collect();
        Ok(tables.entry_listing(user_id, page, |e| tagged.contains(&e.id.as_str())))
    }

    async fn tag_entries(
        &self,
        user_id: &str,
        tag_id: &str,
        entry_ids: &[String],
    ) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.tag(user_id, tag_id)?;
        if entry_ids
            .iter()
            .any(|id| !tables.entries.iter().any(|e| &e.id == id && e.user_id == user_id))
        {
            return Err(RepositoryError::ModelNotFound);
        }

        for entry_id in entry_ids {
            let link = EntryTag {
                user_id: user_id.to_string(),
                tag_id: tag_id.to_string(),
                entry_id: entry_id.clone(),
            };
            if !tables.entry_tags.contains(&link) {
                tables.entry_tags.push(link);
            }
        }
        Ok(())
    }

    async fn mark(&self, user_id: &str, entry_id: &str, mark: Mark) -> RepositoryResult<()> {
        self.store.write().entry_mut(user_id, entry_id)?.mark = mark;
        Ok(())
    }

    async fn mark_all(&self, user_id: &str, mark: Mark) -> RepositoryResult<()> {
        for entry in self
            .store
            .write()
            .entries
            .iter_mut()
            .filter(|e| e.user_id == user_id)
        {
            entry.mark = mark;
        }
        Ok(())
    }

    async fn set_saved(&self, user_id: &str, entry_id: &str, saved: bool) -> RepositoryResult<()> {
        self.store.write().entry_mut(user_id, entry_id)?.saved = saved;
        Ok(())
    }

    async fn delete_old_entries(
        &self,
        user_id: &str,
        before: DateTime<Utc>,
    ) -> RepositoryResult<u64> {
        Ok(self
            .store
            .write()
            .remove_entries(|e| e.user_id == user_id && !e.saved && e.published < before))
    }

    async fn stats(&self, user_id: &str) -> RepositoryResult<Stats> {
        Ok(self.store.read().stats(user_id, |_| true))
    }
}
