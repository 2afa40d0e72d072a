use async_trait::async_trait;

use super::MemoryStore;
use crate::domain::feed::{Feed, FeedRepository};
use crate::domain::pagination::{Listing, Mark, Page};
use crate::domain::shared::{RepositoryError, RepositoryResult, Stats};

pub struct MemoryFeedRepository {
    store: MemoryStore,
}

impl MemoryFeedRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl FeedRepository for MemoryFeedRepository {
    async fn create(&self, user_id: &str, feed: &Feed) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.require_user(user_id)?;
        if let Some(category_id) = feed.category_id.as_deref() {
            tables.category(user_id, category_id)?;
        }
        if tables.feeds.iter().any(|f| f.id == feed.id) {
            return Err(RepositoryError::Conflict(format!("feed {} already exists", feed.id)));
        }
        let mut feed = feed.clone();
        feed.user_id = user_id.to_string();
        tables.feeds.push(feed);
        Ok(())
    }

    async fn update(&self, user_id: &str, feed: &Feed) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        let stored = tables
            .feeds
            .iter_mut()
            .find(|f| f.id == feed.id && f.user_id == user_id)
            .ok_or(RepositoryError::ModelNotFound)?;
        stored.title = feed.title.clone();
        stored.subscription = feed.subscription.clone();
        stored.description = feed.description.clone();
        stored.source = feed.source.clone();
        stored.last_updated = feed.last_updated;
        stored.etag = feed.etag.clone();
        stored.status = feed.status;
        Ok(())
    }

    async fn refresh(&self, user_id: &str, feed: &Feed) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        let stored = tables
            .feeds
            .iter_mut()
            .find(|f| f.id == feed.id && f.user_id == user_id)
            .ok_or(RepositoryError::ModelNotFound)?;
        stored.title = feed.title.clone();
        stored.description = feed.description.clone();
        stored.source = feed.source.clone();
        stored.last_updated = feed.last_updated;
        stored.etag = feed.etag.clone();
        stored.status = feed.status;
        Ok(())
    }

    async fn delete(&self, user_id: &str, feed_id: &str) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.feed(user_id, feed_id)?;
        tables.remove_feed(feed_id);
        Ok(())
    }

    async fn feed_with_id(&self, user_id: &str, feed_id: &str) -> RepositoryResult<Feed> {
        self.store.read().feed(user_id, feed_id).cloned()
    }

    async fn list(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Feed>> {
        Ok(self.store.read().feed_listing(user_id, page, |_| true))
    }

    async fn mark(&self, user_id: &str, feed_id: &str, mark: Mark) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.feed(user_id, feed_id)?;
        for entry in tables
            .entries
            .iter_mut()
            .filter(|e| e.user_id == user_id && e.feed_id == feed_id)
        {
            entry.mark = mark;
        }
        Ok(())
    }

    async fn stats(&self, user_id: &str, feed_id: &str) -> RepositoryResult<Stats> {
        let tables = self.store.read();
        tables.feed(user_id, feed_id)?;
        Ok(tables.stats(user_id, |e| e.feed_id == feed_id))
    }
}
