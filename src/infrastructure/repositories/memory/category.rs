use async_trait::async_trait;

use super::{by_creation, MemoryStore};
use crate::domain::category::{Category, CategoryRepository};
use crate::domain::feed::Feed;
use crate::domain::pagination::{Listing, Mark, Page};
use crate::domain::shared::{RepositoryError, RepositoryResult, Stats};

pub struct MemoryCategoryRepository {
    store: MemoryStore,
}

impl MemoryCategoryRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

fn name_taken(categories: &[Category], user_id: &str, name: &str, except: &str) -> bool {
    categories
        .iter()
        .any(|c| c.user_id == user_id && c.id != except && c.has_name(name))
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn create(&self, user_id: &str, category: &Category) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.require_user(user_id)?;
        if tables.categories.iter().any(|c| c.id == category.id)
            || name_taken(&tables.categories, user_id, &category.name, "")
        {
            return Err(RepositoryError::Conflict(format!(
                "category {} already exists",
                category.name
            )));
        }
        let mut category = category.clone();
        category.user_id = user_id.to_string();
        tables.categories.push(category);
        Ok(())
    }

    async fn update(&self, user_id: &str, category: &Category) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.category(user_id, &category.id)?;
        if name_taken(&tables.categories, user_id, &category.name, &category.id) {
            return Err(RepositoryError::Conflict(format!(
                "category {} already exists",
                category.name
            )));
        }
        if let Some(stored) = tables
            .categories
            .iter_mut()
            .find(|c| c.id == category.id && c.user_id == user_id)
        {
            stored.name = category.name.clone();
        }
        Ok(())
    }

    async fn delete(&self, user_id: &str, category_id: &str) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.category(user_id, category_id)?;
        tables.categories.retain(|c| c.id != category_id);
        for feed in tables
            .feeds
            .iter_mut()
            .filter(|f| f.category_id.as_deref() == Some(category_id))
        {
            feed.category_id = None;
        }
        Ok(())
    }

    async fn category_with_id(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> RepositoryResult<Category> {
        self.store.read().category(user_id, category_id).cloned()
    }

    async fn category_with_name(&self, user_id: &str, name: &str) -> RepositoryResult<Category> {
        self.store
            .read()
            .categories
            .iter()
            .find(|c| c.user_id == user_id && c.has_name(name))
            .cloned()
            .ok_or(RepositoryError::ModelNotFound)
    }

    async fn list(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Category>> {
        let tables = self.store.read();
        let rows: Vec<Category> = tables
            .categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        let cursor = page
            .continuation_id
            .as_deref()
            .and_then(|id| tables.category(user_id, id).ok())
            .map(|c| (c.created_at, c.id.clone()));
        Ok(by_creation(rows, page, cursor, |c| c.created_at, |c| c.id.as_str()))
    }

    async fn feeds(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Feed>> {
        let tables = self.store.read();
        let category_id = page.filter_id.as_deref().unwrap_or_default();
        tables.category(user_id, category_id)?;
        Ok(tables.feed_listing(user_id, page, |f| {
            f.category_id.as_deref() == Some(category_id)
        }))
    }

    async fn uncategorized(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Feed>> {
        let tables = self.store.read();
        Ok(tables.feed_listing(user_id, page, |f| f.category_id.is_none()))
    }

    async fn add_feeds(
        &self,
        user_id: &str,
        category_id: &str,
        feed_ids: &[String],
    ) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.category(user_id, category_id)?;
        let owned = |id: &String| {
            tables
                .feeds
                .iter()
                .any(|f| &f.id == id && f.user_id == user_id)
        };
        if !feed_ids.iter().all(owned) {
            return Err(RepositoryError::ModelNotFound);
        }

        for feed in tables
            .feeds
            .iter_mut()
            .filter(|f| f.user_id == user_id && feed_ids.contains(&f.id))
        {
            feed.category_id = Some(category_id.to_string());
        }
        Ok(())
    }

    async fn mark(&self, user_id: &str, category_id: &str, mark: Mark) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.category(user_id, category_id)?;
        let feed_ids: Vec<String> = tables
            .feeds
            .iter()
            .filter(|f| f.user_id == user_id && f.category_id.as_deref() == Some(category_id))
            .map(|f| f.id.clone())
            .collect();
        for entry in tables
            .entries
            .iter_mut()
            .filter(|e| e.user_id == user_id && feed_ids.contains(&e.feed_id))
        {
            entry.mark = mark;
        }
        Ok(())
    }

    async fn stats(&self, user_id: &str, category_id: &str) -> RepositoryResult<Stats> {
        let tables = self.store.read();
        tables.category(user_id, category_id)?;
        let feed_ids: Vec<&str> = tables
            .feeds
            .iter()
            .filter(|f| f.user_id == user_id && f.category_id.as_deref() == Some(category_id))
            .map(|f| f.id.as_str())
            .collect();
        Ok(tables.stats(user_id, |e| feed_ids.contains(&e.feed_id.as_str())))
    }
}
