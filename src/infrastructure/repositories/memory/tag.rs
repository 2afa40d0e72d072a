use async_trait::async_trait;

use super::{by_creation, MemoryStore};
use crate::domain::pagination::{Listing, Page};
use crate::domain::shared::{RepositoryError, RepositoryResult};
use crate::domain::tag::{Tag, TagRepository};

pub struct MemoryTagRepository {
    store: MemoryStore,
}

impl MemoryTagRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

fn name_taken(tags: &[Tag], user_id: &str, name: &str, except: &str) -> bool {
    tags.iter()
        .any(|t| t.user_id == user_id && t.id != except && t.name == name)
}

#[async_trait]
impl TagRepository for MemoryTagRepository {
    async fn create(&self, user_id: &str, tag: &Tag) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.require_user(user_id)?;
        if tables.tags.iter().any(|t| t.id == tag.id)
            || name_taken(&tables.tags, user_id, &tag.name, "")
        {
            return Err(RepositoryError::Conflict(format!("tag {} already exists", tag.name)));
        }
        let mut tag = tag.clone();
        tag.user_id = user_id.to_string();
        tables.tags.push(tag);
        Ok(())
    }

    async fn update(&self, user_id: &str, tag: &Tag) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.tag(user_id, &tag.id)?;
        if name_taken(&tables.tags, user_id, &tag.name, &tag.id) {
            return Err(RepositoryError::Conflict(format!("tag {} already exists", tag.name)));
        }
        if let Some(stored) = tables
            .tags
            .iter_mut()
            .find(|t| t.id == tag.id && t.user_id == user_id)
        {
            stored.name = tag.name.clone();
        }
        Ok(())
    }

    async fn delete(&self, user_id: &str, tag_id: &str) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.tag(user_id, tag_id)?;
        tables.tags.retain(|t| t.id != tag_id);
        tables.entry_tags.retain(|et| et.tag_id != tag_id);
        Ok(())
    }

    async fn tag_with_id(&self, user_id: &str, tag_id: &str) -> RepositoryResult<Tag> {
        self.store.read().tag(user_id, tag_id).cloned()
    }

    async fn tag_with_name(&self, user_id: &str, name: &str) -> RepositoryResult<Tag> {
        self.store
            .read()
            .tags
            .iter()
            .find(|t| t.user_id == user_id && t.name == name)
            .cloned()
            .ok_or(RepositoryError::ModelNotFound)
    }

    async fn list(&self, user_id: &str, page: &Page) -> RepositoryResult<Listing<Tag>> {
        let tables = self.store.read();
        let rows: Vec<Tag> = tables
            .tags
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        let cursor = page
            .continuation_id
            .as_deref()
            .and_then(|id| tables.tag(user_id, id).ok())
            .map(|t| (t.created_at, t.id.clone()));
        Ok(by_creation(rows, page, cursor, |t| t.created_at, |t| t.id.as_str()))
    }
}
