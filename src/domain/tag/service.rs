use std::sync::Arc;

use super::{Tag, TagRepository, TagRequest, TagResponse, TagServiceError};
use crate::domain::entry::{EntryRepository, EntryResponse};
use crate::domain::pagination::{Listing, Page};

pub struct TagService {
    tag_repo: Arc<dyn TagRepository>,
    entry_repo: Arc<dyn EntryRepository>,
}

impl TagService {
    pub fn new(tag_repo: Arc<dyn TagRepository>, entry_repo: Arc<dyn EntryRepository>) -> Self {
        Self {
            tag_repo,
            entry_repo,
        }
    }

    pub async fn create_tag(
        &self,
        user_id: &str,
        request: TagRequest,
    ) -> Result<TagResponse, TagServiceError> {
        let name = Self::validate_name(&request.name)?;
        let tag = Tag::new(user_id, name);
        self.tag_repo.create(user_id, &tag).await?;
        Ok(TagResponse::from(tag))
    }

    pub async fn list_tags(
        &self,
        user_id: &str,
        page: &Page,
    ) -> Result<Listing<TagResponse>, TagServiceError> {
        let listing = self.tag_repo.list(user_id, page).await?;
        Ok(listing.map(TagResponse::from))
    }

    pub async fn get_tag(&self, user_id: &str, tag_id: &str) -> Result<TagResponse, TagServiceError> {
        let tag = self.tag_repo.tag_with_id(user_id, tag_id).await?;
        Ok(TagResponse::from(tag))
    }

    pub async fn rename_tag(
        &self,
        user_id: &str,
        tag_id: &str,
        request: TagRequest,
    ) -> Result<TagResponse, TagServiceError> {
        let name = Self::validate_name(&request.name)?;
        let mut tag = self.tag_repo.tag_with_id(user_id, tag_id).await?;
        tag.name = name.to_string();
        self.tag_repo.update(user_id, &tag).await?;
        Ok(TagResponse::from(tag))
    }

    pub async fn delete_tag(&self, user_id: &str, tag_id: &str) -> Result<(), TagServiceError> {
        self.tag_repo.delete(user_id, tag_id).await?;
        Ok(())
    }

    pub async fn tag_entries(
        &self,
        user_id: &str,
        tag_id: &str,
        entry_ids: &[String],
    ) -> Result<(), TagServiceError> {
        self.tag_repo.tag_with_id(user_id, tag_id).await?;
        if entry_ids.is_empty() {
            return Ok(());
        }
        self.entry_repo.tag_entries(user_id, tag_id, entry_ids).await?;
        Ok(())
    }

    pub async fn list_entries(
        &self,
        user_id: &str,
        tag_id: &str,
        page: &Page,
    ) -> Result<Listing<EntryResponse>, TagServiceError> {
        // Unknown tags are reported instead of yielding an empty listing.
        self.tag_repo.tag_with_id(user_id, tag_id).await?;
        let listing = self
            .entry_repo
            .list_from_tags(user_id, &[tag_id.to_string()], page)
            .await?;
        Ok(listing.map(EntryResponse::from))
    }

    fn validate_name(name: &str) -> Result<&str, TagServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TagServiceError::Invalid("Tag name must not be empty".to_string()));
        }
        Ok(name)
    }
}
