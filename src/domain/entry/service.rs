use std::sync::Arc;

use super::{EntryRepository, EntryResponse, EntryServiceError};
use crate::domain::pagination::{Listing, Mark, Page};
use crate::domain::shared::Stats;

pub struct EntryService {
    entry_repo: Arc<dyn EntryRepository>,
}

impl EntryService {
    pub fn new(entry_repo: Arc<dyn EntryRepository>) -> Self {
        Self { entry_repo }
    }

    pub async fn list_entries(
        &self,
        user_id: &str,
        page: &Page,
    ) -> Result<Listing<EntryResponse>, EntryServiceError> {
        let listing = self.entry_repo.list(user_id, page).await?;
        Ok(listing.map(EntryResponse::from))
    }

    pub async fn get_entry(
        &self,
        user_id: &str,
        entry_id: &str,
    ) -> Result<EntryResponse, EntryServiceError> {
        let entry = self.entry_repo.entry_with_id(user_id, entry_id).await?;
        Ok(EntryResponse::from(entry))
    }

    pub async fn mark_entry(
        &self,
        user_id: &str,
        entry_id: &str,
        mark: Mark,
    ) -> Result<(), EntryServiceError> {
        self.entry_repo.mark(user_id, entry_id, mark).await?;
        Ok(())
    }

    pub async fn mark_all(&self, user_id: &str, mark: Mark) -> Result<(), EntryServiceError> {
        self.entry_repo.mark_all(user_id, mark).await?;
        Ok(())
    }

    pub async fn set_saved(
        &self,
        user_id: &str,
        entry_id: &str,
        saved: bool,
    ) -> Result<EntryResponse, EntryServiceError> {
        self.entry_repo.set_saved(user_id, entry_id, saved).await?;
        self.get_entry(user_id, entry_id).await
    }

    /// Entries carrying any of the given tags
    pub async fn list_tagged(
        &self,
        user_id: &str,
        tag_ids: &[String],
        page: &Page,
    ) -> Result<Listing<EntryResponse>, EntryServiceError> {
        if tag_ids.is_empty() {
            return Err(EntryServiceError::Invalid(
                "At least one tag id is required".to_string(),
            ));
        }
        let listing = self.entry_repo.list_from_tags(user_id, tag_ids, page).await?;
        Ok(listing.map(EntryResponse::from))
    }

    pub async fn entry_stats(&self, user_id: &str) -> Result<Stats, EntryServiceError> {
        Ok(self.entry_repo.stats(user_id).await?)
    }
}
