use std::sync::Arc;

use super::{Category, CategoryRepository, CategoryRequest, CategoryResponse, CategoryServiceError};
use crate::domain::entry::{EntryRepository, EntryResponse};
use crate::domain::feed::FeedResponse;
use crate::domain::pagination::{Listing, Mark, Page};
use crate::domain::shared::{RepositoryError, Stats};

const MAX_NAME_LENGTH: usize = 128;

pub struct CategoryService {
    category_repo: Arc<dyn CategoryRepository>,
    entry_repo: Arc<dyn EntryRepository>,
}

impl CategoryService {
    pub fn new(
        category_repo: Arc<dyn CategoryRepository>,
        entry_repo: Arc<dyn EntryRepository>,
    ) -> Self {
        Self {
            category_repo,
            entry_repo,
        }
    }

    pub async fn create_category(
        &self,
        user_id: &str,
        request: CategoryRequest,
    ) -> Result<CategoryResponse, CategoryServiceError> {
        let name = Self::validate_name(&request.name)?;
        let category = Category::new(user_id, name);
        self.category_repo.create(user_id, &category).await?;

        tracing::debug!(user_id = %user_id, category_id = %category.id, "Category created");
        Ok(CategoryResponse::from(category))
    }

    pub async fn list_categories(
        &self,
        user_id: &str,
        page: &Page,
    ) -> Result<Listing<CategoryResponse>, CategoryServiceError> {
        let listing = self.category_repo.list(user_id, page).await?;
        Ok(listing.map(CategoryResponse::from))
    }

    pub async fn get_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<CategoryResponse, CategoryServiceError> {
        let category = self
            .category_repo
            .category_with_id(user_id, category_id)
            .await?;
        Ok(CategoryResponse::from(category))
    }

    pub async fn rename_category(
        &self,
        user_id: &str,
        category_id: &str,
        request: CategoryRequest,
    ) -> Result<CategoryResponse, CategoryServiceError> {
        let name = Self::validate_name(&request.name)?;
        let mut category = self
            .category_repo
            .category_with_id(user_id, category_id)
            .await?;
        category.name = name.to_string();
        self.category_repo.update(user_id, &category).await?;
        Ok(CategoryResponse::from(category))
    }

    pub async fn delete_category(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<(), CategoryServiceError> {
        self.category_repo.delete(user_id, category_id).await?;
        Ok(())
    }

    pub async fn list_feeds(
        &self,
        user_id: &str,
        category_id: &str,
        page: Page,
    ) -> Result<Listing<FeedResponse>, CategoryServiceError> {
        let page = page.filtered(category_id);
        let listing = self.category_repo.feeds(user_id, &page).await?;
        Ok(listing.map(FeedResponse::from))
    }

    /// Move every listed feed into the category.
    pub async fn add_feeds(
        &self,
        user_id: &str,
        category_id: &str,
        feed_ids: &[String],
    ) -> Result<(), CategoryServiceError> {
        // Resolve the category first so a bad category id is reported as such.
        self.category_repo
            .category_with_id(user_id, category_id)
            .await?;

        match self
            .category_repo
            .add_feeds(user_id, category_id, feed_ids)
            .await
        {
            Ok(()) => Ok(()),
            Err(RepositoryError::ModelNotFound) => Err(CategoryServiceError::Invalid(
                "one or more feeds do not exist".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_entries(
        &self,
        user_id: &str,
        category_id: &str,
        page: Page,
    ) -> Result<Listing<EntryResponse>, CategoryServiceError> {
        let page = page.filtered(category_id);
        let listing = self.entry_repo.list_from_category(user_id, &page).await?;
        Ok(listing.map(EntryResponse::from))
    }

    pub async fn mark_category(
        &self,
        user_id: &str,
        category_id: &str,
        mark: Mark,
    ) -> Result<(), CategoryServiceError> {
        self.category_repo.mark(user_id, category_id, mark).await?;
        Ok(())
    }

    pub async fn category_stats(
        &self,
        user_id: &str,
        category_id: &str,
    ) -> Result<Stats, CategoryServiceError> {
        Ok(self.category_repo.stats(user_id, category_id).await?)
    }

    fn validate_name(name: &str) -> Result<&str, CategoryServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CategoryServiceError::Invalid(
                "Category name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(CategoryServiceError::Invalid(format!(
                "Category name must be at most {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(name)
    }
}
