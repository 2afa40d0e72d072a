use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use super::{ListQuery, MarkQuery};
use crate::domain::category::{AddFeedsRequest, CategoryRequest, CategoryResponse, CategoryService};
use crate::domain::entry::EntryResponse;
use crate::domain::feed::FeedResponse;
use crate::domain::pagination::Listing;
use crate::domain::shared::Stats;
use crate::{error::AppResult, infrastructure::auth::AuthUser};

pub struct CategoryController {
    category_service: Arc<CategoryService>,
}

impl CategoryController {
    pub fn new(category_service: Arc<CategoryService>) -> Self {
        Self { category_service }
    }

    /// GET /v1/categories
    pub async fn list_categories(
        State(controller): State<Arc<CategoryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<Listing<CategoryResponse>>> {
        let page = query.into_page()?;
        let listing = controller
            .category_service
            .list_categories(&auth_user.user_id, &page)
            .await?;
        Ok(Json(listing))
    }

    /// POST /v1/categories
    pub async fn create_category(
        State(controller): State<Arc<CategoryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<CategoryRequest>,
    ) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
        let category = controller
            .category_service
            .create_category(&auth_user.user_id, request)
            .await?;
        Ok((StatusCode::CREATED, Json(category)))
    }

    /// GET /v1/categories/{id}
    pub async fn get_category(
        State(controller): State<Arc<CategoryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(category_id): Path<String>,
    ) -> AppResult<Json<CategoryResponse>> {
        let category = controller
            .category_service
            .get_category(&auth_user.user_id, &category_id)
            .await?;
        Ok(Json(category))
    }

    /// PUT /v1/categories/{id} - Rename
    pub async fn rename_category(
        State(controller): State<Arc<CategoryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(category_id): Path<String>,
        Json(request): Json<CategoryRequest>,
    ) -> AppResult<Json<CategoryResponse>> {
        let category = controller
            .category_service
            .rename_category(&auth_user.user_id, &category_id, request)
            .await?;
        Ok(Json(category))
    }

    /// DELETE /v1/categories/{id} - Feeds become uncategorized
    pub async fn delete_category(
        State(controller): State<Arc<CategoryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(category_id): Path<String>,
    ) -> AppResult<StatusCode> {
        controller
            .category_service
            .delete_category(&auth_user.user_id, &category_id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /v1/categories/{id}/feeds
    pub async fn list_feeds(
        State(controller): State<Arc<CategoryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(category_id): Path<String>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<Listing<FeedResponse>>> {
        let page = query.into_page()?;
        let listing = controller
            .category_service
            .list_feeds(&auth_user.user_id, &category_id, page)
            .await?;
        Ok(Json(listing))
    }

    /// PUT /v1/categories/{id}/feeds - Move feeds into the category
    pub async fn add_feeds(
        State(controller): State<Arc<CategoryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(category_id): Path<String>,
        Json(request): Json<AddFeedsRequest>,
    ) -> AppResult<StatusCode> {
        controller
            .category_service
            .add_feeds(&auth_user.user_id, &category_id, &request.feeds)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /v1/categories/{id}/entries
    pub async fn list_entries(
        State(controller): State<Arc<CategoryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(category_id): Path<String>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<Listing<EntryResponse>>> {
        let page = query.into_page()?;
        let listing = controller
            .category_service
            .list_entries(&auth_user.user_id, &category_id, page)
            .await?;
        Ok(Json(listing))
    }

    /// PUT /v1/categories/{id}/mark?as=read|unread
    pub async fn mark_category(
        State(controller): State<Arc<CategoryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(category_id): Path<String>,
        Query(query): Query<MarkQuery>,
    ) -> AppResult<StatusCode> {
        controller
            .category_service
            .mark_category(&auth_user.user_id, &category_id, query.mark()?)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /v1/categories/{id}/stats
    pub async fn category_stats(
        State(controller): State<Arc<CategoryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(category_id): Path<String>,
    ) -> AppResult<Json<Stats>> {
        let stats = controller
            .category_service
            .category_stats(&auth_user.user_id, &category_id)
            .await?;
        Ok(Json(stats))
    }
}
