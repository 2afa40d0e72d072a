use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use super::{ListQuery, MarkQuery};
use crate::domain::entry::{EntryResponse, EntryService, SavedRequest};
use crate::domain::pagination::Listing;
use crate::domain::shared::Stats;
use crate::{error::AppResult, infrastructure::auth::AuthUser};

pub struct EntryController {
    entry_service: Arc<EntryService>,
}

impl EntryController {
    pub fn new(entry_service: Arc<EntryService>) -> Self {
        Self { entry_service }
    }

    /// GET /v1/entries
    pub async fn list_entries(
        State(controller): State<Arc<EntryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<Listing<EntryResponse>>> {
        let page = query.into_page()?;
        let entries = controller
            .entry_service
            .list_entries(&auth_user.user_id, &page)
            .await?;
        Ok(Json(entries))
    }

    /// GET /v1/entries/{id}
    pub async fn get_entry(
        State(controller): State<Arc<EntryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(entry_id): Path<String>,
    ) -> AppResult<Json<EntryResponse>> {
        let entry = controller
            .entry_service
            .get_entry(&auth_user.user_id, &entry_id)
            .await?;
        Ok(Json(entry))
    }

    /// PUT /v1/entries/{id}/mark?as=read|unread
    pub async fn mark_entry(
        State(controller): State<Arc<EntryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(entry_id): Path<String>,
        Query(query): Query<MarkQuery>,
    ) -> AppResult<StatusCode> {
        controller
            .entry_service
            .mark_entry(&auth_user.user_id, &entry_id, query.mark()?)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// PUT /v1/entries/{id}/saved
    pub async fn set_saved(
        State(controller): State<Arc<EntryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(entry_id): Path<String>,
        Json(request): Json<SavedRequest>,
    ) -> AppResult<Json<EntryResponse>> {
        let entry = controller
            .entry_service
            .set_saved(&auth_user.user_id, &entry_id, request.saved)
            .await?;
        Ok(Json(entry))
    }

    /// PUT /v1/entries/mark?as=read|unread - Every entry of the user
    pub async fn mark_all(
        State(controller): State<Arc<EntryController>>,
        Extension(auth_user): Extension<AuthUser>,
        Query(query): Query<MarkQuery>,
    ) -> AppResult<StatusCode> {
        controller
            .entry_service
            .mark_all(&auth_user.user_id, query.mark()?)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /v1/entries/stats
    pub async fn entry_stats(
        State(controller): State<Arc<EntryController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<Stats>> {
        let stats = controller
            .entry_service
            .entry_stats(&auth_user.user_id)
            .await?;
        Ok(Json(stats))
    }
}
