use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::ListQuery;
use crate::domain::entry::{EntryResponse, EntryService};
use crate::domain::pagination::Listing;
use crate::domain::tag::{TagEntriesRequest, TagRequest, TagResponse, TagService};
use crate::{error::AppResult, infrastructure::auth::AuthUser};

/// `?tagIds=a,b` on GET /v1/tags/entries
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagIdsQuery {
    #[serde(default)]
    pub tag_ids: String,
}

impl TagIdsQuery {
    fn ids(&self) -> Vec<String> {
        self.tag_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

pub struct TagController {
    tag_service: Arc<TagService>,
    entry_service: Arc<EntryService>,
}

impl TagController {
    pub fn new(tag_service: Arc<TagService>, entry_service: Arc<EntryService>) -> Self {
        Self {
            tag_service,
            entry_service,
        }
    }

    /// GET /v1/tags
    pub async fn list_tags(
        State(controller): State<Arc<TagController>>,
        Extension(auth_user): Extension<AuthUser>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<Listing<TagResponse>>> {
        let page = query.into_page()?;
        let tags = controller
            .tag_service
            .list_tags(&auth_user.user_id, &page)
            .await?;
        Ok(Json(tags))
    }

    /// POST /v1/tags
    pub async fn create_tag(
        State(controller): State<Arc<TagController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<TagRequest>,
    ) -> AppResult<(StatusCode, Json<TagResponse>)> {
        let tag = controller
            .tag_service
            .create_tag(&auth_user.user_id, request)
            .await?;
        Ok((StatusCode::CREATED, Json(tag)))
    }

    /// GET /v1/tags/{id}
    pub async fn get_tag(
        State(controller): State<Arc<TagController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(tag_id): Path<String>,
    ) -> AppResult<Json<TagResponse>> {
        let tag = controller
            .tag_service
            .get_tag(&auth_user.user_id, &tag_id)
            .await?;
        Ok(Json(tag))
    }

    /// PUT /v1/tags/{id} - Rename
    pub async fn rename_tag(
        State(controller): State<Arc<TagController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(tag_id): Path<String>,
        Json(request): Json<TagRequest>,
    ) -> AppResult<Json<TagResponse>> {
        let tag = controller
            .tag_service
            .rename_tag(&auth_user.user_id, &tag_id, request)
            .await?;
        Ok(Json(tag))
    }

    /// DELETE /v1/tags/{id}
    pub async fn delete_tag(
        State(controller): State<Arc<TagController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(tag_id): Path<String>,
    ) -> AppResult<StatusCode> {
        controller
            .tag_service
            .delete_tag(&auth_user.user_id, &tag_id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /v1/tags/{id}/entries
    pub async fn list_entries(
        State(controller): State<Arc<TagController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(tag_id): Path<String>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<Listing<EntryResponse>>> {
        let page = query.into_page()?;
        let entries = controller
            .tag_service
            .list_entries(&auth_user.user_id, &tag_id, &page)
            .await?;
        Ok(Json(entries))
    }

    /// PUT /v1/tags/{id}/entries - Tag the listed entries
    pub async fn tag_entries(
        State(controller): State<Arc<TagController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(tag_id): Path<String>,
        Json(request): Json<TagEntriesRequest>,
    ) -> AppResult<StatusCode> {
        controller
            .tag_service
            .tag_entries(&auth_user.user_id, &tag_id, &request.entries)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /v1/tags/entries?tagIds=a,b - Entries carrying any of the tags
    pub async fn list_tagged(
        State(controller): State<Arc<TagController>>,
        Extension(auth_user): Extension<AuthUser>,
        Query(tags): Query<TagIdsQuery>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<Listing<EntryResponse>>> {
        let page = query.into_page()?;
        let entries = controller
            .entry_service
            .list_tagged(&auth_user.user_id, &tags.ids(), &page)
            .await?;
        Ok(Json(entries))
    }
}
