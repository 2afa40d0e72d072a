use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

use super::{ListQuery, MarkQuery};
use crate::domain::entry::EntryResponse;
use crate::domain::feed::{CreateFeedRequest, FeedResponse, FeedService, UpdateFeedRequest};
use crate::domain::pagination::Listing;
use crate::domain::shared::Stats;
use crate::{error::AppResult, infrastructure::auth::AuthUser};

pub struct FeedController {
    feed_service: Arc<FeedService>,
}

impl FeedController {
    pub fn new(feed_service: Arc<FeedService>) -> Self {
        Self { feed_service }
    }

    /// GET /v1/feeds - List user's feeds
    pub async fn list_feeds(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<Listing<FeedResponse>>> {
        let page = query.into_page()?;
        let feeds = controller
            .feed_service
            .list_feeds(&auth_user.user_id, &page)
            .await?;
        Ok(Json(feeds))
    }

    /// GET /v1/feeds/uncategorized
    pub async fn list_uncategorized(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<Listing<FeedResponse>>> {
        let page = query.into_page()?;
        let feeds = controller
            .feed_service
            .list_uncategorized(&auth_user.user_id, &page)
            .await?;
        Ok(Json(feeds))
    }

    /// POST /v1/feeds - Subscribe; the feed is pulled before responding
    pub async fn create_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<CreateFeedRequest>,
    ) -> AppResult<(StatusCode, Json<FeedResponse>)> {
        let feed = controller
            .feed_service
            .create_feed(&auth_user.user_id, request)
            .await?;
        Ok((StatusCode::CREATED, Json(feed)))
    }

    /// GET /v1/feeds/{feedId}
    pub async fn get_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(feed_id): Path<String>,
    ) -> AppResult<Json<FeedResponse>> {
        let feed = controller
            .feed_service
            .get_feed(&auth_user.user_id, &feed_id)
            .await?;
        Ok(Json(feed))
    }

    /// PUT /v1/feeds/{feedId} - Update title or subscription
    pub async fn update_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(feed_id): Path<String>,
        Json(request): Json<UpdateFeedRequest>,
    ) -> AppResult<Json<FeedResponse>> {
        let feed = controller
            .feed_service
            .update_feed(&auth_user.user_id, &feed_id, request)
            .await?;
        Ok(Json(feed))
    }

    /// DELETE /v1/feeds/{feedId} - Delete feed
    pub async fn delete_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(feed_id): Path<String>,
    ) -> AppResult<StatusCode> {
        controller
            .feed_service
            .delete_feed(&auth_user.user_id, &feed_id)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /v1/feeds/{feedId}/entries
    pub async fn list_entries(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(feed_id): Path<String>,
        Query(query): Query<ListQuery>,
    ) -> AppResult<Json<Listing<EntryResponse>>> {
        let page = query.into_page()?;
        let entries = controller
            .feed_service
            .list_entries(&auth_user.user_id, &feed_id, page)
            .await?;
        Ok(Json(entries))
    }

    /// PUT /v1/feeds/{feedId}/mark?as=read|unread
    pub async fn mark_feed(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(feed_id): Path<String>,
        Query(query): Query<MarkQuery>,
    ) -> AppResult<StatusCode> {
        controller
            .feed_service
            .mark_feed(&auth_user.user_id, &feed_id, query.mark()?)
            .await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// GET /v1/feeds/{feedId}/stats
    pub async fn feed_stats(
        State(controller): State<Arc<FeedController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(feed_id): Path<String>,
    ) -> AppResult<Json<Stats>> {
        let stats = controller
            .feed_service
            .feed_stats(&auth_user.user_id, &feed_id)
            .await?;
        Ok(Json(stats))
    }
}
