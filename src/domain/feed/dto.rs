use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Feed, FeedStatus};

/// Response for feed endpoints
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub id: String,
    pub title: String,
    pub subscription: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    pub status: FeedStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Feed> for FeedResponse {
    fn from(feed: Feed) -> Self {
        Self {
            id: feed.id,
            title: feed.title,
            subscription: feed.subscription,
            description: feed.description,
            source: feed.source,
            category: feed.category_id,
            last_updated: feed.last_updated,
            status: feed.status,
            created_at: feed.created_at,
        }
    }
}

/// Request to subscribe to a feed
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateFeedRequest {
    #[serde(default)]
    pub title: Option<String>,
    pub subscription: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Request to update a feed
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateFeedRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
}
