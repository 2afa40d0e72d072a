use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::id::new_id;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    /// Subscribed but never pulled successfully.
    #[default]
    Pending,
    Ok,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Feed {
    pub id: String,
    pub user_id: String,
    pub category_id: Option<String>,
    pub title: String,
    pub subscription: String,
    pub description: String,
    pub source: String,
    pub last_updated: Option<DateTime<Utc>>,
    pub etag: String,
    pub status: FeedStatus,
    pub created_at: DateTime<Utc>,
}

impl Feed {
    pub fn new(user_id: &str, subscription: &str, title: &str) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            category_id: None,
            title: title.to_string(),
            subscription: subscription.to_string(),
            description: String::new(),
            source: String::new(),
            last_updated: None,
            etag: String::new(),
            status: FeedStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// A feed is due once `interval` has elapsed since its last successful
    /// pull. Feeds that were never pulled are always due.
    pub fn is_due(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        match self.last_updated {
            Some(last) => now >= last + interval,
            None => true,
        }
    }
}
