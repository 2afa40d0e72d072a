use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::pagination::Mark;

/// One item ingested from a feed. Apart from `mark` and `saved` an entry
/// is never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: String,
    pub user_id: String,
    pub feed_id: String,
    pub guid: String,
    pub title: String,
    pub link: String,
    pub author: String,
    pub published: DateTime<Utc>,
    pub saved: bool,
    pub mark: Mark,
    pub created_at: DateTime<Utc>,
}
