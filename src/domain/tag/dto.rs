use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tag;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            created_at: tag.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TagRequest {
    pub name: String,
}

/// Body of PUT /tags/{id}/entries
#[derive(Debug, Serialize, Deserialize)]
pub struct TagEntriesRequest {
    pub entries: Vec<String>,
}
