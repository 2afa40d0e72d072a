use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Entry;
use crate::domain::pagination::Mark;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    pub id: String,
    pub feed: String,
    pub guid: String,
    pub title: String,
    pub link: String,
    pub author: String,
    pub published: DateTime<Utc>,
    pub saved: bool,
    pub mark: Mark,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            feed: entry.feed_id,
            guid: entry.guid,
            title: entry.title,
            link: entry.link,
            author: entry.author,
            published: entry.published,
            saved: entry.saved,
            mark: entry.mark,
        }
    }
}

/// Body of PUT /entries/{id}/saved
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedRequest {
    pub saved: bool,
}
