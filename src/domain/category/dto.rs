use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Category;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            created_at: category.created_at,
        }
    }
}

/// Body of POST /categories and PUT /categories/{id}
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
}

/// Body of PUT /categories/{id}/feeds
#[derive(Debug, Serialize, Deserialize)]
pub struct AddFeedsRequest {
    pub feeds: Vec<String>,
}
