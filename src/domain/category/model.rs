use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::id::new_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(user_id: &str, name: &str) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Category names compare case-insensitively.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}
