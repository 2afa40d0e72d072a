use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::id::new_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tag {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(user_id: &str, name: &str) -> Self {
        Self {
            id: new_id(),
            user_id: user_id.to_string(),
            name: name.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}
