pub mod auth;
pub mod category;
pub mod entry;
pub mod feed;
pub mod health;
pub mod opml;
pub mod tag;
pub mod user;

use serde::Deserialize;

use crate::domain::pagination::{Mark, Marker, Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{AppError, AppResult};

/// Query parameters shared by every list endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub continuation_id: Option<String>,
    pub count: Option<usize>,
    pub marked_as: Option<String>,
    pub order_by: Option<String>,
}

impl ListQuery {
    /// Oversized counts are clamped, unknown markers and orderings rejected.
    pub fn into_page(self) -> AppResult<Page> {
        let count = self.count.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let marker = match self.marked_as.as_deref() {
            None => Marker::Any,
            Some(raw) => raw.parse::<Marker>().map_err(AppError::BadRequest)?,
        };

        let newest = match self.order_by.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("newest") => true,
            Some("oldest") => false,
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "unknown ordering '{}'",
                    other
                )))
            }
        };

        let mut page = Page::new(count).newest_first(newest).marked(marker);
        if let Some(continuation_id) = self.continuation_id {
            page = page.after(continuation_id);
        }
        Ok(page)
    }
}

/// `?as=read|unread` on the mark endpoints.
#[derive(Debug, Deserialize)]
pub struct MarkQuery {
    #[serde(rename = "as")]
    pub mark: String,
}

impl MarkQuery {
    pub fn mark(&self) -> AppResult<Mark> {
        self.mark.parse::<Mark>().map_err(AppError::BadRequest)
    }
}
