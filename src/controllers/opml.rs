use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap},
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

use crate::domain::opml::{ImportReport, OpmlService};
use crate::error::{AppError, AppResult};
use crate::infrastructure::auth::AuthUser;

const OPML_CONTENT_TYPES: [&str; 3] = ["application/xml", "text/xml", "text/x-opml"];

pub struct OpmlController {
    opml_service: Arc<OpmlService>,
}

impl OpmlController {
    pub fn new(opml_service: Arc<OpmlService>) -> Self {
        Self { opml_service }
    }

    /// GET /v1/opml - Export subscriptions
    pub async fn export(
        State(controller): State<Arc<OpmlController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<impl IntoResponse> {
        let document = controller.opml_service.export(&auth_user.user_id).await?;
        Ok(([(CONTENT_TYPE, "text/x-opml; charset=utf-8")], document))
    }

    /// POST /v1/opml - Import subscriptions
    pub async fn import(
        State(controller): State<Arc<OpmlController>>,
        Extension(auth_user): Extension<AuthUser>,
        headers: HeaderMap,
        body: String,
    ) -> AppResult<Json<ImportReport>> {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();
        if !OPML_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Unsupported content type '{}', expected one of {}",
                content_type,
                OPML_CONTENT_TYPES.join(", ")
            )));
        }

        let report = controller
            .opml_service
            .import(&auth_user.user_id, &body)
            .await?;
        Ok(Json(report))
    }
}
