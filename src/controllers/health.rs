use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::db::{check_connection, DbPool};

/// Readiness depends on the database when there is one.
#[derive(Clone, Default)]
pub struct HealthState {
    pub pool: Option<Arc<DbPool>>,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(state): State<HealthState>) -> impl IntoResponse {
    let Some(pool) = state.pool else {
        return (
            StatusCode::OK,
            Json(json!({ "status": "ready", "database": "memory" })),
        );
    };

    match check_connection(&pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "database": "connected" })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not_ready", "database": "disconnected" })),
            )
        }
    }
}
