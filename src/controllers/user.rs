use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::user::{UserResponse, UserService},
    error::AppResult,
    infrastructure::auth::AuthUser,
};

pub struct UserController {
    user_service: Arc<UserService>,
}

impl UserController {
    pub fn new(user_service: Arc<UserService>) -> Self {
        Self { user_service }
    }

    /// GET /v1/users - Current account
    pub async fn get_me(
        State(controller): State<Arc<UserController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<UserResponse>> {
        let response = controller.user_service.get_profile(&auth_user.user_id).await?;
        Ok(Json(response))
    }

    /// DELETE /v1/users - Delete the account and everything it owns
    pub async fn delete_me(
        State(controller): State<Arc<UserController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<StatusCode> {
        controller.user_service.delete_account(&auth_user.user_id).await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
