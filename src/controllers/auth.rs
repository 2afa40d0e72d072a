use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::domain::auth::{AuthService, CredentialsRequest, RenewRequest, TokenResponse};
use crate::domain::user::UserResponse;
use crate::error::AppResult;

pub struct AuthController {
    auth_service: Arc<AuthService>,
}

impl AuthController {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }

    /// POST /v1/auth/register - Create an account
    pub async fn register(
        State(controller): State<Arc<AuthController>>,
        Json(request): Json<CredentialsRequest>,
    ) -> AppResult<(StatusCode, Json<UserResponse>)> {
        let user = controller.auth_service.register(request).await?;
        Ok((StatusCode::CREATED, Json(user)))
    }

    /// POST /v1/auth/login - Exchange credentials for tokens
    pub async fn login(
        State(controller): State<Arc<AuthController>>,
        Json(request): Json<CredentialsRequest>,
    ) -> AppResult<Json<TokenResponse>> {
        let response = controller.auth_service.login(request).await?;
        Ok(Json(response))
    }

    /// POST /v1/auth/renew - Rotate the refresh token
    pub async fn renew(
        State(controller): State<Arc<AuthController>>,
        Json(request): Json<RenewRequest>,
    ) -> AppResult<Json<TokenResponse>> {
        let response = controller.auth_service.renew(&request.refresh_token).await?;
        Ok(Json(response))
    }
}
