use std::sync::Arc;

use super::{UserRepository, UserResponse, UserServiceError};

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Get the account of the authenticated user
    pub async fn get_profile(&self, user_id: &str) -> Result<UserResponse, UserServiceError> {
        let user = self.user_repo.user_with_id(user_id).await?;
        Ok(UserResponse::from(user))
    }

    /// Delete the account and everything it owns
    pub async fn delete_account(&self, user_id: &str) -> Result<(), UserServiceError> {
        self.user_repo.delete(user_id).await?;
        tracing::info!(user_id = %user_id, "Account deleted");
        Ok(())
    }
}
