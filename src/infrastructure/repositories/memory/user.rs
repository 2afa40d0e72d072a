use async_trait::async_trait;

use super::{by_creation, MemoryStore};
use crate::domain::pagination::{Listing, Page};
use crate::domain::shared::{RepositoryError, RepositoryResult};
use crate::domain::user::{User, UserRepository};

pub struct MemoryUserRepository {
    store: MemoryStore,
}

impl MemoryUserRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        if tables
            .users
            .iter()
            .any(|u| u.id == user.id || u.username == user.username)
        {
            return Err(RepositoryError::Conflict(format!(
                "username {} already exists",
                user.username
            )));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(RepositoryError::Conflict(format!(
                "username {} already exists",
                user.username
            )));
        }
        let stored = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepositoryError::ModelNotFound)?;
        stored.username = user.username.clone();
        stored.password_hash = user.password_hash.clone();
        stored.password_salt = user.password_salt.clone();
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> RepositoryResult<()> {
        let mut tables = self.store.write();
        tables.require_user(user_id)?;
        tables.remove_user(user_id);
        Ok(())
    }

    async fn user_with_id(&self, user_id: &str) -> RepositoryResult<User> {
        self.store
            .read()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(RepositoryError::ModelNotFound)
    }

    async fn user_with_name(&self, username: &str) -> RepositoryResult<User> {
        self.store
            .read()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(RepositoryError::ModelNotFound)
    }

    async fn list(&self, page: &Page) -> RepositoryResult<Listing<User>> {
        let tables = self.store.read();
        let cursor = page.continuation_id.as_deref().and_then(|id| {
            tables
                .users
                .iter()
                .find(|u| u.id == id)
                .map(|u| (u.created_at, u.id.clone()))
        });
        Ok(by_creation(
            tables.users.clone(),
            page,
            cursor,
            |u| u.created_at,
            |u| u.id.as_str(),
        ))
    }
}
