pub mod dto;
pub mod error;
pub mod jwt;
pub mod model;
pub mod password;
pub mod repository;
pub mod service;

pub use dto::{CredentialsRequest, RenewRequest, TokenResponse};
pub use error::AuthServiceError;
pub use jwt::{Claims, IssuedToken, JwtManager};
pub use model::{ApiKey, KeyType};
pub use password::{hash_password, verify_password, HashedPassword, PasswordError};
pub use repository::ApiKeyRepository;
pub use service::AuthService;
