pub mod dto;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;

pub use dto::UserResponse;
pub use error::UserServiceError;
pub use model::User;
pub use repository::UserRepository;
pub use service::UserService;
