pub mod dto;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;

pub use dto::{AddFeedsRequest, CategoryRequest, CategoryResponse};
pub use error::CategoryServiceError;
pub use model::Category;
pub use repository::CategoryRepository;
pub use service::CategoryService;
