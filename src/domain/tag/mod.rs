pub mod dto;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;

pub use dto::{TagEntriesRequest, TagRequest, TagResponse};
pub use error::TagServiceError;
pub use model::Tag;
pub use repository::TagRepository;
pub use service::TagService;
