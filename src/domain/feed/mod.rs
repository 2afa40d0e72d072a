pub mod dto;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;

pub use dto::{CreateFeedRequest, FeedResponse, UpdateFeedRequest};
pub use error::FeedServiceError;
pub use model::{Feed, FeedStatus};
pub use repository::FeedRepository;
pub use service::FeedService;
