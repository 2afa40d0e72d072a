pub mod dto;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;

pub use dto::{EntryResponse, SavedRequest};
pub use error::EntryServiceError;
pub use model::Entry;
pub use repository::EntryRepository;
pub use service::EntryService;
