pub mod dto;
pub mod error;
pub mod service;

pub use dto::ImportReport;
pub use error::OpmlServiceError;
pub use service::OpmlService;
