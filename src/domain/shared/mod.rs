pub mod repository_error;
pub mod stats;

pub use repository_error::{RepositoryError, RepositoryResult};
pub use stats::Stats;
