pub mod auth;
pub mod category;
pub mod entry;
pub mod feed;
pub mod id;
pub mod opml;
pub mod pagination;
pub mod shared;
pub mod sync;
pub mod tag;
pub mod user;
