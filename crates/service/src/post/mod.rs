//! Posts and the aggregate operations that cascade to their tags, experiences and files.
pub mod dto;
pub mod repository;
pub mod service;

pub use dto::*;
pub use service::PostService;
