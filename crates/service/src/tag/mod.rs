//! Tags attached to posts, grouped by [`models::tag::TagType`].
pub mod dto;
pub mod service;

pub use dto::{CreateTagRequest, CreateTagResponse, FindTagResponse};
pub use service::*;
