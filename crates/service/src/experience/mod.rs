pub mod dto;
pub mod service;

pub use dto::{CreateExperienceRequest, GetExperienceResponse, UpdateExperienceRequest};
pub use service::*;
