//! Files uploaded with a post: metadata rows in `file`, bytes in a [`crate::storage::FileStorage`].
pub mod dto;
pub mod naming;
pub mod service;

pub use dto::{DownloadedFile, GetFileResponse, UploadFile};
pub use service::FileService;
