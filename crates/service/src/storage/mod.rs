//! Storage abstractions for uploaded file bytes
//!
//! The database keeps file metadata; the bytes live behind [`FileStorage`],
//! addressed by the generated stored name.

use async_trait::async_trait;

use crate::errors::ServiceError;

pub mod local;
pub mod memory;

pub use local::LocalFileStorage;
pub use memory::MemoryFileStorage;

#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn put(&self, stored_name: &str, bytes: &[u8]) -> Result<(), ServiceError>;
    async fn get(&self, stored_name: &str) -> Result<Vec<u8>, ServiceError>;
    async fn remove(&self, stored_name: &str) -> Result<(), ServiceError>;
}

/// Stored names are generated by the service; anything that could escape the
/// storage root is refused.
pub(crate) fn check_stored_name(stored_name: &str) -> Result<(), ServiceError> {
    if stored_name.is_empty()
        || stored_name.contains(&['/', '\\'][..])
        || stored_name.starts_with('.')
    {
        return Err(ServiceError::Storage(format!("invalid stored name: {stored_name:?}")));
    }
    Ok(())
}
