use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{check_stored_name, FileStorage};
use crate::errors::ServiceError;

/// In-memory storage for tests.
#[derive(Debug, Default)]
pub struct MemoryFileStorage {
    inner: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryFileStorage {
    pub async fn len(&self) -> usize { self.inner.read().await.len() }

    pub async fn is_empty(&self) -> bool { self.inner.read().await.is_empty() }

    pub async fn contains(&self, stored_name: &str) -> bool { self.inner.read().await.contains_key(stored_name) }
}

#[async_trait]
impl FileStorage for MemoryFileStorage {
    async fn put(&self, stored_name: &str, bytes: &[u8]) -> Result<(), ServiceError> {
        check_stored_name(stored_name)?;
        self.inner.write().await.insert(stored_name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn get(&self, stored_name: &str) -> Result<Vec<u8>, ServiceError> {
        self.inner
            .read()
            .await
            .get(stored_name)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("file content"))
    }

    async fn remove(&self, stored_name: &str) -> Result<(), ServiceError> {
        match self.inner.write().await.remove(stored_name) {
            Some(_) => Ok(()),
            None => Err(ServiceError::Storage(format!("{stored_name} not stored"))),
        }
    }
}
