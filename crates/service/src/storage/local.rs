use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::{check_stored_name, FileStorage};
use crate::errors::ServiceError;

/// Files kept flat in one local directory.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &std::path::Path { &self.root }

    fn path_of(&self, stored_name: &str) -> Result<PathBuf, ServiceError> {
        check_stored_name(stored_name)?;
        Ok(self.root.join(stored_name))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn put(&self, stored_name: &str, bytes: &[u8]) -> Result<(), ServiceError> {
        let path = self.path_of(stored_name)?;
        fs::create_dir_all(&self.root).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&path, bytes).await.map_err(|e| ServiceError::Storage(e.to_string()))
    }

    async fn get(&self, stored_name: &str) -> Result<Vec<u8>, ServiceError> {
        let path = self.path_of(stored_name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ServiceError::not_found("file content")),
            Err(e) => Err(ServiceError::Storage(e.to_string())),
        }
    }

    async fn remove(&self, stored_name: &str) -> Result<(), ServiceError> {
        let path = self.path_of(stored_name)?;
        fs::remove_file(&path).await.map_err(|e| ServiceError::Storage(e.to_string()))
    }
}
