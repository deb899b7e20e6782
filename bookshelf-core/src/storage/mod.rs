//! Storage abstraction layer for the library document

use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tokio::sync::RwLock;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Abstract storage provider trait
/// The store only needs whole-object reads and durable whole-object writes
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Read data from the given path
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Durably replace the data at the given path
    async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Check if a path exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;
}

/// Local filesystem storage provider
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create a new local storage provider with the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Safely resolve a path, preventing path traversal attacks
    fn full_path(&self, path: &str) -> StorageResult<PathBuf> {
        let mut normalized = PathBuf::new();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(c) => normalized.push(c),
                Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(StorageError::BackendError(
                        "Path traversal attempt detected".to_string(),
                    ));
                }
            }
        }

        Ok(self.root.join(normalized))
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(path)?;
        tokio::fs::read(full_path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(path.to_string()),
            _ => StorageError::BackendError(e.to_string()),
        })
    }

    /// Writes to a temp file then renames, so readers never see a partial file
    async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()> {
        let full_path = self.full_path(path)?;
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::BackendError(e.to_string()))?;
        }

        let mut temp_name = full_path.clone().into_os_string();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let commit = async {
            let mut file = tokio::fs::File::create(&temp_path).await?;
            tokio::io::AsyncWriteExt::write_all(&mut file, &data).await?;
            file.sync_all().await?;
            tokio::fs::rename(&temp_path, &full_path).await
        };
        if let Err(e) = commit.await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                tracing::debug!("Could not remove {}: {}", temp_path.display(), cleanup);
            }
            return Err(StorageError::BackendError(e.to_string()));
        }
        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let full_path = self.full_path(path)?;
        tokio::fs::try_exists(full_path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }
}

/// In-memory storage provider (for testing)
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.data
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()> {
        self.data.write().await.insert(path.to_string(), data);
        Ok(())
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.data.read().await.contains_key(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();

        // Write
        storage.write("test.json", b"hello".to_vec()).await.unwrap();

        // Read
        let data = storage.read("test.json").await.unwrap();
        assert_eq!(data, b"hello");

        // Exists
        assert!(storage.exists("test.json").await.unwrap());
        assert!(!storage.exists("missing.json").await.unwrap());

        // Overwrite
        storage.write("test.json", b"bye".to_vec()).await.unwrap();
        assert_eq!(storage.read("test.json").await.unwrap(), b"bye");
    }

    #[tokio::test]
    async fn test_local_storage_overwrites_atomically() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("nested"));

        storage.write("library.json", b"first".to_vec()).await.unwrap();
        storage.write("library.json", b"second".to_vec()).await.unwrap();

        assert_eq!(storage.read("library.json").await.unwrap(), b"second");
        assert!(!storage.exists("library.json.tmp").await.unwrap());
    }

    #[tokio::test]
    async fn test_local_storage_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        assert!(matches!(
            storage.read("library.json").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_local_storage_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        assert!(storage.read("../etc/passwd").await.is_err());
        assert!(storage.write("/abs.json", Vec::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        // A non-empty directory in the target's place makes the rename fail
        let blocker = temp_dir.path().join("library.json");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        let result = storage.write("library.json", b"{}".to_vec()).await;
        assert!(matches!(result, Err(StorageError::BackendError(_))));
        assert!(!temp_dir.path().join("library.json.tmp").exists());
        assert!(blocker.is_dir());
    }
}
