//! Blob storage abstraction.
//!
//! Template source bytes and generated artifacts live behind the
//! [`BlobStorage`] trait so components take an explicit storage handle
//! at construction and tests run against a temp directory. The shipped
//! backend is the local filesystem; an object-store backend slots in
//! behind the same trait.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

/// Errors from blob storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No object at the given path.
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Object path escapes the storage root or is otherwise malformed.
    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    /// Underlying I/O failure.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An object store keyed by slash-separated logical paths
/// (`templates/{id}/{file}`, `artifacts/{id}/{file}`).
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Write an object, creating parent prefixes as needed and
    /// replacing any existing object at the path.
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read an object's bytes.
    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Whether an object exists at the path.
    async fn exists(&self, path: &str) -> Result<bool, StorageError>;
}

/// Local-filesystem backend rooted at a base directory.
pub struct LocalStorage {
    base: PathBuf,
}

impl LocalStorage {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolve a logical path under the base directory, rejecting
    /// absolute paths and `..` traversal.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(path);
        if path.is_empty()
            || rel.is_absolute()
            || rel
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.base.join(rel))
    }
}

#[async_trait]
impl BlobStorage for LocalStorage {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, bytes).await?;
        tracing::debug!(path, size = bytes.len(), "Stored object");
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path)?;
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&full).await?)
    }
}
