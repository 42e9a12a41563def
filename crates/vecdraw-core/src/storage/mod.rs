//! Named document persistence.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::document::ShapeDocument;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A place to keep shape documents under a name.
///
/// Backends store the serialized JSON form, so whatever `load` returns has
/// gone through the same parser as a user-supplied file.
pub trait Storage {
    /// Save a document, replacing any previous one with the same name.
    fn save(&self, name: &str, document: &ShapeDocument) -> StorageResult<()>;

    /// Load a document.
    fn load(&self, name: &str) -> StorageResult<ShapeDocument>;

    /// Delete a document. Deleting a missing name is not an error.
    fn delete(&self, name: &str) -> StorageResult<()>;

    /// List all document names.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a document exists.
    fn exists(&self, name: &str) -> StorageResult<bool>;
}
