//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use crate::document::ShapeDocument;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, name: &str, document: &ShapeDocument) -> StorageResult<()> {
        let json = document
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let mut docs = self.documents.write().map_err(lock_error)?;
        docs.insert(name.to_string(), json);
        Ok(())
    }

    fn load(&self, name: &str) -> StorageResult<ShapeDocument> {
        let docs = self.documents.read().map_err(lock_error)?;
        let json = docs
            .get(name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;
        ShapeDocument::from_json(json).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn delete(&self, name: &str) -> StorageResult<()> {
        let mut docs = self.documents.write().map_err(lock_error)?;
        docs.remove(name);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let docs = self.documents.read().map_err(lock_error)?;
        let mut names: Vec<String> = docs.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn exists(&self, name: &str) -> StorageResult<bool> {
        let docs = self.documents.read().map_err(lock_error)?;
        Ok(docs.contains_key(name))
    }
}
