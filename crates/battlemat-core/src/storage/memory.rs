//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult, codec};
use crate::board::UndoableState;
use std::collections::HashMap;
use std::sync::RwLock;

/// Keeps serialized boards in memory, for tests and ephemeral sessions.
///
/// Boards are stored as JSON so a load goes through the same codec a
/// persistent backend would.
#[derive(Default)]
pub struct MemoryStorage {
    boards: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON of a saved board.
    pub fn raw(&self, id: &str) -> Option<String> {
        self.boards.read().ok()?.get(id).cloned()
    }

    /// Store raw JSON under an id, bypassing the codec.
    pub fn insert_raw(&self, id: &str, json: impl Into<String>) -> StorageResult<()> {
        let mut boards = self.boards.write().map_err(lock_error)?;
        boards.insert(id.to_string(), json.into());
        Ok(())
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Other(format!("Lock error: {e}"))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, state: &UndoableState) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let json = codec::serialize(state);
        Box::pin(async move {
            let json = json?;
            let mut boards = self.boards.write().map_err(lock_error)?;
            boards.insert(id, json);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<UndoableState>> {
        let id = id.to_string();
        Box::pin(async move {
            let boards = self.boards.read().map_err(lock_error)?;
            let json = boards.get(&id).ok_or_else(|| StorageError::NotFound(id.clone()))?;
            codec::parse(json)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut boards = self.boards.write().map_err(lock_error)?;
            boards.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let boards = self.boards.read().map_err(lock_error)?;
            let mut ids: Vec<String> = boards.keys().cloned().collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let boards = self.boards.read().map_err(lock_error)?;
            Ok(boards.contains_key(&id))
        })
    }
}
