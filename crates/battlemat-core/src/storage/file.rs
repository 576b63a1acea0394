//! File-based storage implementation for native platforms.

use super::{BoxFuture, Storage, StorageError, StorageResult, codec};
use crate::board::UndoableState;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each board as `{id}.json` in a directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {e}"))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Storage under the platform data directory, e.g.
    /// `~/.local/share/battlemat/boards/` on Linux.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("battlemat").join("boards"))
    }

    fn board_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{safe_id}.json"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for FileStorage {
    fn save(&self, id: &str, state: &UndoableState) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(id);
        let json = codec::serialize(state);
        Box::pin(async move {
            fs::write(&path, json?)
                .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))?;
            log::debug!("Saved board to {}", path.display());
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<UndoableState>> {
        let path = self.board_path(id);
        let id = id.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id));
            }
            let json = fs::read_to_string(&path)
                .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
            codec::parse(&json)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.board_path(id);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {e}", path.display()))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;
            let mut ids: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
                .collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.board_path(id);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{SerializableColor, Token, TokenKind, new_id};
    use crate::snap::GridPoint;
    use crate::storage::block_on;
    use tempfile::tempdir;

    fn board_with_token() -> UndoableState {
        let mut state = UndoableState::empty(4, 4);
        state
            .tokens
            .push(Token::new(new_id(), GridPoint::new(2, 1), 2, TokenKind::Object, SerializableColor::white()));
        state
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        block_on(storage.save("crypt", &board_with_token())).unwrap();
        assert!(dir.path().join("crypt.json").exists());
        let loaded = block_on(storage.load("crypt")).unwrap();
        assert_eq!(loaded, board_with_token());
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("bad.json"), "not json").unwrap();
        let result = block_on(storage.load("bad"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_list_and_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        block_on(storage.save("b", &board_with_token())).unwrap();
        block_on(storage.save("a", &board_with_token())).unwrap();
        assert_eq!(block_on(storage.list()).unwrap(), vec!["a".to_string(), "b".to_string()]);

        block_on(storage.delete("a")).unwrap();
        assert!(!block_on(storage.exists("a")).unwrap());
    }

    #[test]
    fn test_file_storage_sanitizes_id() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        block_on(storage.save("act 1/map:2", &board_with_token())).unwrap();
        assert!(dir.path().join("act_1_map_2.json").exists());
        assert!(block_on(storage.load("act 1/map:2")).is_ok());
    }
}
