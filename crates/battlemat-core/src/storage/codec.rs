//! JSON codec for the persisted board shape.
//!
//! The persisted document is exactly an [`UndoableState`]: cells, tokens,
//! shapes, text objects and participants with camelCase keys. Tokens carry
//! only their `(type, label)` lookup key; icons are re-attached through
//! [`crate::icons::IconRegistry`] after loading.

use super::{StorageError, StorageResult};
use crate::board::UndoableState;
use crate::entities::has_dimensions;
use crate::occupancy::find_invalid_token;

pub fn serialize(state: &UndoableState) -> StorageResult<String> {
    Ok(serde_json::to_string(state)?)
}

/// Strict parse, for backends that report errors.
pub fn parse(json: &str) -> StorageResult<UndoableState> {
    serde_json::from_str(json).map_err(StorageError::from)
}

/// Forgiving parse: any malformed document yields an empty board instead.
///
/// A document is malformed when its grid does not match `rows x cols` or
/// when its tokens break occupancy (overlapping, off the grid, zero-sized).
pub fn deserialize(json: &str, rows: usize, cols: usize) -> UndoableState {
    match parse(json) {
        Ok(state) if !has_dimensions(&state.cells, rows, cols) => {
            log::warn!("Saved board does not match a {rows}x{cols} grid, starting empty");
            UndoableState::empty(rows, cols)
        }
        Ok(state) => match find_invalid_token(&state.tokens, cols, rows) {
            Some(token) => {
                log::warn!("Saved token {} does not fit the board, starting empty", token.id);
                UndoableState::empty(rows, cols)
            }
            None => state,
        },
        Err(err) => {
            log::warn!("Failed to load saved board, starting empty: {err}");
            UndoableState::empty(rows, cols)
        }
    }
}
