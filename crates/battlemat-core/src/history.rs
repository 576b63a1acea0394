//! Snapshot-based undo/redo history.
//!
//! History is a bounded list of whole-board snapshots plus a cursor. It is
//! fed from a single observation entry point, [`History::record`], which is
//! suppressed for exactly one call after an undo/redo restore.

use crate::board::UndoableState;
use crate::config::DEFAULT_HISTORY_DEPTH;
use std::collections::VecDeque;

/// Whether the next observed state change came from a restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMode {
    #[default]
    Idle,
    Restoring,
}

/// Bounded linear undo/redo history.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<UndoableState>,
    cursor: usize,
    capacity: usize,
    mode: HistoryMode,
}

impl History {
    /// Start a history whose only entry is `base`.
    pub fn new(base: UndoableState) -> Self {
        Self::with_capacity(base, DEFAULT_HISTORY_DEPTH)
    }

    pub fn with_capacity(base: UndoableState, capacity: usize) -> Self {
        let mut entries = VecDeque::with_capacity(capacity.max(1));
        entries.push_back(base);
        Self {
            entries,
            cursor: 0,
            capacity: capacity.max(1),
            mode: HistoryMode::Idle,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Snapshot at the cursor.
    pub fn current(&self) -> Option<&UndoableState> {
        self.entries.get(self.cursor)
    }

    /// Observe a board state change.
    ///
    /// The first observation after a restore only returns the history to
    /// idle; every other observation is offered to [`History::add_snapshot`].
    pub fn record(&mut self, state: &UndoableState) -> bool {
        match self.mode {
            HistoryMode::Restoring => {
                self.mode = HistoryMode::Idle;
                false
            }
            HistoryMode::Idle => self.add_snapshot(state),
        }
    }

    /// Append a snapshot unless it equals the one at the cursor.
    ///
    /// Redo entries past the cursor are discarded and the oldest entry is
    /// evicted once the history is over capacity.
    pub fn add_snapshot(&mut self, state: &UndoableState) -> bool {
        if self.current() == Some(state) {
            return false;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(state.clone());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
        log::debug!("History snapshot {} of {}", self.cursor + 1, self.entries.len());
        true
    }

    /// Step back and hand the target snapshot to `restore`.
    pub fn undo(&mut self, restore: impl FnOnce(&UndoableState)) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        self.apply(restore);
        true
    }

    /// Step forward and hand the target snapshot to `restore`.
    pub fn redo(&mut self, restore: impl FnOnce(&UndoableState)) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        self.apply(restore);
        true
    }

    fn apply(&mut self, restore: impl FnOnce(&UndoableState)) {
        self.mode = HistoryMode::Restoring;
        if let Some(snapshot) = self.entries.get(self.cursor) {
            restore(snapshot);
        }
    }

    /// Replace the whole history with a single base snapshot.
    pub fn reset(&mut self, base: UndoableState) {
        self.entries.clear();
        self.entries.push_back(base);
        self.cursor = 0;
        self.mode = HistoryMode::Idle;
    }
}
