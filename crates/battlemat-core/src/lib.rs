//! Battlemat Core Library
//!
//! Platform-agnostic board state and interaction logic for a tabletop grid
//! battle map: tokens on a square grid, painted cells, drawn shapes, text
//! labels, rulers, and an undo history. Rendering and UI live elsewhere and
//! drive a [`Session`] with pointer and keyboard events.

pub mod board;
pub mod config;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod history;
pub mod icons;
pub mod input;
pub mod interaction;
pub mod measurement;
pub mod notify;
pub mod occupancy;
pub mod selection;
pub mod session;
pub mod snap;
pub mod storage;
pub mod text_metrics;
pub mod tools;
pub mod viewport;

pub use board::{Board, UndoableState};
pub use config::BoardConfig;
pub use entities::{
    Cell, CellGrid, DrawnShape, EntityId, Participant, SerializableColor, ShapeKind, TextObject, Token,
    TokenKind,
};
pub use error::{BoardError, BoardResult, ConfigError};
pub use history::{History, HistoryMode};
pub use icons::{IconHandle, IconRegistry, TokenTemplate};
pub use input::{DoubleClickDetector, Key, KeyEvent, Modifiers, MouseButton, PointerEvent, PointerEventKind};
pub use interaction::{EditingKind, EngineContext, InteractionEngine};
pub use measurement::{Measurement, MeasurementKind};
pub use notify::{LogNotifier, Notification, NotificationQueue, Notifier, Severity};
pub use selection::{Selection, SelectionRect};
pub use session::Session;
pub use snap::GridPoint;
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use tools::{ToolKind, ToolManager, ToolStyle};
pub use viewport::Viewport;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
