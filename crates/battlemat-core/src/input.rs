//! Pointer/keyboard event types and click timing.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Leave,
    Wheel { delta: Vec2 },
}

/// A raw pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// Device position in screen pixels.
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
    /// Event timestamp in milliseconds.
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        Self {
            kind,
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
            timestamp_ms: 0,
        }
    }

    pub fn down(position: Point) -> Self {
        Self::new(PointerEventKind::Down, position)
    }

    pub fn moved(position: Point) -> Self {
        Self::new(PointerEventKind::Move, position)
    }

    pub fn up(position: Point) -> Self {
        Self::new(PointerEventKind::Up, position)
    }

    pub fn leave(position: Point) -> Self {
        Self::new(PointerEventKind::Leave, position)
    }

    pub fn wheel(position: Point, delta: Vec2) -> Self {
        Self::new(PointerEventKind::Wheel { delta }, position)
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at_time(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Right, middle, or command+left: the gestures that pan.
    pub fn is_pan_gesture(&self) -> bool {
        match self.button {
            MouseButton::Right | MouseButton::Middle => true,
            MouseButton::Left => self.modifiers.command(),
        }
    }
}

/// Keys the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Delete,
    Backspace,
    Character(char),
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

/// Detects two clicks on the same target within a time window.
#[derive(Debug, Clone, Default)]
pub struct DoubleClickDetector {
    last_click: Option<(String, u64)>,
    threshold_ms: u64,
}

impl DoubleClickDetector {
    pub fn new(threshold_ms: u64) -> Self {
        Self {
            last_click: None,
            threshold_ms,
        }
    }

    /// Register a click on `target` and report whether it completes a
    /// double-click. A detected pair resets the detector so a third click
    /// starts over.
    pub fn click(&mut self, target: &str, timestamp_ms: u64) -> bool {
        let is_double = matches!(
            &self.last_click,
            Some((id, at)) if id == target && timestamp_ms.saturating_sub(*at) <= self.threshold_ms
        );
        if is_double {
            self.last_click = None;
        } else {
            self.last_click = Some((target.to_string(), timestamp_ms));
        }
        is_double
    }

    pub fn reset(&mut self) {
        self.last_click = None;
    }
}
