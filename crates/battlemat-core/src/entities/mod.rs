//! Persistent board entities.

mod cell;
mod participant;
mod shape;
mod text;
mod token;

pub use cell::{Cell, CellGrid, cell_at, cell_mut, empty_grid, has_dimensions};
pub use participant::{Participant, sort_turn_order};
pub use shape::{DrawnShape, ShapeKind};
pub use text::TextObject;
pub use token::{Token, TokenKind};

use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier shared by all entity kinds.
pub type EntityId = String;

/// Generate a fresh entity id.
pub fn new_id() -> EntityId {
    Uuid::new_v4().to_string()
}

/// Serializable color representation (RGBA8).
///
/// Persisted as a CSS hex string (`#rrggbb`, or `#rrggbbaa` when not opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub fn red() -> Self {
        Self::rgb(239, 68, 68)
    }

    pub fn blue() -> Self {
        Self::rgb(59, 130, 246)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(
                channel(&hex[0..1])? * 17,
                channel(&hex[1..2])? * 17,
                channel(&hex[2..3])? * 17,
            )),
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(SerializableColor::from_hex("#f00"), Some(SerializableColor::rgb(255, 0, 0)));
        assert_eq!(
            SerializableColor::from_hex("#3b82f6"),
            Some(SerializableColor::rgb(59, 130, 246))
        );
        assert_eq!(
            SerializableColor::from_hex("#00000080"),
            Some(SerializableColor::new(0, 0, 0, 128))
        );
        assert_eq!(SerializableColor::from_hex("red"), None);
        assert_eq!(SerializableColor::from_hex("#12345"), None);
    }

    #[test]
    fn test_hex_output() {
        assert_eq!(SerializableColor::blue().to_hex(), "#3b82f6");
        assert_eq!(SerializableColor::new(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&SerializableColor::red()).unwrap();
        assert_eq!(json, "\"#ef4444\"");
        let back: SerializableColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SerializableColor::red());
        assert!(serde_json::from_str::<SerializableColor>("\"nope\"").is_err());
    }

    #[test]
    fn test_peniko_conversion() {
        let color: Color = SerializableColor::new(10, 20, 30, 40).into();
        assert_eq!(SerializableColor::from(color), SerializableColor::new(10, 20, 30, 40));
    }

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
