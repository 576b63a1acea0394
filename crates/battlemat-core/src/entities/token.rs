//! Tokens occupy a square block of grid cells.

use super::{EntityId, SerializableColor};
use crate::snap::GridPoint;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// What a token (or its turn-order entry) represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[default]
    Player,
    Enemy,
    Npc,
    Object,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Player => "player",
            TokenKind::Enemy => "enemy",
            TokenKind::Npc => "npc",
            TokenKind::Object => "object",
        }
    }
}

/// A token placed on the grid.
///
/// `x`/`y` is the top-left cell of its `size x size` footprint. Icons are not
/// stored here; they are resolved from `(kind, label)` by the icon registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: EntityId,
    pub x: i32,
    pub y: i32,
    pub size: u32,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub color: SerializableColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_image_url: Option<String>,
}

impl Token {
    pub fn new(id: EntityId, at: GridPoint, size: u32, kind: TokenKind, color: SerializableColor) -> Self {
        Self {
            id,
            x: at.x,
            y: at.y,
            size: size.max(1),
            kind,
            color,
            label: None,
            instance_name: None,
            custom_image_url: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = Some(name.into());
        self
    }

    /// Top-left cell of the footprint.
    pub fn origin(&self) -> GridPoint {
        GridPoint::new(self.x, self.y)
    }

    /// Whether the footprint covers the given cell.
    pub fn covers(&self, cell: GridPoint) -> bool {
        let (x, y, size) = (i64::from(self.x), i64::from(self.y), i64::from(self.size));
        let (cx, cy) = (i64::from(cell.x), i64::from(cell.y));
        cx >= x && cx < x + size && cy >= y && cy < y + size
    }

    /// Footprint in SVG-space.
    pub fn bounds(&self, cell_size: f64) -> Rect {
        let origin = self.origin().to_svg(cell_size);
        let extent = self.size as f64 * cell_size;
        Rect::new(origin.x, origin.y, origin.x + extent, origin.y + extent)
    }

    /// Name shown on the board: instance name, then label, then kind.
    pub fn display_name(&self) -> &str {
        self.instance_name
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or(self.kind.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblin() -> Token {
        Token::new("t1".into(), GridPoint::new(2, 3), 2, TokenKind::Enemy, SerializableColor::red())
            .with_label("Goblin")
    }

    #[test]
    fn test_covers_footprint() {
        let token = goblin();
        assert!(token.covers(GridPoint::new(2, 3)));
        assert!(token.covers(GridPoint::new(3, 4)));
        assert!(!token.covers(GridPoint::new(4, 3)));
        assert!(!token.covers(GridPoint::new(1, 3)));
    }

    #[test]
    fn test_covers_near_coordinate_limit() {
        let token = Token::new("far".into(), GridPoint::new(i32::MAX, 0), 2, TokenKind::Object, SerializableColor::black());
        assert!(token.covers(GridPoint::new(i32::MAX, 1)));
        assert!(!token.covers(GridPoint::new(0, 0)));
    }

    #[test]
    fn test_bounds() {
        let bounds = goblin().bounds(30.0);
        assert_eq!(bounds, Rect::new(60.0, 90.0, 120.0, 150.0));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut token = goblin();
        assert_eq!(token.display_name(), "Goblin");
        token = token.with_instance_name("Goblin 2");
        assert_eq!(token.display_name(), "Goblin 2");
        token.label = None;
        token.instance_name = None;
        assert_eq!(token.display_name(), "enemy");
    }

    #[test]
    fn test_zero_size_clamped() {
        let token = Token::new("t".into(), GridPoint::new(0, 0), 0, TokenKind::Object, SerializableColor::black());
        assert_eq!(token.size, 1);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(goblin()).unwrap();
        assert_eq!(json["type"], "enemy");
        assert_eq!(json["label"], "Goblin");
        assert!(json.get("instanceName").is_none());
    }
}
