//! Selection sets and the marquee rectangle.

use crate::entities::EntityId;
use crate::geometry::rect_from_corners;
use kurbo::{Point, Rect};
use std::collections::HashSet;

/// The three selection sets, one per selectable entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub tokens: HashSet<EntityId>,
    pub shapes: HashSet<EntityId>,
    pub texts: HashSet<EntityId>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.shapes.is_empty() && self.texts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len() + self.shapes.len() + self.texts.len()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.shapes.clear();
        self.texts.clear();
    }

    pub fn select_token(&mut self, id: &str) {
        self.clear();
        self.tokens.insert(id.to_string());
    }

    pub fn select_shape(&mut self, id: &str) {
        self.clear();
        self.shapes.insert(id.to_string());
    }

    pub fn select_text(&mut self, id: &str) {
        self.clear();
        self.texts.insert(id.to_string());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tokens.contains(id) || self.shapes.contains(id) || self.texts.contains(id)
    }
}

/// Marquee selection state in SVG-space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    /// Anchor corner.
    pub start: Point,
    /// Far corner, following the pointer.
    pub current: Point,
}

impl SelectionRect {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
        }
    }

    /// Get the selection rectangle as a normalized Rect.
    pub fn to_rect(&self) -> Rect {
        rect_from_corners(self.start, self.current)
    }
}
