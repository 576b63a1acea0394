//! Tool system for the board.

use crate::entities::{SerializableColor, ShapeKind};
use crate::icons::TokenTemplate;
use crate::measurement::MeasurementKind;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Paint,
    Eraser,
    PlaceToken,
    MeasureDistance,
    MeasureRadius,
    DrawLine,
    DrawCircle,
    DrawRectangle,
    TypeText,
}

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        ToolKind::Select,
        ToolKind::Paint,
        ToolKind::Eraser,
        ToolKind::PlaceToken,
        ToolKind::MeasureDistance,
        ToolKind::MeasureRadius,
        ToolKind::DrawLine,
        ToolKind::DrawCircle,
        ToolKind::DrawRectangle,
        ToolKind::TypeText,
    ];

    /// Shape committed by the drawing tools.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            ToolKind::DrawLine => Some(ShapeKind::Line),
            ToolKind::DrawCircle => Some(ShapeKind::Circle),
            ToolKind::DrawRectangle => Some(ShapeKind::Rectangle),
            _ => None,
        }
    }

    pub fn measurement_kind(&self) -> Option<MeasurementKind> {
        match self {
            ToolKind::MeasureDistance => Some(MeasurementKind::Distance),
            ToolKind::MeasureRadius => Some(MeasurementKind::Radius),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Paint => "Paint",
            ToolKind::Eraser => "Eraser",
            ToolKind::PlaceToken => "Place token",
            ToolKind::MeasureDistance => "Measure distance",
            ToolKind::MeasureRadius => "Measure radius",
            ToolKind::DrawLine => "Line",
            ToolKind::DrawCircle => "Circle",
            ToolKind::DrawRectangle => "Rectangle",
            ToolKind::TypeText => "Text",
        }
    }
}

/// Style applied to new cells, shapes and text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStyle {
    pub paint_color: SerializableColor,
    pub stroke_color: SerializableColor,
    pub fill_color: Option<SerializableColor>,
    pub stroke_width: f64,
    pub font_size: f64,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            paint_color: SerializableColor::rgb(107, 114, 128),
            stroke_color: SerializableColor::red(),
            fill_color: None,
            stroke_width: 2.0,
            font_size: 16.0,
        }
    }
}

/// Manages the current tool, its style and the selected token template.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current style to apply to new entities.
    pub current_style: ToolStyle,
    /// Template stamped by the place-token tool.
    selected_template: Option<TokenTemplate>,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool. Returns whether it changed.
    pub fn set_tool(&mut self, tool: ToolKind) -> bool {
        if self.current_tool == tool {
            return false;
        }
        log::debug!("Tool switched to {}", tool.label());
        self.current_tool = tool;
        true
    }

    pub fn selected_template(&self) -> Option<&TokenTemplate> {
        self.selected_template.as_ref()
    }

    pub fn select_template(&mut self, template: Option<TokenTemplate>) {
        self.selected_template = template;
    }
}
