//! Grid snapping and conversions between SVG-space and grid-space.
//!
//! SVG-space is the fixed pixel space entities are authored in. Grid-space
//! uses integer cell indices, with `svg = grid * cell_size`.

use crate::geometry::with_length;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// An integer cell coordinate (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Top-left corner of this cell in SVG-space.
    pub fn to_svg(self, cell_size: f64) -> Point {
        Point::new(self.x as f64 * cell_size, self.y as f64 * cell_size)
    }

    /// Center of this cell in SVG-space.
    pub fn center_svg(self, cell_size: f64) -> Point {
        Point::new(
            (self.x as f64 + 0.5) * cell_size,
            (self.y as f64 + 0.5) * cell_size,
        )
    }

    /// Whether this cell lies inside a `cols x rows` grid.
    pub fn in_bounds(self, cols: usize, rows: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < cols && (self.y as usize) < rows
    }
}

/// The cell containing an SVG-space point.
pub fn svg_to_grid(point: Point, cell_size: f64) -> GridPoint {
    GridPoint::new(
        (point.x / cell_size).floor() as i32,
        (point.y / cell_size).floor() as i32,
    )
}

/// Snap to the nearest grid-line intersection.
pub fn snap_to_vertex(point: Point, cell_size: f64) -> Point {
    Point::new(
        (point.x / cell_size).round() * cell_size,
        (point.y / cell_size).round() * cell_size,
    )
}

/// Snap to the center of the cell containing the point.
pub fn snap_to_cell_center(point: Point, cell_size: f64) -> Point {
    svg_to_grid(point, cell_size).center_svg(cell_size)
}

/// Discretize a circle's radius to a whole number of cells.
///
/// The returned edge point keeps the direction from `center` to `pointer`
/// but lies exactly `n * cell_size` away from the center.
pub fn snap_circle_edge(center: Point, pointer: Point, cell_size: f64) -> Point {
    let direction = pointer - center;
    let cells = (direction.hypot() / cell_size).round();
    center + with_length(direction, cells * cell_size)
}

/// Clamp the top-left cell of a `size x size` footprint so the whole
/// footprint stays on the grid.
pub fn clamp_footprint(cell: GridPoint, size: u32, cols: usize, rows: usize) -> GridPoint {
    let max_x = (cols as i32 - size as i32).max(0);
    let max_y = (rows as i32 - size as i32).max(0);
    GridPoint::new(cell.x.clamp(0, max_x), cell.y.clamp(0, max_y))
}
