//! Grid cells.

use super::SerializableColor;
use crate::snap::GridPoint;
use serde::{Deserialize, Serialize};

/// One fixed slot of the grid. Cells are only ever recolored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<SerializableColor>,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            id: format!("{row}-{col}"),
            color: None,
        }
    }
}

/// Row-major 2-D array of cells (`cells[row][col]`).
pub type CellGrid = Vec<Vec<Cell>>;

/// Build an uncolored `rows x cols` grid.
pub fn empty_grid(rows: usize, cols: usize) -> CellGrid {
    (0..rows)
        .map(|row| (0..cols).map(|col| Cell::new(row, col)).collect())
        .collect()
}

/// Whether a grid has exactly the given dimensions.
pub fn has_dimensions(grid: &CellGrid, rows: usize, cols: usize) -> bool {
    grid.len() == rows && grid.iter().all(|row| row.len() == cols)
}

/// Mutable access to the cell at a grid point, if it is on the grid.
pub fn cell_mut(grid: &mut CellGrid, at: GridPoint) -> Option<&mut Cell> {
    if at.x < 0 || at.y < 0 {
        return None;
    }
    grid.get_mut(at.y as usize)?.get_mut(at.x as usize)
}

/// The cell at a grid point, if it is on the grid.
pub fn cell_at(grid: &CellGrid, at: GridPoint) -> Option<&Cell> {
    if at.x < 0 || at.y < 0 {
        return None;
    }
    grid.get(at.y as usize)?.get(at.x as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid() {
        let grid = empty_grid(3, 4);
        assert!(has_dimensions(&grid, 3, 4));
        assert_eq!(grid[2][3].id, "2-3");
        assert!(grid.iter().flatten().all(|c| c.color.is_none()));
    }

    #[test]
    fn test_cell_lookup_bounds() {
        let mut grid = empty_grid(3, 4);
        assert!(cell_at(&grid, GridPoint::new(3, 2)).is_some());
        assert!(cell_at(&grid, GridPoint::new(4, 2)).is_none());
        assert!(cell_at(&grid, GridPoint::new(-1, 0)).is_none());

        cell_mut(&mut grid, GridPoint::new(1, 2)).unwrap().color = Some(SerializableColor::red());
        assert_eq!(grid[2][1].color, Some(SerializableColor::red()));
    }
}
