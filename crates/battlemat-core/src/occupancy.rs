//! Collision testing and nearest-free-square search for token footprints.

use crate::entities::Token;
use crate::snap::GridPoint;

/// Minimum ring radius searched, regardless of grid size.
const MIN_SEARCH_RADIUS: i32 = 20;

/// Whether a `size x size` footprint at `(x, y)` leaves the grid or overlaps
/// any token other than `exclude_id`.
pub fn is_square_occupied(
    x: i32,
    y: i32,
    size: u32,
    tokens: &[Token],
    cols: usize,
    rows: usize,
    exclude_id: Option<&str>,
) -> bool {
    // Widened so corrupt coordinates near i32::MAX cannot overflow.
    let (x, y, size) = (i64::from(x), i64::from(y), i64::from(size));
    if x < 0 || y < 0 || x + size > cols as i64 || y + size > rows as i64 {
        return true;
    }
    tokens
        .iter()
        .filter(|t| exclude_id != Some(t.id.as_str()))
        .any(|t| {
            let (tx, ty, other) = (i64::from(t.x), i64::from(t.y), i64::from(t.size));
            x < tx + other && x + size > tx && y < ty + other && y + size > ty
        })
}

/// First token that cannot sit on a `cols x rows` grid next to the tokens
/// listed before it. A zero-sized footprint is never valid.
pub fn find_invalid_token(tokens: &[Token], cols: usize, rows: usize) -> Option<&Token> {
    tokens.iter().enumerate().find_map(|(i, token)| {
        let invalid = token.size == 0
            || is_square_occupied(token.x, token.y, token.size, &tokens[..i], cols, rows, None);
        invalid.then_some(token)
    })
}

/// Nearest free top-left cell for a footprint, searching outward in
/// Chebyshev rings from the preferred cell.
///
/// Within a ring, offsets are scanned row by row (`dy` then `dx`,
/// ascending). Returns `None` when no square on the grid is free.
pub fn find_available_square(
    preferred_x: i32,
    preferred_y: i32,
    size: u32,
    tokens: &[Token],
    cols: usize,
    rows: usize,
    exclude_id: Option<&str>,
) -> Option<GridPoint> {
    let free = |x: i32, y: i32| !is_square_occupied(x, y, size, tokens, cols, rows, exclude_id);

    if free(preferred_x, preferred_y) {
        return Some(GridPoint::new(preferred_x, preferred_y));
    }

    let max_radius = (cols as i32).max(rows as i32).max(MIN_SEARCH_RADIUS);
    for radius in 1..=max_radius {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs().max(dy.abs()) != radius {
                    continue;
                }
                let (Some(x), Some(y)) = (preferred_x.checked_add(dx), preferred_y.checked_add(dy)) else {
                    continue;
                };
                if free(x, y) {
                    return Some(GridPoint::new(x, y));
                }
            }
        }
    }
    None
}
