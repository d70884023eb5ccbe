//! Grid coordinates

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell on the grid, addressed by `(row, col)`
///
/// Row 0 is the top edge. A position carries no identity beyond its
/// coordinates, so it is `Copy` and hashable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Apply a signed delta, returning `None` when the result would leave
    /// a `size`x`size` grid.
    pub fn offset(self, delta: (isize, isize), size: usize) -> Option<Position> {
        let row = self.row.checked_add_signed(delta.0)?;
        let col = self.col.checked_add_signed(delta.1)?;
        (row < size && col < size).then_some(Position { row, col })
    }

    /// Manhattan distance to another position
    pub fn manhattan(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_inside_grid() {
        let pos = Position::new(1, 1);
        assert_eq!(pos.offset((-1, 0), 3), Some(Position::new(0, 1)));
        assert_eq!(pos.offset((0, 1), 3), Some(Position::new(1, 2)));
    }

    #[test]
    fn test_offset_rejects_negative_and_overflow() {
        assert_eq!(Position::new(0, 0).offset((-1, 0), 3), None);
        assert_eq!(Position::new(0, 0).offset((0, -1), 3), None);
        assert_eq!(Position::new(2, 2).offset((1, 0), 3), None);
        assert_eq!(Position::new(2, 2).offset((0, 1), 3), None);
    }

    #[test]
    fn test_display_matches_tuple_form() {
        assert_eq!(Position::new(4, 7).to_string(), "(4, 7)");
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Position::new(0, 0).manhattan(Position::new(4, 4)), 8);
    }
}
