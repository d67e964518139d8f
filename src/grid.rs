use bit_set::BitSet;
use rand::Rng;
use std::fmt;

use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// A cell is a row-major index into the grid: `row = cell / columns`, `col = cell % columns`.
pub type Cell = usize;

/// The shared mutable state every algorithm in this crate operates on.
///
/// Holds the blocked/open status of every cell plus the two distinguished
/// `start` and `end` cells. `start` and `end` are always valid indices and
/// never equal to each other (except on a degenerate 1x1 grid); the mutators
/// uphold that invariant by rejecting any overwrite that would break it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    blocked: BitSet,
    start: Cell,
    end: Cell,
}

impl Grid {
    /// A fresh grid has every cell open with start and end at opposite corners.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Grid {
        let RowsCount(rows) = rows;
        let ColumnsCount(columns) = columns;
        let rows = rows.max(1);
        let columns = columns.max(1);
        let cells_count = rows * columns;

        Grid {
            rows,
            columns,
            blocked: BitSet::with_capacity(cells_count),
            start: 0,
            end: cells_count - 1,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.rows * self.columns
    }

    #[inline]
    pub fn is_valid(&self, cell: Cell) -> bool {
        cell < self.size()
    }

    #[inline]
    pub fn row_of(&self, cell: Cell) -> usize {
        cell / self.columns
    }

    #[inline]
    pub fn column_of(&self, cell: Cell) -> usize {
        cell % self.columns
    }

    #[inline]
    pub fn cell_at(&self, row: RowIndex, column: ColumnIndex) -> Cell {
        let RowIndex(row) = row;
        let ColumnIndex(column) = column;
        row * self.columns + column
    }

    #[inline]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.blocked.contains(cell)
    }

    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) {
        if blocked {
            self.blocked.insert(cell);
        } else {
            self.blocked.remove(cell);
        }
    }

    /// Block or unblock every cell on the grid.
    pub fn set_all(&mut self, blocked: bool) {
        self.blocked.clear();
        if blocked {
            self.blocked.extend(0..self.size());
        }
    }

    #[inline]
    pub fn start(&self) -> Cell {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Cell {
        self.end
    }

    /// Move the start cell, opening its new location.
    ///
    /// Rejected as a no-op (returning `false`) when the requested cell is the
    /// end cell or out of range, which keeps start and end distinct.
    pub fn set_start(&mut self, cell: Cell) -> bool {
        if !self.is_valid(cell) || cell == self.end {
            return false;
        }
        self.blocked.remove(cell);
        self.start = cell;
        true
    }

    /// Move the end cell, opening its new location. Same rejection rule as `set_start`.
    pub fn set_end(&mut self, cell: Cell) -> bool {
        if !self.is_valid(cell) || cell == self.start {
            return false;
        }
        self.blocked.remove(cell);
        self.end = cell;
        true
    }

    /// Two cells share a row or a column.
    pub fn is_straight(&self, a: Cell, b: Cell) -> bool {
        self.row_of(a) == self.row_of(b) || self.column_of(a) == self.column_of(b)
    }

    /// Two cells lie on a perfect diagonal at any distance.
    pub fn is_diagonal(&self, a: Cell, b: Cell) -> bool {
        let row_delta = (self.row_of(a) as isize - self.row_of(b) as isize).abs();
        let col_delta = (self.column_of(a) as isize - self.column_of(b) as isize).abs();
        row_delta == col_delta
    }

    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Cell {
        rng.gen_range(0..self.size())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let cell = row * self.columns + column;
                let glyph = if cell == self.start {
                    'S'
                } else if cell == self.end {
                    'E'
                } else if self.is_blocked(cell) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::units::{ColumnsCount, RowsCount};

    fn grid(rows: usize, columns: usize) -> Grid {
        Grid::new(RowsCount(rows), ColumnsCount(columns))
    }

    #[test]
    fn new_grid_is_open_with_corner_start_end() {
        let g = grid(4, 5);
        assert_eq!(g.rows(), 4);
        assert_eq!(g.columns(), 5);
        assert_eq!(g.size(), 20);
        assert_eq!(g.start(), 0);
        assert_eq!(g.end(), 19);
        assert!((0..g.size()).all(|cell| !g.is_blocked(cell)));
    }

    #[test]
    fn row_column_round_trip() {
        let g = grid(3, 7);
        for cell in 0..g.size() {
            let row = RowIndex(g.row_of(cell));
            let column = ColumnIndex(g.column_of(cell));
            assert_eq!(g.cell_at(row, column), cell);
        }
    }

    #[test]
    fn block_and_unblock() {
        let mut g = grid(3, 3);
        g.set_blocked(4, true);
        assert!(g.is_blocked(4));
        g.set_blocked(4, false);
        assert!(!g.is_blocked(4));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut g = grid(6, 6);
        g.set_all(true);
        assert!((0..g.size()).all(|cell| g.is_blocked(cell)));
        g.set_all(false);
        assert_eq!(g, grid(6, 6));
    }

    #[test]
    fn start_cannot_overwrite_end() {
        let mut g = grid(3, 3);
        assert!(!g.set_start(g.end()));
        assert_eq!(g.start(), 0);
        assert!(!g.set_end(g.start()));
        assert_eq!(g.end(), 8);
    }

    #[test]
    fn moving_start_opens_the_cell() {
        let mut g = grid(3, 3);
        g.set_blocked(4, true);
        assert!(g.set_start(4));
        assert_eq!(g.start(), 4);
        assert!(!g.is_blocked(4));
    }

    #[test]
    fn set_start_rejects_out_of_range() {
        let mut g = grid(3, 3);
        assert!(!g.set_start(9));
        assert_eq!(g.start(), 0);
    }

    #[test]
    fn straight_and_diagonal_relations() {
        let g = grid(5, 5);
        let centre = g.cell_at(RowIndex(2), ColumnIndex(2));
        // same row, same column, off-axis
        assert!(g.is_straight(centre, g.cell_at(RowIndex(2), ColumnIndex(0))));
        assert!(g.is_straight(centre, g.cell_at(RowIndex(4), ColumnIndex(2))));
        assert!(!g.is_straight(centre, g.cell_at(RowIndex(0), ColumnIndex(1))));
        // perfect diagonals at distance 1 and 2
        assert!(g.is_diagonal(centre, g.cell_at(RowIndex(1), ColumnIndex(1))));
        assert!(g.is_diagonal(centre, g.cell_at(RowIndex(0), ColumnIndex(4))));
        assert!(!g.is_diagonal(centre, g.cell_at(RowIndex(0), ColumnIndex(1))));
    }

    #[test]
    fn random_cell_in_range() {
        let g = grid(4, 4);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(g.random_cell(&mut rng) < g.size());
        }
    }

    #[test]
    fn display_marks_start_end_and_walls() {
        let mut g = grid(2, 3);
        g.set_blocked(1, true);
        g.set_blocked(3, true);
        assert_eq!(format!("{}", g), "S#.\n#.E\n");
    }
}
