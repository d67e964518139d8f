use smallvec::SmallVec;

use crate::grid::{Cell, Grid};

pub type CellSmallVec = SmallVec<[Cell; 8]>;

/// Enumerate the cells surrounding `cell` that match the requested filters.
///
/// Candidates are every cell inside the `(2 * distance + 1)` square box
/// centred on `cell` and clipped to the grid bounds, visited in row-major
/// order and excluding `cell` itself. A candidate is kept when its relation
/// to `cell` matches the straight/diagonal flags and its blocked status
/// equals `want_blocked`.
///
/// When `(row + col)` of the queried cell is even the result is reversed.
/// Alternating the enumeration direction like this stops the path search
/// from producing zig-zag staircases, see
/// https://www.redblobgames.com/pathfinding/a-star/implementation.html#troubleshooting-ugly-path
///
/// A `distance` of zero or an out-of-range cell yields an empty sequence
/// rather than reading out of bounds.
pub fn neighbours(grid: &Grid,
                  cell: Cell,
                  include_straight: bool,
                  include_diagonal: bool,
                  want_blocked: bool,
                  distance: usize)
                  -> CellSmallVec {

    let mut found = CellSmallVec::new();
    if distance == 0 || !grid.is_valid(cell) {
        return found;
    }

    let row = grid.row_of(cell);
    let col = grid.column_of(cell);
    let row_start = row.saturating_sub(distance);
    let row_end = (row + distance).min(grid.rows() - 1);
    let col_start = col.saturating_sub(distance);
    let col_end = (col + distance).min(grid.columns() - 1);

    for row_i in row_start..=row_end {
        for col_i in col_start..=col_end {
            if row_i == row && col_i == col {
                continue;
            }

            let straight = row_i == row || col_i == col;
            let diagonal = (row_i as isize - row as isize).abs() ==
                           (col_i as isize - col as isize).abs();
            if !((include_straight && straight) || (include_diagonal && diagonal)) {
                continue;
            }

            let candidate = row_i * grid.columns() + col_i;
            if grid.is_blocked(candidate) == want_blocked {
                found.push(candidate);
            }
        }
    }

    if (row + col) % 2 == 0 {
        found.reverse();
    }
    found
}

/// The open cells a path may move to in one step: straight neighbours always,
/// diagonal neighbours when the movement rules allow them.
pub fn moveable_neighbours(grid: &Grid, cell: Cell, diagonal: bool) -> CellSmallVec {
    neighbours(grid, cell, true, diagonal, false, 1)
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::units::{ColumnsCount, RowsCount};

    fn grid(rows: usize, columns: usize) -> Grid {
        Grid::new(RowsCount(rows), ColumnsCount(columns))
    }

    #[test]
    fn even_parity_cell_reverses_scan_order() {
        let g = grid(3, 3);
        // centre cell (1, 1): every other cell of the 3x3 box qualifies
        assert_eq!(&*neighbours(&g, 4, true, true, false, 1),
                   &[8, 7, 6, 5, 3, 2, 1, 0]);
    }

    #[test]
    fn odd_parity_cell_keeps_scan_order() {
        let g = grid(3, 3);
        // cell (1, 0): box is clipped to the two leftmost columns
        assert_eq!(&*neighbours(&g, 3, true, true, false, 1), &[0, 1, 4, 6, 7]);
    }

    #[test]
    fn relation_flags_filter_candidates() {
        let g = grid(3, 3);
        assert_eq!(&*neighbours(&g, 4, true, false, false, 1), &[7, 5, 3, 1]);
        assert_eq!(&*neighbours(&g, 4, false, true, false, 1), &[8, 6, 2, 0]);
        assert!(neighbours(&g, 4, false, false, false, 1).is_empty());
    }

    #[test]
    fn blocked_filter_selects_matching_cells() {
        let mut g = grid(3, 3);
        g.set_blocked(1, true);
        g.set_blocked(5, true);
        assert_eq!(&*neighbours(&g, 4, true, false, true, 1), &[5, 1]);
        assert_eq!(&*neighbours(&g, 4, true, false, false, 1), &[7, 3]);
    }

    #[test]
    fn distance_two_straight_neighbours() {
        let g = grid(5, 5);
        // centre cell 12 = (2, 2), straight cells one and two steps out
        assert_eq!(&*neighbours(&g, 12, true, false, false, 2),
                   &[22, 17, 14, 13, 11, 10, 7, 2]);
    }

    #[test]
    fn degenerate_requests_are_empty() {
        let g = grid(3, 3);
        assert!(neighbours(&g, 4, true, true, false, 0).is_empty());
        assert!(neighbours(&g, 99, true, true, false, 1).is_empty());
    }

    #[test]
    fn moveable_neighbours_respects_diagonal_flag() {
        let g = grid(3, 3);
        assert_eq!(moveable_neighbours(&g, 4, false).len(), 4);
        assert_eq!(moveable_neighbours(&g, 4, true).len(), 8);
    }

    #[test]
    fn never_returns_the_queried_cell() {
        fn prop(rows: u8, columns: u8, cell: u16, distance: u8) -> TestResult {
            let (rows, columns) = (rows as usize % 16 + 1, columns as usize % 16 + 1);
            let g = grid(rows, columns);
            let cell = cell as usize;
            if !g.is_valid(cell) {
                return TestResult::discard();
            }
            let distance = distance as usize % 4 + 1;
            let found = neighbours(&g, cell, true, true, false, distance);
            TestResult::from_bool(!found.contains(&cell))
        }
        quickcheck(prop as fn(u8, u8, u16, u8) -> TestResult);
    }

    #[test]
    fn neighbours_stay_within_distance_and_bounds() {
        fn prop(rows: u8, columns: u8, cell: u16, distance: u8) -> TestResult {
            let (rows, columns) = (rows as usize % 16 + 1, columns as usize % 16 + 1);
            let g = grid(rows, columns);
            let cell = cell as usize;
            if !g.is_valid(cell) {
                return TestResult::discard();
            }
            let distance = distance as usize % 4 + 1;
            let found = neighbours(&g, cell, true, true, false, distance);
            let in_range = found.iter().all(|&n| {
                g.is_valid(n) &&
                (g.row_of(n) as isize - g.row_of(cell) as isize).abs() <= distance as isize &&
                (g.column_of(n) as isize - g.column_of(cell) as isize).abs() <= distance as isize
            });
            TestResult::from_bool(in_range)
        }
        quickcheck(prop as fn(u8, u8, u16, u8) -> TestResult);
    }
}
