//! Relocating the start and end cells after maze generation.

use crate::grid::Grid;

/// Scan row-major from the top-left corner; the first open cell becomes the
/// new start. Scan in reverse from the bottom-right corner; the first open
/// cell becomes the new end. A simple deterministic placement rule with no
/// guarantee about the start-to-end distance.
///
/// Relocation goes through the grid's rejecting mutators, so a scan that
/// lands on the opposite endpoint leaves that endpoint where it was.
pub fn place_start_end(grid: &mut Grid) {
    if let Some(cell) = (0..grid.size()).find(|&c| !grid.is_blocked(c)) {
        grid.set_start(cell);
    }
    if let Some(cell) = (0..grid.size()).rev().find(|&c| !grid.is_blocked(c)) {
        grid.set_end(cell);
    }
}
