//! Maze generation over the grid's odd-row/odd-column sub-lattice.
//!
//! Both generators first reset the grid to all-blocked walls with the
//! sub-lattice nodes open, then carve the wall cell between two nodes (the
//! arithmetic midpoint of their indices) whenever the algorithm commits that
//! edge to the spanning tree. The finished maze is a perfect maze: exactly
//! one simple route between any two nodes.

use bit_set::BitSet;
use itertools::iproduct;
use rand::Rng;

use crate::grid::{Cell, Grid};
use crate::neighbours::neighbours;
use crate::placement::place_start_end;
use crate::stepping::{Flow, Step, StepSink};
use crate::utils;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GenOutcome {
    Complete,
    Cancelled,
}

/// Every sub-lattice node of the grid, in row-major order.
fn lattice_nodes(grid: &Grid) -> Vec<Cell> {
    iproduct!((1..grid.rows()).step_by(2), (1..grid.columns()).step_by(2))
        .map(|(row, col)| row * grid.columns() + col)
        .collect()
}

/// Turn the whole grid into walls, then open the sub-lattice nodes.
fn init_maze(grid: &mut Grid) {
    grid.set_all(true);
    for node in lattice_nodes(grid) {
        grid.set_blocked(node, false);
    }
}

/// The straight-line distance-2 neighbours a random walk may move to,
/// excluding the node it just came from so the walk cannot trivially undo
/// its last step. The predecessor is kept when it is the only way out
/// (a dead end on a degenerate sub-lattice).
fn walk_moves(grid: &Grid, current: Cell, came_from: Option<Cell>) -> Vec<Cell> {
    let mut moves: Vec<Cell> = neighbours(grid, current, true, false, false, 2).to_vec();
    if let Some(previous) = came_from {
        if moves.len() > 1 {
            moves.retain(|&c| c != previous);
        }
    }
    moves
}

/// Wilson's algorithm: build the maze from loop-erased random walks.
///
/// Each walk starts at a random unexplored node and wanders the sub-lattice;
/// any self-intersection erases the looping stretch. When the walk reaches a
/// node already in the maze, the whole walked path is committed: its nodes
/// and the walls between them are opened and removed from the explore list.
/// Sampling this way produces every spanning tree of the sub-lattice with
/// equal probability.
pub fn wilson<R: Rng, S: StepSink>(grid: &mut Grid, rng: &mut R, sink: &mut S) -> GenOutcome {
    init_maze(grid);
    if sink.step(grid, &Step::Reset) == Flow::Cancel {
        return GenOutcome::Cancelled;
    }

    let mut cells_to_explore = lattice_nodes(grid);
    if cells_to_explore.is_empty() {
        // Grid too small to hold any maze node.
        return GenOutcome::Complete;
    }
    let mut cells_in_maze = utils::fnv_hashset(cells_to_explore.len());

    let index = rng.gen_range(0..cells_to_explore.len());
    let root = cells_to_explore.swap_remove(index);
    cells_in_maze.insert(root);
    grid.set_blocked(root, false);
    if sink.step(grid, &Step::RootPlanted(root)) == Flow::Cancel {
        return GenOutcome::Cancelled;
    }

    while !cells_to_explore.is_empty() {
        // Predecessor of each node in the current walk; the walk start points
        // at itself so the chain has a clean terminator.
        let mut previous = utils::fnv_hashmap(cells_to_explore.len());

        let walk_index = rng.gen_range(0..cells_to_explore.len());
        let walk_start = cells_to_explore.swap_remove(walk_index);
        let mut current = walk_start;
        previous.insert(current, current);

        loop {
            let came_from = previous.get(&current).cloned();
            let moves = walk_moves(grid, current, came_from);
            let next = moves[rng.gen_range(0..moves.len())];

            if cells_in_maze.contains(&next) {
                // Reached the tree: commit the whole walk.
                previous.insert(next, current);
                cells_in_maze.insert(walk_start);
                grid.set_blocked(walk_start, false);
                if sink.step(grid, &Step::Carved(walk_start)) == Flow::Cancel {
                    return GenOutcome::Cancelled;
                }

                let mut link = next;
                loop {
                    let parent = *previous
                        .get(&link)
                        .expect("Committed walk node must have a predecessor.");
                    if parent == link {
                        break;
                    }
                    cells_in_maze.insert(link);
                    grid.set_blocked(link, false);
                    cells_to_explore.retain(|&c| c != link);

                    let wall = (link + parent) / 2;
                    grid.set_blocked(wall, false);
                    if sink.step(grid, &Step::Carved(link)) == Flow::Cancel {
                        return GenOutcome::Cancelled;
                    }
                    if sink.step(grid, &Step::Carved(wall)) == Flow::Cancel {
                        return GenOutcome::Cancelled;
                    }
                    link = parent;
                }
                break;
            }

            if previous.contains_key(&next) {
                // The walk crossed itself: erase the looping stretch and
                // continue from the revisited node.
                let mut loop_cell = current;
                while loop_cell != next {
                    let parent = *previous
                        .get(&loop_cell)
                        .expect("Walk node must have a predecessor.");
                    let wall = (loop_cell + parent) / 2;
                    if sink.step(grid, &Step::WalkErased { cell: loop_cell, wall }) ==
                       Flow::Cancel {
                        return GenOutcome::Cancelled;
                    }
                    previous.remove(&loop_cell);
                    loop_cell = parent;
                }
                current = next;
                continue;
            }

            previous.insert(next, current);
            let wall = (current + next) / 2;
            if sink.step(grid, &Step::WalkAdvanced { cell: current, wall }) == Flow::Cancel {
                return GenOutcome::Cancelled;
            }
            current = next;
        }
    }

    place_start_end(grid);
    let _ = sink.step(grid, &Step::StartEndPlaced);
    GenOutcome::Complete
}

/// Randomized depth-first backtracker.
///
/// Not uniform over spanning trees; the depth-first bias produces long
/// winding corridors. The explicit stack revisits a node as long as it still
/// has unvisited sub-lattice neighbours, carving one randomly chosen passage
/// per visit.
pub fn recursive_backtracker<R: Rng, S: StepSink>(grid: &mut Grid,
                                                  rng: &mut R,
                                                  sink: &mut S)
                                                  -> GenOutcome {
    init_maze(grid);
    if sink.step(grid, &Step::Reset) == Flow::Cancel {
        return GenOutcome::Cancelled;
    }

    let mut root = grid.random_cell(rng);
    if grid.is_blocked(root) {
        // The pick landed on a wall cell: snap to the nearest open node.
        match neighbours(grid, root, true, true, false, 2).first() {
            Some(&node) => root = node,
            None => return GenOutcome::Complete,
        }
    }

    let mut visited = BitSet::with_capacity(grid.size());
    let mut stack: Vec<Cell> = Vec::new();
    grid.set_blocked(root, false);
    stack.push(root);
    visited.insert(root);

    while let Some(current) = stack.pop() {
        let mut moves = neighbours(grid, current, true, false, false, 2);
        moves.retain(|c| !visited.contains(*c));
        if moves.is_empty() {
            // Dead end: leave it popped and backtrack.
            continue;
        }

        // May still have unvisited branches, so it goes back on the stack.
        stack.push(current);
        let chosen = moves[rng.gen_range(0..moves.len())];
        grid.set_blocked(chosen, false);
        stack.push(chosen);
        visited.insert(chosen);

        let wall = (current + chosen) / 2;
        grid.set_blocked(wall, false);
        visited.insert(wall);

        if sink.step(grid, &Step::Carved(chosen)) == Flow::Cancel {
            return GenOutcome::Cancelled;
        }
        if sink.step(grid, &Step::Carved(wall)) == Flow::Cancel {
            return GenOutcome::Cancelled;
        }
    }

    place_start_end(grid);
    let _ = sink.step(grid, &Step::StartEndPlaced);
    GenOutcome::Complete
}

#[cfg(test)]
mod tests {

    use petgraph::unionfind::UnionFind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::stepping::testing::RecordingSink;
    use crate::stepping::NullSink;
    use crate::units::{ColumnsCount, RowsCount};

    fn grid(rows: usize, columns: usize) -> Grid {
        Grid::new(RowsCount(rows), ColumnsCount(columns))
    }

    fn open_cells(g: &Grid) -> Vec<Cell> {
        (0..g.size()).filter(|&c| !g.is_blocked(c)).collect()
    }

    /// The open cells must form a tree: adjacency edges never join two cells
    /// already connected, and every open cell ends up in one component.
    fn assert_perfect_maze(g: &Grid) {
        let open = open_cells(g);
        let mut components = UnionFind::<usize>::new(g.size());

        for &cell in &open {
            let row = g.row_of(cell);
            let col = g.column_of(cell);
            // right and down neighbours only, so each edge is seen once
            if col + 1 < g.columns() && !g.is_blocked(cell + 1) {
                assert!(components.union(cell, cell + 1),
                        "cycle through cells {} and {}",
                        cell,
                        cell + 1);
            }
            if row + 1 < g.rows() && !g.is_blocked(cell + g.columns()) {
                assert!(components.union(cell, cell + g.columns()),
                        "cycle through cells {} and {}",
                        cell,
                        cell + g.columns());
            }
        }

        let root = components.find(open[0]);
        assert!(open.iter().all(|&c| components.find(c) == root),
                "open cells are not all connected");
    }

    #[test]
    fn wilson_builds_a_spanning_tree() {
        let mut g = grid(9, 9);
        let mut rng = StdRng::seed_from_u64(99);
        assert_eq!(wilson(&mut g, &mut rng, &mut NullSink), GenOutcome::Complete);

        // 4x4 sub-lattice: 16 nodes plus 15 opened walls
        assert_eq!(open_cells(&g).len(), 16 + 15);
        assert_perfect_maze(&g);
    }

    #[test]
    fn backtracker_builds_a_spanning_tree() {
        let mut g = grid(9, 9);
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(recursive_backtracker(&mut g, &mut rng, &mut NullSink),
                   GenOutcome::Complete);

        assert_eq!(open_cells(&g).len(), 16 + 15);
        assert_perfect_maze(&g);
    }

    #[test]
    fn generation_places_open_start_and_end() {
        let mut g = grid(9, 9);
        let mut rng = StdRng::seed_from_u64(11);
        wilson(&mut g, &mut rng, &mut NullSink);

        assert!(!g.is_blocked(g.start()));
        assert!(!g.is_blocked(g.end()));
        assert_ne!(g.start(), g.end());
    }

    #[test]
    fn backtracker_filters_visited_nodes_and_carved_walls() {
        // Two nodes only (cells 6 and 8 around wall 7). Once both are carved
        // every candidate move is already visited, so the walk must treat
        // both revisits as dead ends and terminate with exactly three open
        // cells.
        let mut g = grid(3, 5);
        let mut rng = StdRng::seed_from_u64(8);
        assert_eq!(recursive_backtracker(&mut g, &mut rng, &mut NullSink),
                   GenOutcome::Complete);
        assert_eq!(open_cells(&g), vec![6, 7, 8]);
    }

    #[test]
    fn same_seed_reproduces_the_maze() {
        let build = |seed| {
            let mut g = grid(9, 11);
            let mut rng = StdRng::seed_from_u64(seed);
            recursive_backtracker(&mut g, &mut rng, &mut NullSink);
            g
        };
        assert_eq!(build(1234), build(1234));
    }

    #[test]
    fn generators_tolerate_a_grid_without_nodes() {
        // a single row has no odd-row cells, so no sub-lattice at all
        let mut g = grid(1, 8);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(wilson(&mut g, &mut rng, &mut NullSink), GenOutcome::Complete);
        assert!(open_cells(&g).is_empty());
    }

    #[test]
    fn cancellation_aborts_generation() {
        let mut g = grid(9, 9);
        let mut rng = StdRng::seed_from_u64(21);
        let mut sink = RecordingSink::cancelling_after(1);
        assert_eq!(wilson(&mut g, &mut rng, &mut sink), GenOutcome::Cancelled);
        // the reset had already happened when the cancel arrived
        assert_eq!(sink.steps[0], Step::Reset);
    }

    #[test]
    fn wilson_samples_spanning_trees_uniformly() {
        // A 2x2 node lattice has four spanning trees, one per left-out wall.
        // Chi-square goodness of fit over which wall stayed blocked; with
        // 2000 runs and 3 degrees of freedom a statistic under 20 comfortably
        // accepts a uniform sampler.
        let walls = [7usize, 11, 13, 17];
        let runs = 2000;
        let mut counts = [0u32; 4];
        let mut rng = StdRng::seed_from_u64(7777);

        for _ in 0..runs {
            let mut g = grid(5, 5);
            wilson(&mut g, &mut rng, &mut NullSink);
            let closed: Vec<usize> = walls.iter()
                                          .cloned()
                                          .filter(|&w| g.is_blocked(w))
                                          .collect();
            assert_eq!(closed.len(), 1, "exactly one wall must stay blocked");
            let which = walls.iter().position(|&w| w == closed[0]).unwrap();
            counts[which] += 1;
        }

        let expected = runs as f64 / 4.0;
        let chi_square: f64 = counts.iter()
                                    .map(|&observed| {
                                        let delta = observed as f64 - expected;
                                        delta * delta / expected
                                    })
                                    .sum();
        assert!(chi_square < 20.0,
                "wall counts {:?} give chi-square {}",
                counts,
                chi_square);
    }
}
