//! Best-first route finding between the grid's start and end cells.

use bit_set::BitSet;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

use crate::grid::{Cell, Grid};
use crate::neighbours::moveable_neighbours;
use crate::stepping::{Flow, Step, StepSink, TracePacing};
use crate::utils;
use crate::utils::FnvHashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    /// The full path, start and end cells included.
    Found(Vec<Cell>),
    /// The queue ran dry: no open route exists. A normal outcome, not an error.
    NotFound,
    /// The sink asked to stop mid-search.
    Cancelled,
}

/// An open-queue entry. `rank` is a monotonically decreasing push counter, so
/// among entries with an equal f-score the most recently pushed one wins.
/// That LIFO bias keeps the frontier expanding in one direction instead of
/// round-robining, purely for the look of the search.
struct OpenEntry {
    f_score: f32,
    rank: u32,
    cell: Cell,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &OpenEntry) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &OpenEntry) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &OpenEntry) -> Ordering {
        // BinaryHeap is a max-heap: invert both keys so the entry with the
        // lowest (f_score, rank) pair is popped first. f-scores are finite
        // sums of heuristics and step costs, never NaN.
        other.f_score
             .partial_cmp(&self.f_score)
             .unwrap_or(Ordering::Equal)
             .then_with(|| other.rank.cmp(&self.rank))
    }
}

/// Manhattan distance. Used even when diagonal movement is enabled, where it
/// can overestimate the remaining cost and is therefore not admissible. The
/// resulting paths occasionally trade optimality for a straighter look, which
/// is the intended behaviour here.
fn heuristic(grid: &Grid, from: Cell, to: Cell) -> f32 {
    let row_delta = (grid.row_of(from) as isize - grid.row_of(to) as isize).abs();
    let col_delta = (grid.column_of(from) as isize - grid.column_of(to) as isize).abs();
    (row_delta + col_delta) as f32
}

/// The chain of parent links from `from` back towards the start cell,
/// nearest first. The start cell has no parent and is not included.
fn trail_from(parents: &FnvHashMap<Cell, Cell>, from: Cell) -> Vec<Cell> {
    let mut trail = Vec::new();
    let mut current = from;
    while let Some(&parent) = parents.get(&current) {
        trail.push(current);
        current = parent;
    }
    trail
}

/// Search for a route from the grid's start cell to its end cell.
///
/// Lazy-deletion A*: a cell may sit in the open queue several times while its
/// best known cost improves, only the first pop of a cell is acted on. Step
/// costs are `1.0` for straight moves and `√2` for diagonal ones. The sink
/// sees one `Examined` step per finalised cell, a `Discovered` step per
/// improved frontier cell, and a throttled `TrailCleared`/`TrailShown` pair
/// highlighting the trail currently being examined.
pub fn find_path<S: StepSink>(grid: &Grid,
                              diagonal: bool,
                              pacing: TracePacing,
                              sink: &mut S)
                              -> PathOutcome {

    let start = grid.start();
    let end = grid.end();

    let mut open = BinaryHeap::new();
    let mut closed = BitSet::with_capacity(grid.size());
    let mut parents: FnvHashMap<Cell, Cell> = utils::fnv_hashmap(grid.size());
    let mut g_scores: FnvHashMap<Cell, f32> = utils::fnv_hashmap(grid.size());

    g_scores.insert(start, 0.0);
    let mut rank = u32::MAX;
    open.push(OpenEntry { f_score: heuristic(grid, start, end), rank, cell: start });

    let mut trail: Vec<Cell> = Vec::new();
    let mut pops_since_trail = 0u32;

    while let Some(entry) = open.pop() {
        let current = entry.cell;
        if closed.contains(current) {
            // Stale duplicate of an already finalised cell.
            continue;
        }
        closed.insert(current);

        if current == end {
            let mut path = trail_from(&parents, end);
            path.push(start);
            path.reverse();

            if !trail.is_empty() {
                let old = std::mem::replace(&mut trail, Vec::new());
                if sink.step(grid, &Step::TrailCleared(old)) == Flow::Cancel {
                    return PathOutcome::Cancelled;
                }
            }
            // Highlight from the end's parent back: the end cell itself keeps
            // its own marker colour.
            let shown = match parents.get(&current) {
                Some(&parent) => trail_from(&parents, parent),
                None => Vec::new(),
            };
            if sink.step(grid, &Step::TrailShown(shown)) == Flow::Cancel {
                return PathOutcome::Cancelled;
            }
            return PathOutcome::Found(path);
        }

        pops_since_trail += 1;
        if pops_since_trail > pacing.trail_every {
            pops_since_trail = 0;
            let old = std::mem::replace(&mut trail, trail_from(&parents, current));
            if !old.is_empty() {
                if sink.step(grid, &Step::TrailCleared(old)) == Flow::Cancel {
                    return PathOutcome::Cancelled;
                }
            }
            if sink.step(grid, &Step::TrailShown(trail.clone())) == Flow::Cancel {
                return PathOutcome::Cancelled;
            }
        }

        if sink.step(grid, &Step::Examined(current)) == Flow::Cancel {
            return PathOutcome::Cancelled;
        }

        let current_g = *g_scores
            .get(&current)
            .expect("Popped cell must have a recorded g score.");

        for neighbour in moveable_neighbours(grid, current, diagonal) {
            if closed.contains(neighbour) {
                continue;
            }

            let step_cost = if grid.is_diagonal(current, neighbour) { SQRT_2 } else { 1.0 };
            let new_g = current_g + step_cost;
            let improves = g_scores.get(&neighbour).map_or(true, |&g| new_g < g);
            if improves {
                parents.insert(neighbour, current);
                g_scores.insert(neighbour, new_g);
                rank -= 1;
                open.push(OpenEntry {
                    f_score: new_g + heuristic(grid, neighbour, end),
                    rank,
                    cell: neighbour,
                });
                if neighbour != end {
                    if sink.step(grid, &Step::Discovered(neighbour)) == Flow::Cancel {
                        return PathOutcome::Cancelled;
                    }
                }
            }
        }
    }

    if !trail.is_empty() {
        let old = std::mem::replace(&mut trail, Vec::new());
        if sink.step(grid, &Step::TrailCleared(old)) == Flow::Cancel {
            return PathOutcome::Cancelled;
        }
    }
    PathOutcome::NotFound
}
