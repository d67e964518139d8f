//! The seam between the long-running grid algorithms and whatever is
//! watching them run.
//!
//! Each algorithm emits a finite sequence of `Step` events, one per
//! visualisation-relevant mutation or highlight. The consumer gets a chance
//! to present a frame and to request cancellation after every event; a
//! cancelled algorithm stops immediately and leaves the grid in its
//! last-mutated state.

use crate::grid::{Cell, Grid};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The whole grid was rewritten (maze reset), any cached colours are stale.
    Reset,
    /// A cell was opened: a maze passage or node was carved out.
    Carved(Cell),
    /// Wilson's initial tree cell was chosen.
    RootPlanted(Cell),
    /// The loop-erased random walk moved on through `wall` out of `cell`.
    WalkAdvanced { cell: Cell, wall: Cell },
    /// A looping stretch of the random walk was abandoned.
    WalkErased { cell: Cell, wall: Cell },
    /// The path search finalised a cell.
    Examined(Cell),
    /// The path search discovered (or improved) a frontier cell.
    Discovered(Cell),
    /// The currently examined trail back towards the start.
    TrailShown(Vec<Cell>),
    /// A previously shown trail is no longer current.
    TrailCleared(Vec<Cell>),
    /// A maze generator finished and relocated the start and end cells.
    StartEndPlaced,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Cancel,
}

/// Consumer of algorithm steps: a renderer, a recorder, or nothing at all.
pub trait StepSink {
    fn step(&mut self, grid: &Grid, step: &Step) -> Flow;
}

/// Sink for headless runs: ignores every step and never cancels.
pub struct NullSink;

impl StepSink for NullSink {
    fn step(&mut self, _grid: &Grid, _step: &Step) -> Flow {
        Flow::Continue
    }
}

/// How often the path search re-renders its currently examined trail.
///
/// Purely cosmetic pacing. Derived from the configured frame rate and frame
/// skip so the highlight stays visible at high frame rates without stalling
/// uncapped runs.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TracePacing {
    pub trail_every: u32,
}

impl TracePacing {
    pub fn from_frame_rate(fps: u32, frameskip: u32) -> TracePacing {
        let base = if fps == 0 { 240 } else { fps / 30 };
        TracePacing { trail_every: base + frameskip * 5 }
    }

    pub fn every(trail_every: u32) -> TracePacing {
        TracePacing { trail_every }
    }
}


#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn pacing_matches_frame_configuration() {
        // Uncapped frame rate falls back to a long interval
        assert_eq!(TracePacing::from_frame_rate(0, 0).trail_every, 240);
        assert_eq!(TracePacing::from_frame_rate(120, 0).trail_every, 4);
        assert_eq!(TracePacing::from_frame_rate(60, 2).trail_every, 12);
    }
}
