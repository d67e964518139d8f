//! **gridpath** is a grid based route finding and maze generation visualisation library.

pub mod generators;
pub mod grid;
pub mod neighbours;
pub mod pathing;
pub mod placement;
#[cfg(feature = "screen")]
pub mod screen;
pub mod stepping;
pub mod units;
mod utils;
