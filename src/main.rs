use docopt::Docopt;
use gridpath::{
    generators,
    grid::{Cell, Grid},
    pathing::{self, PathOutcome},
    stepping::{NullSink, TracePacing},
    units::{ColumnsCount, Height, RowsCount, Width},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_derive::Deserialize;
use std::collections::HashSet;

const USAGE: &str = "Gridpath

Usage:
    gridpath_driver -h | --help
    gridpath_driver [(wilson|backtracker)] [options]

Run a maze generator over the grid (if asked), search for a route from the
start corner to the end corner, and print the result as text. Use the
gridpath_screen binary (built with the `screen` feature) to watch the
algorithms run in a window.

Options:
    -h --help        Show this screen.
    --width=<w>      Surface pixel width, clamped to 400-1600 [default: 620].
    --height=<h>     Surface pixel height, clamped to 400-1600 [default: 620].
    --tile=<n>       Tile side length in pixels, clamped to 1-39 [default: 19].
    --padding=<n>    Pixel gap between tiles, clamped to 0-4 [default: 1].
    --fps=<n>        Frame rate cap, 0 for uncapped, clamped to 0-10000 [default: 120].
    --skip=<n>       Present one frame in every n+1, clamped to 0-5000 [default: 0].
    --diagonal       Allow diagonal movement in the route search.
    --seed=<n>       Seed the random generator for reproducible mazes.
";

#[derive(Debug, Deserialize)]
struct DriverArgs {
    cmd_wilson: bool,
    cmd_backtracker: bool,
    flag_width: usize,
    flag_height: usize,
    flag_tile: usize,
    flag_padding: usize,
    flag_fps: u32,
    flag_skip: u32,
    flag_diagonal: bool,
    flag_seed: Option<u64>,
}

mod errors {
    use error_chain::*;
    error_chain! {
        foreign_links {
            DocOptFailure(::docopt::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    let args: DriverArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (Width(width), Height(height)) = clamped_surface(&args);
    let tile = args.flag_tile.clamp(1, 39);
    let padding = args.flag_padding.clamp(0, 4);
    let fps = args.flag_fps.clamp(0, 10_000);
    let frameskip = args.flag_skip.clamp(0, 5_000);

    // One tile plus its padding per grid cell, exactly as many as fit.
    let tile_span = tile + padding;
    let rows = RowsCount(height / tile_span);
    let columns = ColumnsCount(width / tile_span);
    let mut grid = Grid::new(rows, columns);

    let mut rng = match args.flag_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if args.cmd_wilson {
        generators::wilson(&mut grid, &mut rng, &mut NullSink);
    } else if args.cmd_backtracker {
        generators::recursive_backtracker(&mut grid, &mut rng, &mut NullSink);
    }

    let pacing = TracePacing::from_frame_rate(fps, frameskip);
    match pathing::find_path(&grid, args.flag_diagonal, pacing, &mut NullSink) {
        PathOutcome::Found(path) => {
            println!("{}", render_with_route(&grid, &path));
            println!("Route found: {} cells.", path.len());
        }
        PathOutcome::NotFound => {
            println!("{}", grid);
            println!("No route between start and end.");
        }
        PathOutcome::Cancelled => {}
    }

    Ok(())
}

fn clamped_surface(args: &DriverArgs) -> (Width, Height) {
    (Width(args.flag_width.clamp(400, 1600)), Height(args.flag_height.clamp(400, 1600)))
}

/// The grid's text rendering with the route cells marked.
fn render_with_route(grid: &Grid, path: &[Cell]) -> String {
    let on_route: HashSet<Cell> = path.iter().cloned().collect();
    let mut output = String::with_capacity(grid.size() + grid.rows());

    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let cell = row * grid.columns() + column;
            let glyph = if cell == grid.start() {
                'S'
            } else if cell == grid.end() {
                'E'
            } else if on_route.contains(&cell) {
                '*'
            } else if grid.is_blocked(cell) {
                '#'
            } else {
                '.'
            };
            output.push(glyph);
        }
        output.push('\n');
    }
    output
}
