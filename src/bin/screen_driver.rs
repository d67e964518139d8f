use docopt::Docopt;
use gridpath::screen::{self, ScreenConfig};
use serde_derive::Deserialize;

const USAGE: &str = "Gridpath screen

Usage:
    gridpath_screen -h | --help
    gridpath_screen [options]

Open an interactive window. Left click blocks tiles, right click opens them,
S and E move the start and end cells under the pointer, Space searches for a
route, M runs the backtracker generator, N runs the Wilson generator, R
resets the grid and Escape cancels a running algorithm.

Options:
    -h --help        Show this screen.
    --width=<w>      Window pixel width, clamped to 400-1600 [default: 620].
    --height=<h>     Window pixel height, clamped to 400-1600 [default: 620].
    --tile=<n>       Tile side length in pixels, clamped to 1-39 [default: 19].
    --padding=<n>    Pixel gap between tiles, clamped to 0-4 [default: 1].
    --fps=<n>        Frame rate cap, 0 for uncapped, clamped to 0-10000 [default: 120].
    --skip=<n>       Present one frame in every n+1, clamped to 0-5000 [default: 0].
    --diagonal       Allow diagonal movement in the route search.
    --seed=<n>       Seed the random generator for reproducible mazes.
";

#[derive(Debug, Deserialize)]
struct ScreenArgs {
    flag_width: u32,
    flag_height: u32,
    flag_tile: u32,
    flag_padding: u32,
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
        errors {
            Screen(message: String) {
                description("screen failure")
                display("screen failure: {}", message)
            }
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    let args: ScreenArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let config = ScreenConfig {
        width: args.flag_width.clamp(400, 1600),
        height: args.flag_height.clamp(400, 1600),
        tile: args.flag_tile.clamp(1, 39),
        padding: args.flag_padding.clamp(0, 4),
        fps: args.flag_fps.clamp(0, 10_000),
        frameskip: args.flag_skip.clamp(0, 5_000),
        diagonal: args.flag_diagonal,
        seed: args.flag_seed,
    };

    screen::run(&config).map_err(|message| ErrorKind::Screen(message).into())
}
