//! Interactive sdl2 front end: paints the grid as coloured tiles, lets the
//! pointer block and unblock cells, and watches the algorithms run step by
//! step. Compiled only with the `screen` cargo feature.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::WindowCanvas;
use sdl2::EventPump;
use std::thread;
use std::time::{Duration, Instant};

use crate::generators;
use crate::grid::{Cell, Grid};
use crate::pathing;
use crate::stepping::{Flow, Step, StepSink, TracePacing};
use crate::units::{ColumnsCount, RowsCount};

const COLOUR_GRAY: Color = Color { r: 35, g: 35, b: 35, a: 255 };
const COLOUR_RED: Color = Color { r: 255, g: 70, b: 50, a: 255 };
const COLOUR_BLUE: Color = Color { r: 55, g: 120, b: 255, a: 255 };
const COLOUR_WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
const COLOUR_BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
const COLOUR_GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
const COLOUR_CYAN: Color = Color { r: 0, g: 255, b: 255, a: 255 };
const COLOUR_MAGENTA: Color = Color { r: 255, g: 0, b: 255, a: 255 };

#[derive(Debug, Copy, Clone)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
    pub tile: u32,
    pub padding: u32,
    pub fps: u32,
    pub frameskip: u32,
    pub diagonal: bool,
    pub seed: Option<u64>,
}

/// The window, the per-tile colour state and the frame pacing counters.
struct ScreenView {
    canvas: WindowCanvas,
    events: EventPump,
    colours: Vec<Color>,
    columns: usize,
    rows: usize,
    tile: u32,
    tile_span: u32,
    frameskip: u32,
    frames_skipped: u32,
    frame_interval: Option<Duration>,
    last_present: Instant,
    quit: bool,
}

impl ScreenView {
    /// Reset every tile colour from the grid: open white, blocked black,
    /// start cyan, end magenta.
    fn blank(&mut self, grid: &Grid) {
        for cell in 0..grid.size() {
            self.colours[cell] = if grid.is_blocked(cell) { COLOUR_BLACK } else { COLOUR_WHITE };
        }
        self.colours[grid.start()] = COLOUR_CYAN;
        self.colours[grid.end()] = COLOUR_MAGENTA;
    }

    fn colour_cell(&mut self, cell: Cell, colour: Color) {
        if cell < self.colours.len() {
            self.colours[cell] = colour;
        }
    }

    /// Draw the current tile colours, honouring the frame-skip setting and
    /// sleeping off any frame rate cap.
    fn present(&mut self) {
        self.frames_skipped += 1;
        if self.frames_skipped < self.frameskip {
            return;
        }
        self.frames_skipped = 0;

        self.canvas.set_draw_color(COLOUR_GRAY);
        self.canvas.clear();
        for (cell, colour) in self.colours.iter().enumerate() {
            let row = cell / self.columns;
            let column = cell % self.columns;
            let x = (column as u32 * self.tile_span) as i32;
            let y = (row as u32 * self.tile_span) as i32;
            self.canvas.set_draw_color(*colour);
            let _ = self.canvas.fill_rect(Rect::new(x, y, self.tile, self.tile));
        }
        self.canvas.present();

        if let Some(interval) = self.frame_interval {
            let elapsed = self.last_present.elapsed();
            if elapsed < interval {
                thread::sleep(interval - elapsed);
            }
        }
        self.last_present = Instant::now();
    }

    /// Drain pending window events; window close or Escape asks the running
    /// algorithm to stop.
    fn poll_cancelled(&mut self) -> bool {
        let mut cancelled = false;
        for event in self.events.poll_iter() {
            match event {
                Event::Quit { .. } => {
                    self.quit = true;
                    cancelled = true;
                }
                Event::KeyDown { keycode: Some(Keycode::Escape), .. } => {
                    cancelled = true;
                }
                _ => {}
            }
        }
        cancelled
    }

    /// The cell under the pointer, clamped onto the grid so border pixels
    /// still count.
    fn hovered_cell(&self) -> Cell {
        let state = self.events.mouse_state();
        let column = ((state.x().max(0) as u32 / self.tile_span) as usize)
            .min(self.columns - 1);
        let row = ((state.y().max(0) as u32 / self.tile_span) as usize).min(self.rows - 1);
        row * self.columns + column
    }
}

impl StepSink for ScreenView {
    fn step(&mut self, grid: &Grid, step: &Step) -> Flow {
        match step {
            Step::Reset | Step::StartEndPlaced => {
                self.blank(grid);
                self.present();
            }
            Step::Carved(cell) => {
                self.colour_cell(*cell, COLOUR_WHITE);
                self.present();
            }
            Step::RootPlanted(cell) => {
                self.colour_cell(*cell, COLOUR_GREEN);
            }
            Step::WalkAdvanced { cell, wall } => {
                self.colour_cell(*cell, COLOUR_MAGENTA);
                self.colour_cell(*wall, COLOUR_MAGENTA);
                self.present();
            }
            Step::WalkErased { cell, wall } => {
                self.colour_cell(*cell, COLOUR_BLACK);
                self.colour_cell(*wall, COLOUR_BLACK);
            }
            Step::Examined(cell) => {
                if *cell != grid.start() {
                    self.colour_cell(*cell, COLOUR_RED);
                }
                self.present();
            }
            Step::Discovered(cell) => {
                if *cell != grid.end() {
                    self.colour_cell(*cell, COLOUR_GREEN);
                }
            }
            Step::TrailShown(cells) => {
                for cell in cells {
                    self.colour_cell(*cell, COLOUR_BLUE);
                }
            }
            Step::TrailCleared(cells) => {
                for cell in cells {
                    self.colour_cell(*cell, COLOUR_RED);
                }
            }
        }

        if self.poll_cancelled() { Flow::Cancel } else { Flow::Continue }
    }
}

/// Open the window and run the interactive loop until the window closes.
///
/// Left click blocks tiles, right click opens them, S and E relocate the
/// start and end cells under the pointer, Space runs the route search, M and
/// N run the two maze generators, R resets the grid.
pub fn run(config: &ScreenConfig) -> Result<(), String> {
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let window = video_subsystem
        .window("Gridpath", config.width, config.height)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    let events = sdl_context.event_pump()?;

    let tile_span = config.tile + config.padding;
    let rows = (config.height / tile_span) as usize;
    let columns = (config.width / tile_span) as usize;

    let mut grid = Grid::new(RowsCount(rows), ColumnsCount(columns));
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let pacing = TracePacing::from_frame_rate(config.fps, config.frameskip);

    let mut view = ScreenView {
        canvas,
        events,
        colours: vec![COLOUR_WHITE; grid.size()],
        columns: grid.columns(),
        rows: grid.rows(),
        tile: config.tile,
        tile_span,
        frameskip: config.frameskip,
        frames_skipped: 0,
        frame_interval: if config.fps > 0 {
            Some(Duration::from_secs_f64(1.0 / f64::from(config.fps)))
        } else {
            None
        },
        last_present: Instant::now(),
        quit: false,
    };
    view.blank(&grid);

    // Leftover search colours are wiped as soon as the user edits tiles again.
    let mut drawing = true;

    while !view.quit {
        let pending: Vec<Event> = view.events.poll_iter().collect();
        for event in pending {
            match event {
                Event::Quit { .. } => view.quit = true,
                Event::KeyDown { keycode: Some(key), .. } => match key {
                    Keycode::Space => {
                        view.blank(&grid);
                        pathing::find_path(&grid, config.diagonal, pacing, &mut view);
                        drawing = false;
                    }
                    Keycode::R => {
                        grid.set_all(false);
                        view.blank(&grid);
                        drawing = true;
                    }
                    Keycode::S => {
                        let hovered = view.hovered_cell();
                        if grid.set_start(hovered) {
                            view.blank(&grid);
                        }
                        drawing = true;
                    }
                    Keycode::E => {
                        let hovered = view.hovered_cell();
                        if grid.set_end(hovered) {
                            view.blank(&grid);
                        }
                        drawing = true;
                    }
                    Keycode::M => {
                        generators::recursive_backtracker(&mut grid, &mut rng, &mut view);
                        drawing = true;
                    }
                    Keycode::N => {
                        generators::wilson(&mut grid, &mut rng, &mut view);
                        drawing = true;
                    }
                    _ => {}
                },
                _ => {}
            }
        }
        if view.quit {
            break;
        }

        let mouse = view.events.mouse_state();
        if mouse.left() ^ mouse.right() {
            if !drawing {
                drawing = true;
                view.blank(&grid);
            }
            let hovered = view.hovered_cell();
            if hovered != grid.start() && hovered != grid.end() {
                let block = mouse.left();
                grid.set_blocked(hovered, block);
                view.colour_cell(hovered, if block { COLOUR_BLACK } else { COLOUR_WHITE });
            }
        }

        view.present();
    }

    Ok(())
}
