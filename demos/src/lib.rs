//! Board setup and frame printing for the `pathviz` binary.
//!
//! [`run`] builds a board with the source in the top-left corner and the
//! target in the bottom-right one, optionally carves a maze, then steps the
//! chosen search and writes ASCII frames to any [`Write`] sink.

use std::error::Error;
use std::io::Write;
use std::ops::ControlFlow;

use clap::Parser;
use pathviz_core::{GraphNode, Grid, Position};
use pathviz_maze::MazeGen;
use pathviz_paths::{Algorithm, Pacer, SearchStatus, Step};
use rand::SeedableRng;
use rand::rngs::StdRng;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Board height in cells
    #[arg(short, long, default_value_t = 21)]
    pub rows: i32,

    /// Board width in cells
    #[arg(short, long, default_value_t = 41)]
    pub cols: i32,

    /// Search to run: dijkstra, astar or bellman-ford
    #[arg(short, long, default_value_t = Algorithm::Dijkstra)]
    pub algorithm: Algorithm,

    /// Carve a random maze before searching
    #[arg(short, long)]
    pub maze: bool,

    /// Maze seed (random when omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Pause between ticks, in milliseconds
    #[arg(short, long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Mark the whole path at once instead of one cell per tick
    #[arg(short, long)]
    pub instant: bool,

    /// Print a frame every N ticks (0 prints only the final board)
    #[arg(short, long, default_value_t = 0)]
    pub frames: usize,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            rows: 21,
            cols: 41,
            algorithm: Algorithm::default(),
            maze: false,
            seed: None,
            delay_ms: 0,
            instant: false,
            frames: 0,
        }
    }
}

/// What a finished run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub status: SearchStatus,
    /// Search ticks, not counting the path reveal.
    pub ticks: usize,
    /// Cells on the path, endpoints included. Zero when no path exists.
    pub path_len: usize,
}

fn describe(status: SearchStatus) -> String {
    match status {
        SearchStatus::Searching => "still searching".to_owned(),
        SearchStatus::Found { distance } => format!("found, distance {distance}"),
        SearchStatus::Unreachable => "target unreachable".to_owned(),
        SearchStatus::NegativeCycle => "negative cycle".to_owned(),
    }
}

/// Where the target goes on a `rows x cols` board: the bottom-right corner,
/// or with a maze the closest cell on an even row and column, since maze
/// passages only run through those.
pub fn target_position(rows: i32, cols: i32, maze: bool) -> Position {
    if maze {
        Position::new((rows - 1) / 2 * 2, (cols - 1) / 2 * 2)
    } else {
        Position::new(rows - 1, cols - 1)
    }
}

/// Build the board described by `args`, run the search and print it.
pub fn run(args: &Args, out: &mut impl Write) -> Result<Summary, Box<dyn Error>> {
    let grid = Grid::new(args.rows, args.cols);
    if grid.bounds().is_empty() {
        return Err("the board needs at least one row and one column".into());
    }
    let target = target_position(grid.rows(), grid.cols(), args.maze);
    grid.set_source(Position::ZERO)?;
    grid.set_target(target)?;

    if args.maze {
        let seed = args.seed.unwrap_or_else(rand::random);
        let carved = MazeGen::new(StdRng::seed_from_u64(seed)).create_maze(&grid.cells());
        log::info!("maze seed {seed}: {carved} passages");
    }

    let mut search = args.algorithm.build_from_grid(&grid.cells())?;
    writeln!(out, "{}", args.algorithm.name())?;
    writeln!(out, "{}", args.algorithm.explanation())?;

    let pacer = Pacer::from_millis(args.delay_ms);
    let clear = if args.delay_ms > 0 { CLEAR_SCREEN } else { "" };
    let mut failed = None;
    let mut tick = 0;
    let paced = pacer.drive(&mut search, |step| {
        tick += 1;
        if args.frames == 0 || tick % args.frames != 0 {
            return ControlFlow::Continue(());
        }
        let what = match step {
            Step::Settled { cell, distance } => {
                format!("settled {} at {distance}", cell.position())
            }
            Step::Pass { pass } => format!("pass {pass}"),
        };
        match write!(out, "{clear}tick {tick}: {what}\n{grid}") {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                failed = Some(e);
                ControlFlow::Break(())
            }
        }
    });
    if let Some(e) = failed {
        return Err(e.into());
    }

    let status = search.status();
    let mut path_len = 0;
    if let SearchStatus::Found { .. } = status {
        let cell = grid.cell(target).ok_or("target fell off the board")?;
        path_len = search.path_to(&cell).map_or(0, |p| p.len());
        let reveal = search.show_path(&cell, args.instant);
        let mut shown = 0;
        pacer.drive(reveal, |_| {
            shown += 1;
            if args.frames == 0 {
                return ControlFlow::Continue(());
            }
            match write!(out, "{clear}path {shown}\n{grid}") {
                Ok(()) => ControlFlow::Continue(()),
                Err(e) => {
                    failed = Some(e);
                    ControlFlow::Break(())
                }
            }
        });
        if let Some(e) = failed {
            return Err(e.into());
        }
    }

    write!(out, "{clear}{grid}")?;
    writeln!(out, "{}: {} after {} ticks", args.algorithm, describe(status), paced.ticks)?;
    Ok(Summary {
        status,
        ticks: paced.ticks,
        path_len,
    })
}
