//! Terminal pathfinding visualizer.
//!
//! Run: cargo run --bin pathviz -- --maze --algorithm astar --frames 1 --delay-ms 30
//!
//! Set `RUST_LOG=debug` (or `trace`) to follow the search in the log.

use clap::Parser;
use pathviz_demos::{Args, run};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let stdout = std::io::stdout();
    let summary = run(&args, &mut stdout.lock())?;
    log::info!("done after {} ticks", summary.ticks);
    Ok(())
}
