//! # Delve CLI
//!
//! Generates single rooms, standalone mazes, or complete 12-room dungeons,
//! and validates grids loaded from disk.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use delve::generation::rng_from_seed;
use delve::io;
use delve::validation::{room_statistics, shortest_exit_path};
use delve::{
    generate_valid_room, DelveResult, Direction, DungeonGenerator, Grid, GridGenerator,
    MapGenerator, PlacementRequest, RoomSpec, TileConfig,
};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line arguments for the Delve generator.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Procedural dungeon grid generator with connectivity validation")]
#[command(version)]
struct Args {
    /// Tile symbol table file (one symbol per line); defaults to S G # ' T X R
    #[arg(long, global = true)]
    tiles: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one validated 18x18 dungeon room
    Room {
        /// Room id (1-12); decides entrance geometry and terminal status
        #[arg(long)]
        id: u32,

        /// Exit direction; omit for the terminal room
        #[arg(long, value_enum)]
        exit: Option<DirectionArg>,

        /// Entrance slot on the entrance border (1-16); omit for random
        #[arg(long)]
        entrance: Option<u32>,

        /// Generation seed; omit for random
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        placement: PlacementArgs,

        /// Retry budget for the generate-validate loop
        #[arg(long, default_value_t = delve::limits::DEFAULT_MAX_ATTEMPTS)]
        max_attempts: u32,

        /// Write the room to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the room again with the shortest route overlaid
        #[arg(long)]
        show_route: bool,
    },

    /// Generate one 12x12 standalone maze
    Map {
        /// Generation seed; omit for random
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        placement: PlacementArgs,

        /// Write the maze to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the maze again with the shortest route overlaid
        #[arg(long)]
        show_route: bool,
    },

    /// Generate a complete 12-room dungeon
    Dungeon {
        /// Dungeon seed; omit for random
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        placement: PlacementArgs,

        /// Accept every room as generated, skipping the validation loop
        #[arg(long)]
        skip_validation: bool,

        /// Directory for room files and metadata
        #[arg(long, default_value = "maps/rooms")]
        output_dir: PathBuf,
    },

    /// Validate a grid file and print its statistics
    Validate {
        /// Grid file to check
        file: PathBuf,

        /// Print the grid with the shortest route overlaid
        #[arg(long)]
        show_route: bool,
    },

    /// Show the active tile symbol table
    Tiles,
}

/// Shared placement knobs.
#[derive(ClapArgs, Debug)]
struct PlacementArgs {
    /// Interior wall density (0.0-0.5 recommended)
    #[arg(long, default_value_t = 0.2)]
    wall_density: f64,

    /// Treasures per grid
    #[arg(long, default_value_t = 3)]
    treasures: usize,

    /// Pits per grid
    #[arg(long, default_value_t = 3)]
    pits: usize,
}

impl PlacementArgs {
    fn to_request(&self) -> PlacementRequest {
        PlacementRequest::new(self.wall_density, self.treasures, self.pits)
    }
}

/// Exit direction choices for the `room` subcommand.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum DirectionArg {
    Up,
    Down,
    Left,
    Right,
}

impl From<DirectionArg> for Direction {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Down => Direction::Down,
            DirectionArg::Left => Direction::Left,
            DirectionArg::Right => Direction::Right,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> DelveResult<()> {
    let config = match &args.tiles {
        Some(path) => io::load_tile_config(path)?,
        None => TileConfig::default(),
    };

    match args.command {
        Command::Room {
            id,
            exit,
            entrance,
            seed,
            placement,
            max_attempts,
            output,
            show_route,
        } => run_room(
            &config,
            id,
            exit.map(Direction::from),
            entrance,
            seed,
            &placement.to_request(),
            max_attempts,
            output,
            show_route,
        ),
        Command::Map {
            seed,
            placement,
            output,
            show_route,
        } => run_map(&config, seed, &placement.to_request(), output, show_route),
        Command::Dungeon {
            seed,
            placement,
            skip_validation,
            output_dir,
        } => run_dungeon(
            &config,
            seed,
            &placement.to_request(),
            !skip_validation,
            &output_dir,
        ),
        Command::Validate { file, show_route } => run_validate(&config, &file, show_route),
        Command::Tiles => {
            run_tiles(&config);
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_room(
    config: &TileConfig,
    id: u32,
    exit: Option<Direction>,
    entrance: Option<u32>,
    seed: Option<u64>,
    placement: &PlacementRequest,
    max_attempts: u32,
    output: Option<PathBuf>,
    show_route: bool,
) -> DelveResult<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let spec = RoomSpec::new(
        id,
        exit,
        DungeonGenerator::entrance_direction(id),
        entrance,
        seed,
    );

    let outcome = generate_valid_room(&spec, placement, max_attempts)?;
    info!(
        "room {id} validated on attempt {} (seed {})",
        outcome.attempts, outcome.seed
    );

    print_grid(&outcome.grid, config)?;
    print_stats(&outcome.grid);
    if show_route {
        print_route(&outcome.grid, config)?;
    }
    if let Some(path) = output {
        io::save_grid(&path, &outcome.grid, config)?;
    }
    Ok(())
}

fn run_map(
    config: &TileConfig,
    seed: Option<u64>,
    placement: &PlacementRequest,
    output: Option<PathBuf>,
    show_route: bool,
) -> DelveResult<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = rng_from_seed(seed);
    let (grid, report) = MapGenerator::new().generate_with_report(placement, &mut rng)?;
    info!(
        "maze generated (seed {seed}): {} walls, {} treasures, {} pits",
        report.walls, report.treasures, report.pits
    );

    print_grid(&grid, config)?;
    print_stats(&grid);
    if show_route {
        print_route(&grid, config)?;
    }
    if let Some(path) = output {
        io::save_grid(&path, &grid, config)?;
    }
    Ok(())
}

fn run_dungeon(
    config: &TileConfig,
    seed: Option<u64>,
    placement: &PlacementRequest,
    validate_all: bool,
    output_dir: &PathBuf,
) -> DelveResult<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let dungeon = DungeonGenerator::new(seed).generate(placement, validate_all)?;

    println!("dungeon seed: {seed}");
    for (room_id, room) in &dungeon.rooms {
        let exit = room
            .spec
            .exit_direction
            .map_or_else(|| "terminal".to_string(), |d| d.to_string());
        let status = if room.validated { "valid" } else { "unvalidated" };
        println!(
            "  room {room_id:2}: exit {exit:8} attempts {:2} {status}",
            room.attempts
        );
    }

    io::save_dungeon(output_dir, &dungeon, config)?;
    println!(
        "{} of {} rooms validated; files in {}",
        dungeon.validated_count(),
        dungeon.rooms.len(),
        output_dir.display()
    );
    Ok(())
}

fn run_validate(config: &TileConfig, file: &PathBuf, show_route: bool) -> DelveResult<()> {
    let grid = io::load_grid(file, config)?;
    print_grid(&grid, config)?;
    print_stats(&grid);
    if show_route {
        print_route(&grid, config)?;
    }
    Ok(())
}

fn run_tiles(config: &TileConfig) {
    println!("tile symbols:");
    for (kind, symbol) in config.entries() {
        println!("  {:9} {symbol}", kind.name());
    }
}

fn print_grid(grid: &Grid, config: &TileConfig) -> DelveResult<()> {
    print!("{}", io::grid_to_string(grid, config)?);
    Ok(())
}

fn print_stats(grid: &Grid) {
    let stats = room_statistics(grid);
    println!("{}x{} grid: {}", stats.size, stats.size, stats.validity);
    for (kind, count) in &stats.tile_counts {
        if *count > 0 {
            println!("  {:9} {count:3}", kind.name());
        }
    }
}

fn print_route(grid: &Grid, config: &TileConfig) -> DelveResult<()> {
    match shortest_exit_path(grid) {
        Some(route) => {
            println!("shortest route ({} cells):", route.len());
            print!("{}", io::render_with_route(grid, config, &route)?);
        }
        None => println!("no route to display"),
    }
    Ok(())
}
