//! # Delve
//!
//! A procedural dungeon grid generator with BFS connectivity validation.
//!
//! ## Architecture Overview
//!
//! Delve builds rectangular tile grids ("rooms") and proves that each one can
//! actually be traversed before handing it to a caller:
//!
//! - **Grid Model**: square matrices of tile kinds with a configurable
//!   symbol table for text serialization
//! - **Generation System**: seed-driven, phase-ordered placement of
//!   structural and special tiles over a reserved-position set
//! - **Validation System**: breadth-first search deciding reachability from
//!   the START tile to the GOAL or to any room exit
//! - **Orchestration**: a bounded retry loop per room, plus a 12-room
//!   dungeon driver that keeps entrance/exit geometry consistent between
//!   consecutive rooms
//!
//! All randomness flows through explicit [`rand::rngs::StdRng`] values
//! constructed from caller-supplied seeds, so generation is reproducible.

pub mod generation;
pub mod grid;
pub mod io;
pub mod validation;

pub use generation::{
    generate_valid_room, DungeonGenerator, GridGenerator, MapGenerator, PlacementReport,
    PlacementRequest, RetryOutcome, RoomGenerator, RoomSpec,
};
pub use grid::{Direction, Grid, Position, TileConfig, TileKind};
pub use validation::{validate_room, RoomStats, RoomValidity};

/// Core error type for the Delve crate.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Malformed or duplicate tile symbol table
    #[error("invalid tile configuration: {0}")]
    Config(String),

    /// A grid symbol that the tile configuration does not know
    #[error("unknown tile symbol '{0}'")]
    UnknownSymbol(char),

    /// Caller-supplied count, id, or position is out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The retry loop could not produce a valid room within its budget
    #[error("no valid grid for room {room_id} after {attempts} attempts")]
    RetryExhausted { room_id: u32, attempts: u32 },
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed dimensions and budgets for grid generation.
pub mod limits {
    /// Side length of a dungeon room grid
    pub const ROOM_SIZE: usize = 18;

    /// Side length of the room interior (border ring excluded)
    pub const ROOM_INNER_SIZE: usize = 16;

    /// Side length of a standalone maze grid
    pub const MAP_SIZE: usize = 12;

    /// Side length of the standalone maze interior
    pub const MAP_INNER_SIZE: usize = 10;

    /// Number of rooms in a full dungeon
    pub const ROOM_COUNT: u32 = 12;

    /// Default retry budget for the generate-validate loop
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 50;
}
