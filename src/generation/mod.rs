//! # Generation Module
//!
//! Seed-driven grid construction.
//!
//! Every generator takes an explicit [`StdRng`] rather than touching any
//! process-global randomness, so the same seed and arguments always
//! reproduce the same grid bit-for-bit. Callers build the source with
//! [`rng_from_seed`].

pub mod dungeon;
pub mod map;
pub mod retry;
pub mod room;

pub use dungeon::{Dungeon, DungeonGenerator, DungeonRoom};
pub use map::MapGenerator;
pub use retry::{generate_valid_room, RetryOutcome};
pub use room::RoomGenerator;

use crate::grid::{Direction, Grid, Position, TileKind};
use crate::{DelveError, DelveResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Creates a seeded random number generator for a generation run.
pub fn rng_from_seed(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Density and count knobs for the random placement passes.
///
/// All counts are advisory: placement is rejection-sampled with a bounded
/// attempt budget, so grids may come out with fewer walls or pickups than
/// requested. [`PlacementReport`] carries the achieved counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlacementRequest {
    /// Fraction of interior cells to convert to walls (0.0 to 1.0,
    /// 0.0 to 0.5 recommended)
    pub wall_density: f64,
    /// Number of treasure tiles to place
    pub treasure_count: usize,
    /// Number of pit tiles to place
    pub pit_count: usize,
}

impl PlacementRequest {
    pub fn new(wall_density: f64, treasure_count: usize, pit_count: usize) -> Self {
        Self {
            wall_density,
            treasure_count,
            pit_count,
        }
    }

    /// Rejects densities outside 0.0..=1.0.
    pub fn validate(&self) -> DelveResult<()> {
        if !(0.0..=1.0).contains(&self.wall_density) || self.wall_density.is_nan() {
            return Err(DelveError::InvalidParameter(format!(
                "wall density {} outside 0.0..=1.0",
                self.wall_density
            )));
        }
        Ok(())
    }
}

impl Default for PlacementRequest {
    fn default() -> Self {
        Self::new(0.2, 3, 3)
    }
}

/// Achieved placement counts for one generated grid.
///
/// Each value is at most what the [`PlacementRequest`] asked for; the
/// shortfall is the documented best-effort behavior of rejection sampling,
/// not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlacementReport {
    pub walls: usize,
    pub treasures: usize,
    pub pits: usize,
}

/// Structural parameters of one dungeon room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSpec {
    /// Room identifier, 1..=12 in dungeon mode
    pub room_id: u32,
    /// Border to open toward the next room; `None` marks the terminal room,
    /// which receives a GOAL tile instead
    pub exit_direction: Option<Direction>,
    /// Side the agent arrives from; `None` marks the dungeon entry room,
    /// whose START lands at a random row on the left border
    pub entrance_direction: Option<Direction>,
    /// Border slot for the START tile (clamped to 1..=16); `None` means a
    /// uniform random draw
    pub entrance_position: Option<u32>,
    /// Seed for the generation run
    pub seed: u64,
}

impl RoomSpec {
    pub fn new(
        room_id: u32,
        exit_direction: Option<Direction>,
        entrance_direction: Option<Direction>,
        entrance_position: Option<u32>,
        seed: u64,
    ) -> Self {
        Self {
            room_id,
            exit_direction,
            entrance_direction,
            entrance_position,
            seed,
        }
    }

    /// Checks the spec for contradictions before any tile is placed.
    pub fn validate(&self) -> DelveResult<()> {
        if self.room_id < 1 || self.room_id > crate::limits::ROOM_COUNT {
            return Err(DelveError::InvalidParameter(format!(
                "room id {} outside 1..={}",
                self.room_id,
                crate::limits::ROOM_COUNT
            )));
        }
        match (self.entrance_direction, self.exit_direction) {
            // The exit run would overwrite the START tile on a shared border.
            (Some(entrance), Some(exit)) if entrance == exit => {
                Err(DelveError::InvalidParameter(format!(
                    "entrance and exit cannot share the {entrance} border"
                )))
            }
            // The entry room's START always sits on the left border.
            (None, Some(Direction::Left)) => Err(DelveError::InvalidParameter(
                "a room without an entrance places START on the left border; \
                 it cannot also exit left"
                    .to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Common surface of the grid builders.
///
/// Implementations construct a complete grid in one call; the RNG is the
/// only source of variation between runs with identical arguments.
pub trait GridGenerator {
    /// Builds a grid and reports the achieved placement counts.
    fn generate_with_report(
        &self,
        placement: &PlacementRequest,
        rng: &mut StdRng,
    ) -> DelveResult<(Grid, PlacementReport)>;

    /// Generator name for logging and diagnostics.
    fn generator_type(&self) -> &'static str;

    /// Builds a grid, discarding the placement report.
    fn generate(&self, placement: &PlacementRequest, rng: &mut StdRng) -> DelveResult<Grid> {
        Ok(self.generate_with_report(placement, rng)?.0)
    }
}

/// Converts interior PATH cells to `kind` by rejection sampling.
///
/// Samples uniform positions in `1..=interior_max` on both axes until
/// `target` cells are converted or `max_attempts` samples have been spent,
/// whichever comes first. A cell qualifies only while it is PATH and not in
/// the reserved set; with `reserve_placed` every converted cell joins the
/// reserved set, which is how pickups are kept from stacking. Returns the
/// achieved count.
pub(crate) fn scatter_tiles(
    grid: &mut Grid,
    kind: TileKind,
    target: usize,
    max_attempts: usize,
    interior_max: i32,
    reserved: &mut HashSet<Position>,
    reserve_placed: bool,
    rng: &mut StdRng,
) -> DelveResult<usize> {
    let mut placed = 0;
    let mut attempts = 0;

    while placed < target && attempts < max_attempts {
        let pos = Position::new(
            rng.gen_range(1..=interior_max),
            rng.gen_range(1..=interior_max),
        );

        if !reserved.contains(&pos) && grid.get(pos) == Some(TileKind::Path) {
            grid.set(pos, kind)?;
            if reserve_placed {
                reserved.insert(pos);
            }
            placed += 1;
        }

        attempts += 1;
    }

    Ok(placed)
}

/// Fills a fresh grid: PATH interior surrounded by a WALL ring.
pub(crate) fn base_structure(size: usize) -> DelveResult<Grid> {
    let mut grid = Grid::filled(size, TileKind::Path);
    for pos in grid.positions().collect::<Vec<_>>() {
        if grid.is_border(pos) {
            grid.set(pos, TileKind::Wall)?;
        }
    }
    Ok(grid)
}
