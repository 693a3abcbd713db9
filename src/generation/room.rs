//! 18x18 dungeon room builder.
//!
//! A room is built in a strict phase order, and later phases never overwrite
//! what an earlier phase placed: base structure, START, GOAL (terminal rooms
//! only), the exit run, then randomly scattered walls and pickups. Fixed
//! tiles enter a reserved-position set the moment they land, which the
//! scatter passes consult before every write.

use crate::generation::{
    base_structure, scatter_tiles, GridGenerator, PlacementReport, PlacementRequest, RoomSpec,
};
use crate::grid::{Direction, Grid, Position, TileKind};
use crate::limits::{ROOM_INNER_SIZE, ROOM_SIZE};
use crate::DelveResult;
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;

/// Border slot range for entrances, exits, and the room-1 START: the 16
/// non-corner cells of an 18-cell border.
const SLOT_MIN: i32 = 1;
const SLOT_MAX: i32 = 16;

/// Placement budget for the terminal room's GOAL before falling back to a
/// fixed interior cell.
const GOAL_ATTEMPTS: u32 = 100;
const GOAL_FALLBACK: Position = Position { row: 8, col: 8 };

/// Builds one 18x18 dungeon room from a [`RoomSpec`].
///
/// # Examples
///
/// ```
/// use delve::{Direction, GridGenerator, PlacementRequest, RoomGenerator, RoomSpec, TileKind};
/// use delve::generation::rng_from_seed;
///
/// let spec = RoomSpec::new(1, Some(Direction::Right), None, None, 42);
/// let generator = RoomGenerator::new(spec).unwrap();
/// let grid = generator
///     .generate(&PlacementRequest::default(), &mut rng_from_seed(42))
///     .unwrap();
///
/// assert_eq!(grid.size(), 18);
/// assert_eq!(grid.count(TileKind::Start), 1);
/// assert_eq!(grid.count(TileKind::RoomExit), 16);
/// ```
#[derive(Debug, Clone)]
pub struct RoomGenerator {
    spec: RoomSpec,
}

impl RoomGenerator {
    /// Creates a generator for the given spec, rejecting contradictory
    /// entrance/exit geometry up front.
    pub fn new(spec: RoomSpec) -> DelveResult<Self> {
        spec.validate()?;
        Ok(Self { spec })
    }

    pub fn spec(&self) -> &RoomSpec {
        &self.spec
    }

    /// Places START on the border implied by the entrance direction.
    ///
    /// A spec without an entrance direction is the dungeon's entry room:
    /// its START lands at a uniformly random row on the left border.
    fn place_start(&self, grid: &mut Grid, rng: &mut StdRng) -> DelveResult<Position> {
        let slot = match self.spec.entrance_position {
            Some(p) => (p as i32).clamp(SLOT_MIN, SLOT_MAX),
            None => rng.gen_range(SLOT_MIN..=SLOT_MAX),
        };

        let pos = match self.spec.entrance_direction {
            None => Position::new(rng.gen_range(SLOT_MIN..=SLOT_MAX), 0),
            Some(Direction::Up) => Position::new(0, slot),
            Some(Direction::Down) => Position::new(ROOM_SIZE as i32 - 1, slot),
            Some(Direction::Left) => Position::new(slot, 0),
            Some(Direction::Right) => Position::new(slot, ROOM_SIZE as i32 - 1),
        };

        grid.set(pos, TileKind::Start)?;
        Ok(pos)
    }

    /// Places the terminal room's GOAL at a free cell in column 16,
    /// retrying at random rows before settling on the fixed fallback.
    fn place_goal(&self, grid: &mut Grid, rng: &mut StdRng) -> DelveResult<Position> {
        let col = ROOM_SIZE as i32 - 2;
        for _ in 0..GOAL_ATTEMPTS {
            let pos = Position::new(rng.gen_range(2..=15), col);
            if grid.get(pos) == Some(TileKind::Path) {
                grid.set(pos, TileKind::Goal)?;
                return Ok(pos);
            }
        }

        grid.set(GOAL_FALLBACK, TileKind::Goal)?;
        Ok(GOAL_FALLBACK)
    }

    /// Converts the full non-corner border run in the exit direction to
    /// ROOM_EXIT, returning the 16 converted positions.
    fn place_exit_run(&self, grid: &mut Grid, direction: Direction) -> DelveResult<Vec<Position>> {
        let edge = ROOM_SIZE as i32 - 1;
        let mut run = Vec::with_capacity(ROOM_INNER_SIZE);

        for slot in SLOT_MIN..=SLOT_MAX {
            let pos = match direction {
                Direction::Up => Position::new(0, slot),
                Direction::Down => Position::new(edge, slot),
                Direction::Left => Position::new(slot, 0),
                Direction::Right => Position::new(slot, edge),
            };
            grid.set(pos, TileKind::RoomExit)?;
            run.push(pos);
        }

        Ok(run)
    }
}

impl GridGenerator for RoomGenerator {
    fn generate_with_report(
        &self,
        placement: &PlacementRequest,
        rng: &mut StdRng,
    ) -> DelveResult<(Grid, PlacementReport)> {
        placement.validate()?;

        let mut grid = base_structure(ROOM_SIZE)?;
        let mut reserved: HashSet<Position> = HashSet::new();

        let start = self.place_start(&mut grid, rng)?;
        reserved.insert(start);

        // A room with no exit is the terminal room and gets the GOAL.
        if self.spec.exit_direction.is_none() {
            let goal = self.place_goal(&mut grid, rng)?;
            reserved.insert(goal);
        }

        if let Some(direction) = self.spec.exit_direction {
            for pos in self.place_exit_run(&mut grid, direction)? {
                reserved.insert(pos);
            }
        }

        let interior_max = ROOM_INNER_SIZE as i32;
        let wall_target =
            (ROOM_INNER_SIZE * ROOM_INNER_SIZE) as f64 * placement.wall_density;
        let wall_target = wall_target as usize;

        let walls = scatter_tiles(
            &mut grid,
            TileKind::Wall,
            wall_target,
            wall_target * 10,
            interior_max,
            &mut reserved,
            false,
            rng,
        )?;
        let treasures = scatter_tiles(
            &mut grid,
            TileKind::Treasure,
            placement.treasure_count,
            placement.treasure_count * 20,
            interior_max,
            &mut reserved,
            true,
            rng,
        )?;
        let pits = scatter_tiles(
            &mut grid,
            TileKind::Pit,
            placement.pit_count,
            placement.pit_count * 20,
            interior_max,
            &mut reserved,
            true,
            rng,
        )?;

        let report = PlacementReport {
            walls,
            treasures,
            pits,
        };
        debug!(
            "room {}: start ({}, {}), {} walls, {} treasures, {} pits",
            self.spec.room_id, start.row, start.col, walls, treasures, pits
        );

        Ok((grid, report))
    }

    fn generator_type(&self) -> &'static str {
        "room"
    }
}
