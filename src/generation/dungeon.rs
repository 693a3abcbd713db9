//! 12-room dungeon orchestration.
//!
//! The dungeon is a fixed 3x4 layout traversed 1→2→…→12:
//!
//! ```text
//! [ 1,  2,  3,  4]
//! [ 8,  7,  6,  5]
//! [ 9, 10, 11, 12]
//! ```
//!
//! Each room's exit direction comes from a fixed table; its entrance
//! direction is the inverse of the previous room's exit, so consecutive
//! rooms always share a doorway border. All per-room randomness derives
//! from the single dungeon seed.

use crate::generation::retry::generate_room_best_effort;
use crate::generation::{
    rng_from_seed, GridGenerator, PlacementRequest, RoomGenerator, RoomSpec,
};
use crate::grid::{Direction, Grid};
use crate::limits::{DEFAULT_MAX_ATTEMPTS, ROOM_COUNT};
use crate::{DelveError, DelveResult};
use log::{info, warn};
use rand::Rng;
use std::collections::BTreeMap;

/// Room ids by layout position, three rows of four.
pub const LAYOUT: [[u32; 4]; 3] = [[1, 2, 3, 4], [8, 7, 6, 5], [9, 10, 11, 12]];

/// Spacing between consecutive room seeds in the dungeon seed space.
const ROOM_SEED_STRIDE: u64 = 1000;

/// One accepted room of a generated dungeon.
#[derive(Debug, Clone)]
pub struct DungeonRoom {
    pub spec: RoomSpec,
    pub grid: Grid,
    /// Whether the room passed connectivity validation. Always `false` when
    /// the dungeon was generated without validation.
    pub validated: bool,
    /// Generation attempts spent on this room.
    pub attempts: u32,
}

/// A fully generated dungeon: 12 rooms keyed by id.
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub seed: u64,
    pub rooms: BTreeMap<u32, DungeonRoom>,
}

impl Dungeon {
    pub fn room(&self, room_id: u32) -> Option<&DungeonRoom> {
        self.rooms.get(&room_id)
    }

    /// Number of rooms that passed validation.
    pub fn validated_count(&self) -> usize {
        self.rooms.values().filter(|room| room.validated).count()
    }
}

/// Drives 12 room generations from a single dungeon seed.
///
/// # Examples
///
/// ```
/// use delve::{DungeonGenerator, PlacementRequest, TileKind};
///
/// let dungeon = DungeonGenerator::new(42)
///     .generate(&PlacementRequest::default(), true)
///     .unwrap();
///
/// assert_eq!(dungeon.rooms.len(), 12);
/// let last = dungeon.room(12).unwrap();
/// assert_eq!(last.grid.count(TileKind::Goal), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    seed: u64,
}

impl DungeonGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Exit direction for a room id along the fixed traversal, `None` for
    /// the terminal room.
    pub fn exit_direction(room_id: u32) -> Option<Direction> {
        match room_id {
            1..=3 => Some(Direction::Right),
            4 => Some(Direction::Down),
            5..=7 => Some(Direction::Left),
            8 => Some(Direction::Down),
            9..=11 => Some(Direction::Right),
            _ => None,
        }
    }

    /// Entrance direction: the inverse of the previous room's exit.
    /// Room 1 has no entrance constraint.
    pub fn entrance_direction(room_id: u32) -> Option<Direction> {
        if room_id <= 1 {
            None
        } else {
            Self::exit_direction(room_id - 1).map(Direction::opposite)
        }
    }

    /// Border slot for the room's START, drawn from a dedicated RNG seeded
    /// with `dungeon_seed + room_id` so the choice is independent of the
    /// wall and pickup randomness.
    fn entrance_position(&self, room_id: u32) -> Option<u32> {
        if room_id <= 1 {
            return None;
        }
        let mut rng = rng_from_seed(self.seed.wrapping_add(room_id as u64));
        Some(rng.gen_range(1..=16))
    }

    /// Generation seed for one room.
    fn room_seed(&self, room_id: u32) -> u64 {
        self.seed.wrapping_add(room_id as u64 * ROOM_SEED_STRIDE)
    }

    /// Computes the full structural spec for one room of this dungeon.
    pub fn room_spec(&self, room_id: u32) -> DelveResult<RoomSpec> {
        if room_id < 1 || room_id > ROOM_COUNT {
            return Err(DelveError::InvalidParameter(format!(
                "room id {room_id} outside 1..={ROOM_COUNT}"
            )));
        }
        Ok(RoomSpec::new(
            room_id,
            Self::exit_direction(room_id),
            Self::entrance_direction(room_id),
            self.entrance_position(room_id),
            self.room_seed(room_id),
        ))
    }

    /// Generates all 12 rooms in traversal order.
    ///
    /// With `validate_all`, each room runs through the retry loop with the
    /// default 50-attempt budget; a room that exhausts its budget is kept
    /// anyway, marked unvalidated, and the run continues. Without it, each
    /// room is generated exactly once and accepted as-is.
    pub fn generate(
        &self,
        placement: &PlacementRequest,
        validate_all: bool,
    ) -> DelveResult<Dungeon> {
        info!("generating dungeon (seed {})", self.seed);
        let mut rooms = BTreeMap::new();

        for room_id in 1..=ROOM_COUNT {
            let spec = self.room_spec(room_id)?;

            let room = if validate_all {
                let outcome = generate_room_best_effort(&spec, placement, DEFAULT_MAX_ATTEMPTS)?;
                if !outcome.validity.is_valid() {
                    warn!(
                        "room {room_id} not validated after {} attempts; keeping best effort",
                        outcome.attempts
                    );
                }
                DungeonRoom {
                    validated: outcome.validity.is_valid(),
                    attempts: outcome.attempts,
                    grid: outcome.grid,
                    spec,
                }
            } else {
                let mut rng = rng_from_seed(spec.seed);
                let grid = RoomGenerator::new(spec.clone())?.generate(placement, &mut rng)?;
                DungeonRoom {
                    grid,
                    validated: false,
                    attempts: 1,
                    spec,
                }
            };

            rooms.insert(room_id, room);
        }

        info!(
            "dungeon complete: {} rooms, {} validated",
            rooms.len(),
            rooms.values().filter(|room| room.validated).count()
        );
        Ok(Dungeon {
            seed: self.seed,
            rooms,
        })
    }
}
