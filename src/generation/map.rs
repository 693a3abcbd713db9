//! 12x12 standalone maze builder.
//!
//! Unlike dungeon rooms, the standalone maze pins START and GOAL to fixed
//! border cells so every maze runs bottom-to-top; only the walls and
//! pickups vary with the seed.

use crate::generation::{
    base_structure, scatter_tiles, GridGenerator, PlacementReport, PlacementRequest,
};
use crate::grid::{Grid, Position, TileKind};
use crate::limits::{MAP_INNER_SIZE, MAP_SIZE};
use crate::DelveResult;
use log::debug;
use rand::rngs::StdRng;
use std::collections::HashSet;

/// Fixed START cell, bottom border.
pub const MAP_START: Position = Position { row: 11, col: 1 };

/// Fixed GOAL cell, top border.
pub const MAP_GOAL: Position = Position { row: 0, col: 10 };

/// Builds the 12x12 standalone maze.
#[derive(Debug, Clone, Default)]
pub struct MapGenerator;

impl MapGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl GridGenerator for MapGenerator {
    fn generate_with_report(
        &self,
        placement: &PlacementRequest,
        rng: &mut StdRng,
    ) -> DelveResult<(Grid, PlacementReport)> {
        placement.validate()?;

        let mut grid = base_structure(MAP_SIZE)?;
        grid.set(MAP_START, TileKind::Start)?;
        grid.set(MAP_GOAL, TileKind::Goal)?;

        let mut reserved: HashSet<Position> = [MAP_START, MAP_GOAL].into_iter().collect();

        let interior_max = MAP_INNER_SIZE as i32;
        let wall_target =
            ((MAP_INNER_SIZE * MAP_INNER_SIZE) as f64 * placement.wall_density) as usize;

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
            "map: {} walls, {} treasures, {} pits",
            walls, treasures, pits
        );

        Ok((grid, report))
    }

    fn generator_type(&self) -> &'static str {
        "map"
    }
}
