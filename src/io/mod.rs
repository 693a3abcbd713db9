//! # IO Module
//!
//! Text serialization of grids and the on-disk layout of a generated
//! dungeon.
//!
//! A grid serializes as N lines of N symbols with no delimiters, one symbol
//! per cell through the [`TileConfig`] table; deserialization is the exact
//! inverse, so round-trips are lossless. Dungeon runs additionally write a
//! JSON metadata file describing every room.

use crate::generation::{Dungeon, RoomSpec};
use crate::grid::{Direction, Grid, Position, TileConfig, TileKind};
use crate::validation::room_statistics;
use crate::{DelveError, DelveResult};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serializes a grid to row-per-line text.
pub fn grid_to_string(grid: &Grid, config: &TileConfig) -> DelveResult<String> {
    let mut out = String::with_capacity(grid.size() * (grid.size() + 1));
    for row in grid.rows() {
        for &kind in row {
            let symbol = config.symbol_for(kind).ok_or_else(|| {
                DelveError::Config(format!("no symbol configured for {}", kind.name()))
            })?;
            out.push(symbol);
        }
        out.push('\n');
    }
    Ok(out)
}

/// Parses row-per-line text back into a grid.
///
/// Blank lines are ignored; unknown symbols and ragged rows are errors.
pub fn grid_from_str(text: &str, config: &TileConfig) -> DelveResult<Grid> {
    let mut rows = Vec::new();
    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        let row = line
            .chars()
            .map(|symbol| {
                config
                    .kind_for(symbol)
                    .ok_or(DelveError::UnknownSymbol(symbol))
            })
            .collect::<DelveResult<Vec<TileKind>>>()?;
        rows.push(row);
    }
    Grid::from_rows(rows)
}

/// Writes a grid to a file, creating parent directories as needed.
pub fn save_grid(path: &Path, grid: &Grid, config: &TileConfig) -> DelveResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, grid_to_string(grid, config)?)?;
    info!("saved grid to {}", path.display());
    Ok(())
}

/// Reads a grid from a file.
pub fn load_grid(path: &Path, config: &TileConfig) -> DelveResult<Grid> {
    let text = fs::read_to_string(path)?;
    grid_from_str(&text, config)
}

/// Loads a tile symbol table: one symbol per line, 6 or 7 non-blank lines,
/// line position implying the tile kind.
pub fn load_tile_config(path: &Path) -> DelveResult<TileConfig> {
    let text = fs::read_to_string(path)?;
    let mut symbols = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut chars = line.chars();
        let symbol = chars.next().ok_or_else(|| {
            DelveError::Config("blank symbol line".to_string())
        })?;
        if chars.next().is_some() {
            return Err(DelveError::Config(format!(
                "symbol line '{line}' is longer than one character"
            )));
        }
        symbols.push(symbol);
    }
    TileConfig::from_symbols(&symbols)
}

/// Marker for route cells in [`render_with_route`] output.
const ROUTE_MARKER: char = '\u{b7}'; // '·'

/// Renders a grid with a route overlaid as `·` marks.
///
/// START, GOAL, and ROOM_EXIT cells keep their own symbols so the
/// endpoints stay visible.
pub fn render_with_route(
    grid: &Grid,
    config: &TileConfig,
    route: &[Position],
) -> DelveResult<String> {
    let mut rendered: Vec<Vec<char>> = Vec::with_capacity(grid.size());
    for row in grid.rows() {
        let mut line = Vec::with_capacity(grid.size());
        for &kind in row {
            let symbol = config.symbol_for(kind).ok_or_else(|| {
                DelveError::Config(format!("no symbol configured for {}", kind.name()))
            })?;
            line.push(symbol);
        }
        rendered.push(line);
    }

    for &pos in route {
        let keep = matches!(
            grid.get(pos),
            Some(TileKind::Start) | Some(TileKind::Goal) | Some(TileKind::RoomExit)
        );
        if !keep && grid.contains(pos) {
            rendered[pos.row as usize][pos.col as usize] = ROUTE_MARKER;
        }
    }

    let mut out = String::new();
    for line in rendered {
        out.extend(line);
        out.push('\n');
    }
    Ok(out)
}

/// Per-room entry of the dungeon metadata file.
#[derive(Debug, Serialize)]
pub struct RoomMetadata {
    pub room_id: u32,
    pub seed: u64,
    pub exit_direction: Option<Direction>,
    pub entrance_direction: Option<Direction>,
    pub entrance_position: Option<u32>,
    pub validated: bool,
    pub attempts: u32,
    pub start: Option<Position>,
    pub goal: Option<Position>,
    pub exit_cells: usize,
    pub path_cells: Option<usize>,
}

impl RoomMetadata {
    fn from_room(spec: &RoomSpec, grid: &Grid, validated: bool, attempts: u32) -> Self {
        let stats = room_statistics(grid);
        Self {
            room_id: spec.room_id,
            seed: spec.seed,
            exit_direction: spec.exit_direction,
            entrance_direction: spec.entrance_direction,
            entrance_position: spec.entrance_position,
            validated,
            attempts,
            start: grid.find_first(TileKind::Start),
            goal: grid.find_first(TileKind::Goal),
            exit_cells: grid.count(TileKind::RoomExit),
            path_cells: stats.path_cells(),
        }
    }
}

/// Top-level dungeon metadata, written as `dungeon.json`.
#[derive(Debug, Serialize)]
pub struct DungeonMetadata {
    pub seed: u64,
    pub layout: [[u32; 4]; 3],
    pub rooms: Vec<RoomMetadata>,
}

impl DungeonMetadata {
    pub fn from_dungeon(dungeon: &Dungeon) -> Self {
        let rooms = dungeon
            .rooms
            .values()
            .map(|room| {
                RoomMetadata::from_room(&room.spec, &room.grid, room.validated, room.attempts)
            })
            .collect();
        Self {
            seed: dungeon.seed,
            layout: crate::generation::dungeon::LAYOUT,
            rooms,
        }
    }
}

/// Writes every room of a dungeon to `room_NN.txt` files under `dir`, plus
/// a `dungeon.json` metadata file and a `dungeon_full.txt` composite.
pub fn save_dungeon(dir: &Path, dungeon: &Dungeon, config: &TileConfig) -> DelveResult<()> {
    fs::create_dir_all(dir)?;

    for (&room_id, room) in &dungeon.rooms {
        let path = dir.join(format!("room_{room_id:02}.txt"));
        save_grid(&path, &room.grid, config)?;
    }

    let metadata = DungeonMetadata::from_dungeon(dungeon);
    let json = serde_json::to_string_pretty(&metadata)?;
    fs::write(dir.join("dungeon.json"), json)?;

    assemble_dungeon(&dir.join("dungeon_full.txt"), dungeon, config)?;

    info!(
        "saved {} rooms and metadata to {}",
        dungeon.rooms.len(),
        dir.display()
    );
    Ok(())
}

/// Assembles every room into one text file, grouped by the rows of the
/// dungeon layout so the traversal order reads top to bottom.
pub fn assemble_dungeon(path: &Path, dungeon: &Dungeon, config: &TileConfig) -> DelveResult<()> {
    let mut out = String::new();
    let rule = "=".repeat(60);
    out.push_str(&format!(
        "{rule}\n  dungeon seed: {}\n  rooms: {}/{}\n{rule}\n\n",
        dungeon.seed,
        dungeon.rooms.len(),
        crate::limits::ROOM_COUNT
    ));

    for (row_index, row) in crate::generation::dungeon::LAYOUT.iter().enumerate() {
        out.push_str(&format!("--- row {} ---\n\n", row_index + 1));
        for &room_id in row {
            let room = match dungeon.room(room_id) {
                Some(room) => room,
                None => continue,
            };
            out.push_str(&format!("room {room_id}:\n"));
            out.push_str(&grid_to_string(&room.grid, config)?);
            out.push('\n');
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, out)?;
    info!("assembled dungeon to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{rng_from_seed, GridGenerator, MapGenerator, PlacementRequest};

    #[test]
    fn test_round_trip_is_lossless() {
        let config = TileConfig::default();
        let grid = MapGenerator::new()
            .generate(&PlacementRequest::new(0.3, 3, 3), &mut rng_from_seed(21))
            .unwrap();

        let text = grid_to_string(&grid, &config).unwrap();
        let restored = grid_from_str(&text, &config).unwrap();
        assert_eq!(grid, restored);
    }

    #[test]
    fn test_serialized_shape() {
        let config = TileConfig::default();
        let grid = Grid::filled(4, TileKind::Path);
        let text = grid_to_string(&grid, &config).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|line| line.chars().count() == 4));
        assert!(lines.iter().all(|line| line.chars().all(|c| c == '\'')));
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let config = TileConfig::default();
        let result = grid_from_str("##\n#?\n", &config);
        assert!(matches!(result, Err(DelveError::UnknownSymbol('?'))));
    }

    #[test]
    fn test_ragged_input_rejected() {
        let config = TileConfig::default();
        assert!(grid_from_str("###\n##\n###\n", &config).is_err());
    }

    #[test]
    fn test_route_overlay_keeps_endpoints() {
        let config = TileConfig::default();
        let mut grid = Grid::filled(4, TileKind::Path);
        grid.set(Position::new(1, 0), TileKind::Start).unwrap();
        grid.set(Position::new(1, 3), TileKind::Goal).unwrap();

        let route = vec![
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(1, 2),
            Position::new(1, 3),
        ];
        let text = render_with_route(&grid, &config, &route).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(line, "S\u{b7}\u{b7}G");
    }

    #[test]
    fn test_six_symbol_config_cannot_serialize_exits() {
        let config = TileConfig::from_symbols(&['S', 'G', '#', '.', 'T', 'X']).unwrap();
        let mut grid = Grid::filled(3, TileKind::Path);
        grid.set(Position::new(1, 1), TileKind::RoomExit).unwrap();
        assert!(matches!(
            grid_to_string(&grid, &config),
            Err(DelveError::Config(_))
        ));
    }
}
