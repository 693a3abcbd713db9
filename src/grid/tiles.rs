//! Tile kinds and the configurable symbol table that maps each kind to
//! exactly one printable character.

use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Semantic category of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Entry tile of a grid
    Start,
    /// Target tile of the terminal room or standalone maze
    Goal,
    /// Impassable cell
    Wall,
    /// Open floor, the only kind eligible for random overwrite
    Path,
    /// Pickup that affects scoring, not movement
    Treasure,
    /// Hazard that affects scoring, not movement
    Pit,
    /// Doorway cell toward the next room
    RoomExit,
}

impl TileKind {
    /// Ordered list matching the symbol-table file format: line position
    /// implies kind. `RoomExit` is the optional seventh entry.
    pub const CONFIG_ORDER: [TileKind; 7] = [
        TileKind::Start,
        TileKind::Goal,
        TileKind::Wall,
        TileKind::Path,
        TileKind::Treasure,
        TileKind::Pit,
        TileKind::RoomExit,
    ];

    /// Whether a search may pass through this kind. Only walls block
    /// movement; treasures and pits are scoring tiles.
    pub fn is_traversable(self) -> bool {
        self != TileKind::Wall
    }

    /// Stable name used in statistics output and error messages.
    pub fn name(self) -> &'static str {
        match self {
            TileKind::Start => "START",
            TileKind::Goal => "GOAL",
            TileKind::Wall => "WALL",
            TileKind::Path => "PATH",
            TileKind::Treasure => "TREASURE",
            TileKind::Pit => "PIT",
            TileKind::RoomExit => "ROOM_EXIT",
        }
    }
}

/// Bijection between tile kinds and single-character display symbols.
///
/// Built from an ordered list of 6 (standalone maze) or 7 (dungeon) symbols.
/// Duplicates and wrong counts are rejected at construction, so a loaded
/// configuration is always safe to query for the rest of the run.
///
/// # Examples
///
/// ```
/// use delve::{TileConfig, TileKind};
///
/// let config = TileConfig::default();
/// assert_eq!(config.symbol_for(TileKind::Wall), Some('#'));
/// assert_eq!(config.kind_for('S'), Some(TileKind::Start));
/// assert_eq!(config.kind_for('?'), None);
/// ```
#[derive(Debug, Clone)]
pub struct TileConfig {
    to_symbol: HashMap<TileKind, char>,
    to_kind: HashMap<char, TileKind>,
}

/// Default symbols, in `TileKind::CONFIG_ORDER`.
pub const DEFAULT_SYMBOLS: [char; 7] = ['S', 'G', '#', '\'', 'T', 'X', 'R'];

impl TileConfig {
    /// Builds a configuration from ordered symbols, one per kind.
    ///
    /// Accepts 6 symbols (no `RoomExit`, standalone maze mode) or 7.
    pub fn from_symbols(symbols: &[char]) -> DelveResult<Self> {
        if symbols.len() != 6 && symbols.len() != 7 {
            return Err(DelveError::Config(format!(
                "expected 6 or 7 symbols, found {}",
                symbols.len()
            )));
        }

        let mut to_symbol = HashMap::new();
        let mut to_kind = HashMap::new();
        for (&kind, &symbol) in TileKind::CONFIG_ORDER.iter().zip(symbols.iter()) {
            if to_kind.insert(symbol, kind).is_some() {
                return Err(DelveError::Config(format!(
                    "duplicate symbol '{symbol}'"
                )));
            }
            to_symbol.insert(kind, symbol);
        }

        Ok(Self { to_symbol, to_kind })
    }

    /// The display symbol for a kind, `None` when the configuration was
    /// loaded without that kind (a 6-symbol table has no `RoomExit`).
    pub fn symbol_for(&self, kind: TileKind) -> Option<char> {
        self.to_symbol.get(&kind).copied()
    }

    /// The kind behind a symbol, `None` for unknown characters.
    pub fn kind_for(&self, symbol: char) -> Option<TileKind> {
        self.to_kind.get(&symbol).copied()
    }

    /// Whether the symbol belongs to the configuration.
    pub fn is_known(&self, symbol: char) -> bool {
        self.to_kind.contains_key(&symbol)
    }

    /// Every configured (kind, symbol) pair in `CONFIG_ORDER`.
    pub fn entries(&self) -> Vec<(TileKind, char)> {
        TileKind::CONFIG_ORDER
            .iter()
            .filter_map(|&kind| self.symbol_for(kind).map(|s| (kind, s)))
            .collect()
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        // DEFAULT_SYMBOLS are distinct and complete, so this cannot fail.
        let mut to_symbol = HashMap::new();
        let mut to_kind = HashMap::new();
        for (&kind, &symbol) in TileKind::CONFIG_ORDER.iter().zip(DEFAULT_SYMBOLS.iter()) {
            to_symbol.insert(kind, symbol);
            to_kind.insert(symbol, kind);
        }
        Self { to_symbol, to_kind }
    }
}
