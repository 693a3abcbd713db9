//! # Validation Module
//!
//! Breadth-first connectivity checks over immutable grids.
//!
//! The search is 4-connected (no diagonals), treats every tile except WALL
//! as traversable, and marks cells visited the moment they are enqueued, so
//! the first recorded distance to any cell is its shortest-path distance.

use crate::grid::{Grid, Position, TileKind};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// Outcome of validating a single room grid.
///
/// The invalid variants are reported distinctly so callers can tell a
/// malformed grid (missing tiles) from a merely unlucky one (no path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum RoomValidity {
    /// A path exists; `path_cells` counts visited cells including both
    /// endpoints, so moves = path_cells - 1.
    Valid { path_cells: usize },
    /// The grid has no START tile.
    MissingStart,
    /// The grid has neither a GOAL nor any ROOM_EXIT to reach.
    MissingTarget,
    /// Targets exist but none is reachable from START.
    NoPath,
}

impl RoomValidity {
    /// Whether the room passed validation.
    pub fn is_valid(&self) -> bool {
        matches!(self, RoomValidity::Valid { .. })
    }
}

impl std::fmt::Display for RoomValidity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomValidity::Valid { path_cells } => {
                write!(f, "valid ({} cells on the shortest path)", path_cells)
            }
            RoomValidity::MissingStart => write!(f, "invalid: no START tile"),
            RoomValidity::MissingTarget => write!(f, "invalid: no GOAL or ROOM_EXIT tiles"),
            RoomValidity::NoPath => write!(f, "invalid: no path from START to any target"),
        }
    }
}

/// Returns the number of moves on a shortest path from `from` to `to`,
/// or `None` when `to` is unreachable.
pub fn distance_between(grid: &Grid, from: Position, to: Position) -> Option<u32> {
    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();

    queue.push_back((from, 0u32));
    visited.insert(from);

    while let Some((current, distance)) = queue.pop_front() {
        if current == to {
            return Some(distance);
        }
        for neighbor in current.cardinal_neighbors() {
            if grid.is_traversable(neighbor) && visited.insert(neighbor) {
                queue.push_back((neighbor, distance + 1));
            }
        }
    }

    None
}

/// Whether any path exists from `from` to `to`.
pub fn is_reachable(grid: &Grid, from: Position, to: Position) -> bool {
    distance_between(grid, from, to).is_some()
}

/// Whether any member of `targets` is reachable from `from`.
pub fn is_reachable_to_any(grid: &Grid, from: Position, targets: &[Position]) -> bool {
    targets.iter().any(|&target| is_reachable(grid, from, target))
}

/// Returns the shortest path from `from` to `to` as a sequence of positions
/// inclusive of both endpoints, or `None` when unreachable.
pub fn shortest_path(grid: &Grid, from: Position, to: Position) -> Option<Vec<Position>> {
    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();

    queue.push_back(from);
    visited.insert(from);

    while let Some(current) = queue.pop_front() {
        if current == to {
            return Some(reconstruct_path(&came_from, from, to));
        }
        for neighbor in current.cardinal_neighbors() {
            if grid.is_traversable(neighbor) && visited.insert(neighbor) {
                came_from.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    None
}

fn reconstruct_path(
    came_from: &HashMap<Position, Position>,
    from: Position,
    to: Position,
) -> Vec<Position> {
    let mut path = vec![to];
    let mut current = to;
    while current != from {
        // Every non-start node on a found path has a recorded predecessor.
        let previous = match came_from.get(&current) {
            Some(&previous) => previous,
            None => {
                debug_assert!(false, "no predecessor recorded for {current:?}");
                break;
            }
        };
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}

/// Every position reachable from `from`, including `from` itself.
pub fn reachable_from(grid: &Grid, from: Position) -> HashSet<Position> {
    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();

    queue.push_back(from);
    visited.insert(from);

    while let Some(current) = queue.pop_front() {
        for neighbor in current.cardinal_neighbors() {
            if grid.is_traversable(neighbor) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    visited
}

/// Shortest path from the START tile to the room's target: the GOAL when
/// one exists, otherwise the closest ROOM_EXIT cell.
///
/// With multiple exits, every candidate is searched and the minimum-length
/// path kept; ties go to the earlier candidate in row-major order.
pub fn shortest_exit_path(grid: &Grid) -> Option<Vec<Position>> {
    let start = grid.find_first(TileKind::Start)?;

    if let Some(goal) = grid.find_first(TileKind::Goal) {
        return shortest_path(grid, start, goal);
    }

    let mut best: Option<Vec<Position>> = None;
    for exit in grid.find_all(TileKind::RoomExit) {
        if let Some(path) = shortest_path(grid, start, exit) {
            let shorter = best.as_ref().map_or(true, |b| path.len() < b.len());
            if shorter {
                best = Some(path);
            }
        }
    }
    best
}

/// Decides whether a room grid is traversable.
///
/// A grid with a GOAL must connect START to the GOAL; otherwise START must
/// reach at least one ROOM_EXIT cell.
pub fn validate_room(grid: &Grid) -> RoomValidity {
    let start = match grid.find_first(TileKind::Start) {
        Some(pos) => pos,
        None => return RoomValidity::MissingStart,
    };

    if let Some(goal) = grid.find_first(TileKind::Goal) {
        return match shortest_path(grid, start, goal) {
            Some(path) => RoomValidity::Valid {
                path_cells: path.len(),
            },
            None => RoomValidity::NoPath,
        };
    }

    let exits = grid.find_all(TileKind::RoomExit);
    if exits.is_empty() {
        return RoomValidity::MissingTarget;
    }

    match shortest_exit_path(grid) {
        Some(path) => RoomValidity::Valid {
            path_cells: path.len(),
        },
        None => RoomValidity::NoPath,
    }
}

/// Tile census and validity verdict for one grid.
#[derive(Debug, Clone, Serialize)]
pub struct RoomStats {
    pub validity: RoomValidity,
    pub size: usize,
    /// Count per tile kind, in `TileKind::CONFIG_ORDER`.
    pub tile_counts: Vec<(TileKind, usize)>,
}

impl RoomStats {
    /// Shortest-path cell count when the room validated.
    pub fn path_cells(&self) -> Option<usize> {
        match self.validity {
            RoomValidity::Valid { path_cells } => Some(path_cells),
            _ => None,
        }
    }
}

/// Gathers statistics for a grid: validity, dimensions, and tile counts.
pub fn room_statistics(grid: &Grid) -> RoomStats {
    let tile_counts = TileKind::CONFIG_ORDER
        .iter()
        .map(|&kind| (kind, grid.count(kind)))
        .collect();

    RoomStats {
        validity: validate_room(grid),
        size: grid.size(),
        tile_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(size: usize) -> Grid {
        let mut grid = Grid::filled(size, TileKind::Path);
        for pos in grid.positions().collect::<Vec<_>>() {
            if grid.is_border(pos) {
                grid.set(pos, TileKind::Wall).unwrap();
            }
        }
        grid
    }

    #[test]
    fn test_open_grid_distance_is_manhattan() {
        let grid = open_grid(10);
        let from = Position::new(1, 1);
        let to = Position::new(8, 6);
        assert_eq!(
            distance_between(&grid, from, to),
            Some(from.manhattan_distance(to))
        );

        let path = shortest_path(&grid, from, to).unwrap();
        assert_eq!(path.len() as u32, from.manhattan_distance(to) + 1);
        assert_eq!(path[0], from);
        assert_eq!(*path.last().unwrap(), to);
    }

    #[test]
    fn test_path_steps_are_adjacent() {
        let grid = open_grid(8);
        let path = shortest_path(&grid, Position::new(1, 1), Position::new(6, 6)).unwrap();
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
        }
    }

    #[test]
    fn test_wall_line_blocks_search() {
        let mut grid = open_grid(8);
        // Full vertical wall between columns 3 and 5.
        for row in 1..7 {
            grid.set(Position::new(row, 4), TileKind::Wall).unwrap();
        }
        assert!(!is_reachable(&grid, Position::new(3, 2), Position::new(3, 6)));
        assert_eq!(shortest_path(&grid, Position::new(3, 2), Position::new(3, 6)), None);
    }

    #[test]
    fn test_detour_longer_than_manhattan() {
        let mut grid = open_grid(8);
        // Wall with a single gap at the bottom.
        for row in 1..6 {
            grid.set(Position::new(row, 4), TileKind::Wall).unwrap();
        }
        let from = Position::new(1, 2);
        let to = Position::new(1, 6);
        let distance = distance_between(&grid, from, to).unwrap();
        assert!(distance > from.manhattan_distance(to));
    }

    #[test]
    fn test_treasures_and_pits_are_traversable() {
        let mut grid = open_grid(6);
        grid.set(Position::new(2, 2), TileKind::Treasure).unwrap();
        grid.set(Position::new(2, 3), TileKind::Pit).unwrap();
        assert!(is_reachable(&grid, Position::new(2, 1), Position::new(2, 4)));
        assert_eq!(
            distance_between(&grid, Position::new(2, 1), Position::new(2, 4)),
            Some(3)
        );
    }

    #[test]
    fn test_validate_room_missing_start() {
        let grid = open_grid(6);
        assert_eq!(validate_room(&grid), RoomValidity::MissingStart);
    }

    #[test]
    fn test_validate_room_missing_target() {
        let mut grid = open_grid(6);
        grid.set(Position::new(2, 0), TileKind::Start).unwrap();
        assert_eq!(validate_room(&grid), RoomValidity::MissingTarget);
    }

    #[test]
    fn test_validate_room_walled_off_goal() {
        let mut grid = open_grid(8);
        grid.set(Position::new(4, 0), TileKind::Start).unwrap();
        grid.set(Position::new(2, 6), TileKind::Goal).unwrap();
        // Box the goal in completely.
        for pos in [
            Position::new(1, 5),
            Position::new(1, 6),
            Position::new(2, 5),
            Position::new(3, 5),
            Position::new(3, 6),
        ] {
            grid.set(pos, TileKind::Wall).unwrap();
        }
        assert_eq!(validate_room(&grid), RoomValidity::NoPath);
    }

    #[test]
    fn test_goal_takes_precedence_over_exits() {
        let mut grid = open_grid(8);
        grid.set(Position::new(4, 0), TileKind::Start).unwrap();
        grid.set(Position::new(4, 2), TileKind::Goal).unwrap();
        grid.set(Position::new(4, 7), TileKind::RoomExit).unwrap();

        // Path to the goal (3 cells), not the farther exit.
        assert_eq!(validate_room(&grid), RoomValidity::Valid { path_cells: 3 });
    }

    #[test]
    fn test_nearest_exit_wins() {
        let mut grid = open_grid(10);
        grid.set(Position::new(5, 0), TileKind::Start).unwrap();
        for row in 1..9 {
            grid.set(Position::new(row, 9), TileKind::RoomExit).unwrap();
        }
        let path = shortest_exit_path(&grid).unwrap();
        // The exit straight across row 5 is nearest: 10 cells inclusive.
        assert_eq!(path.len(), 10);
        assert_eq!(*path.last().unwrap(), Position::new(5, 9));
    }

    #[test]
    fn test_reachable_set_counts_open_interior() {
        let grid = open_grid(6);
        let reachable = reachable_from(&grid, Position::new(1, 1));
        // 4x4 interior, all open.
        assert_eq!(reachable.len(), 16);
    }

    #[test]
    fn test_room_statistics_counts() {
        let mut grid = open_grid(6);
        grid.set(Position::new(2, 0), TileKind::Start).unwrap();
        grid.set(Position::new(3, 4), TileKind::Goal).unwrap();
        let stats = room_statistics(&grid);

        assert!(stats.validity.is_valid());
        assert_eq!(stats.size, 6);
        let count_of = |kind: TileKind| {
            stats
                .tile_counts
                .iter()
                .find(|(k, _)| *k == kind)
                .map(|(_, n)| *n)
                .unwrap()
        };
        assert_eq!(count_of(TileKind::Start), 1);
        assert_eq!(count_of(TileKind::Goal), 1);
        assert_eq!(count_of(TileKind::RoomExit), 0);
    }
}
