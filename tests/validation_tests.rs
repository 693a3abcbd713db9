//! Integration tests for BFS reachability over hand-built and generated
//! grids, including a cross-check against an independent BFS implementation.

use delve::generation::rng_from_seed;
use delve::validation::{
    distance_between, is_reachable_to_any, shortest_exit_path, shortest_path, validate_room,
    RoomValidity,
};
use delve::{
    Direction, Grid, GridGenerator, PlacementRequest, Position, RoomGenerator, RoomSpec, TileKind,
};

/// 18x18 room shell: wall ring, open interior, exit run on the right.
fn open_room_with_right_exit() -> Grid {
    let mut grid = Grid::filled(18, TileKind::Path);
    for pos in grid.positions().collect::<Vec<_>>() {
        if grid.is_border(pos) {
            grid.set(pos, TileKind::Wall).unwrap();
        }
    }
    for row in 1..=16 {
        grid.set(Position::new(row, 17), TileKind::RoomExit).unwrap();
    }
    grid
}

#[test]
fn empty_room_start_to_exit_row_is_straight() {
    // START (8, 0), exit run at column 17: 17 moves, 18 visited cells.
    let mut grid = open_room_with_right_exit();
    grid.set(Position::new(8, 0), TileKind::Start).unwrap();

    assert_eq!(validate_room(&grid), RoomValidity::Valid { path_cells: 18 });

    let path = shortest_exit_path(&grid).unwrap();
    assert_eq!(path.len(), 18);
    assert_eq!(path[0], Position::new(8, 0));
    assert_eq!(*path.last().unwrap(), Position::new(8, 17));
    // The straight shot along row 8 is the unique shortest path.
    assert!(path.iter().all(|pos| pos.row == 8));
}

#[test]
fn reachable_to_any_accepts_one_open_exit() {
    let mut grid = open_room_with_right_exit();
    grid.set(Position::new(8, 0), TileKind::Start).unwrap();
    // Wall off every exit row except row 3.
    for row in 1..=16 {
        if row != 3 {
            grid.set(Position::new(row, 16), TileKind::Wall).unwrap();
        }
    }
    let start = Position::new(8, 0);
    let exits: Vec<Position> = grid.find_all(TileKind::RoomExit);
    assert_eq!(exits.len(), 16);
    assert!(is_reachable_to_any(&grid, start, &exits));

    let path = shortest_exit_path(&grid).unwrap();
    assert_eq!(*path.last().unwrap(), Position::new(3, 17));
}

#[test]
fn distances_match_manhattan_on_open_grids() {
    let grid = open_room_with_right_exit();
    let cases = [
        (Position::new(1, 1), Position::new(1, 16)),
        (Position::new(1, 1), Position::new(16, 16)),
        (Position::new(8, 3), Position::new(2, 12)),
    ];
    for (from, to) in cases {
        assert_eq!(
            distance_between(&grid, from, to),
            Some(from.manhattan_distance(to))
        );
    }
}

#[test]
fn adding_walls_only_lengthens_paths() {
    let mut grid = open_room_with_right_exit();
    let from = Position::new(8, 1);
    let to = Position::new(8, 15);
    let base = distance_between(&grid, from, to).unwrap();

    // Partial wall across column 8 forces a detour.
    for row in 4..=12 {
        grid.set(Position::new(row, 8), TileKind::Wall).unwrap();
    }
    let detoured = distance_between(&grid, from, to).unwrap();
    assert!(detoured > base);
}

#[test]
fn bfs_agrees_with_pathfinding_crate() {
    // Cross-check shortest path lengths on scattered rooms against an
    // independently implemented BFS.
    for seed in [3u64, 17, 256, 9999] {
        let spec = RoomSpec::new(5, Some(Direction::Right), Some(Direction::Left), Some(8), seed);
        let grid = RoomGenerator::new(spec)
            .unwrap()
            .generate(&PlacementRequest::new(0.25, 3, 3), &mut rng_from_seed(seed))
            .unwrap();

        let start = grid.find_first(TileKind::Start).unwrap();
        for target in grid.find_all(TileKind::RoomExit) {
            let ours = shortest_path(&grid, start, target).map(|p| p.len());
            let reference = pathfinding::prelude::bfs(
                &start,
                |&pos| {
                    pos.cardinal_neighbors()
                        .into_iter()
                        .filter(|&n| grid.is_traversable(n))
                        .collect::<Vec<_>>()
                },
                |&pos| pos == target,
            )
            .map(|p| p.len());
            assert_eq!(ours, reference, "seed {seed}, target {target:?}");
        }
    }
}

#[test]
fn returned_paths_are_contiguous_end_to_end() {
    // A path must run unbroken from the start to the target, one cardinal
    // step at a time, never truncated.
    for seed in [11u64, 404, 7777] {
        let spec = RoomSpec::new(2, Some(Direction::Right), Some(Direction::Left), Some(4), seed);
        let grid = RoomGenerator::new(spec)
            .unwrap()
            .generate(&PlacementRequest::new(0.3, 3, 3), &mut rng_from_seed(seed))
            .unwrap();

        let start = grid.find_first(TileKind::Start).unwrap();
        for target in grid.find_all(TileKind::RoomExit) {
            let Some(path) = shortest_path(&grid, start, target) else {
                continue;
            };
            assert_eq!(path[0], start);
            assert_eq!(*path.last().unwrap(), target);
            for pair in path.windows(2) {
                assert_eq!(pair[0].manhattan_distance(pair[1]), 1, "seed {seed}");
            }
        }
    }
}

#[test]
fn validation_failures_are_distinct() {
    let no_start = open_room_with_right_exit();
    assert_eq!(validate_room(&no_start), RoomValidity::MissingStart);

    let mut no_target = Grid::filled(18, TileKind::Path);
    for pos in no_target.positions().collect::<Vec<_>>() {
        if no_target.is_border(pos) {
            no_target.set(pos, TileKind::Wall).unwrap();
        }
    }
    no_target.set(Position::new(8, 0), TileKind::Start).unwrap();
    assert_eq!(validate_room(&no_target), RoomValidity::MissingTarget);

    let mut sealed = open_room_with_right_exit();
    sealed.set(Position::new(8, 0), TileKind::Start).unwrap();
    for row in 1..=16 {
        sealed.set(Position::new(row, 1), TileKind::Wall).unwrap();
    }
    assert_eq!(validate_room(&sealed), RoomValidity::NoPath);
}
