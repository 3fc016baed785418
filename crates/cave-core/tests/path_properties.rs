use std::collections::BTreeSet;

use cave_core::path::{apply, is_walkable_route};
use cave_core::{Cell, Direction, WorldMap, cost_aware_path_to_any, shortest_path};

const MAZE: [&str; 6] = [
    "......",
    ".####.",
    ".#....",
    ".#.##.",
    "...##.",
    "##.#.#",
];

fn maze() -> WorldMap {
    let mut map = WorldMap::new(MAZE[0].len() as u32, MAZE.len() as u32);
    let mut walls = Vec::new();
    let mut floors = Vec::new();
    for (y, row) in MAZE.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let cell = Cell::new(x as i32, y as i32);
            if ch == '#' {
                walls.push(cell);
            } else {
                floors.push(cell);
            }
        }
    }
    map.observe(&walls, &floors, Cell::ORIGIN);
    map
}

/// Hop distances from `start` by repeated relaxation, independent of BFS.
fn relaxed_distances(map: &WorldMap, start: Cell) -> Vec<(Cell, u32)> {
    let cells: Vec<Cell> = (0..map.height() as i32)
        .flat_map(|y| (0..map.width() as i32).map(move |x| Cell::new(x, y)))
        .filter(|&cell| map.is_walkable(cell))
        .collect();
    let mut distance: Vec<Option<u32>> = cells
        .iter()
        .map(|&cell| (cell == start).then_some(0))
        .collect();

    loop {
        let mut changed = false;
        for i in 0..cells.len() {
            for j in 0..cells.len() {
                if !cells[i].is_adjacent(cells[j]) {
                    continue;
                }
                if let Some(d) = distance[j] {
                    if distance[i].is_none_or(|current| d + 1 < current) {
                        distance[i] = Some(d + 1);
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }

    cells
        .into_iter()
        .zip(distance)
        .filter_map(|(cell, d)| d.map(|d| (cell, d)))
        .collect()
}

#[test]
fn bfs_length_matches_true_distance_for_every_reachable_cell() {
    let map = maze();
    let start = Cell::ORIGIN;
    let reachable = relaxed_distances(&map, start);
    assert!(reachable.len() > 10);

    for (goal, distance) in reachable {
        let moves = shortest_path(&map, start, goal);
        assert_eq!(moves.len() as u32, distance, "goal {goal}");
        assert_eq!(apply(start, &moves), goal);
        assert!(is_walkable_route(&map, start, &moves));
    }
}

#[test]
fn same_start_and_goal_is_empty() {
    let map = maze();
    assert!(shortest_path(&map, Cell::new(2, 2), Cell::new(2, 2)).is_empty());
}

#[test]
fn unreachable_goal_is_empty() {
    let map = maze();
    // Floor pocket sealed by walls and the grid edge.
    assert!(shortest_path(&map, Cell::ORIGIN, Cell::new(4, 5)).is_empty());
    // A wall itself.
    assert!(shortest_path(&map, Cell::ORIGIN, Cell::new(1, 1)).is_empty());
    // Off the grid.
    assert!(shortest_path(&map, Cell::ORIGIN, Cell::new(-1, 0)).is_empty());
}

#[test]
fn identical_maps_give_identical_paths() {
    let goal = Cell::new(5, 4);
    let first = shortest_path(&maze(), Cell::ORIGIN, goal);
    let second = shortest_path(&maze(), Cell::ORIGIN, goal);
    assert_eq!(first, second);
    assert_eq!(first.len(), 9);
    assert_eq!(first.first(), Some(&Direction::East));
}

#[test]
fn cost_aware_path_matches_bfs_on_unvisited_maze() {
    let map = maze();
    let goals = BTreeSet::from([Cell::new(5, 4)]);
    let astar = cost_aware_path_to_any(&map, Cell::ORIGIN, &goals, 0.1);
    let bfs = shortest_path(&map, Cell::ORIGIN, Cell::new(5, 4));
    assert_eq!(astar.len(), bfs.len());
    assert_eq!(apply(Cell::ORIGIN, &astar), Cell::new(5, 4));
}
