use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::reconstruct;
use crate::state::{Cell, Direction, WorldMap};

/// Unweighted shortest path from `start` to `goal`.
///
/// Returns an empty sequence when `start == goal` or the goal is unreachable.
pub fn shortest_path(map: &WorldMap, start: Cell, goal: Cell) -> Vec<Direction> {
    if start == goal {
        return Vec::new();
    }
    search(map, start, |cell| cell == goal)
}

/// Unweighted shortest path to whichever member of `goals` is reached first.
///
/// BFS order guarantees the returned goal is a nearest one by hop count.
/// Returns an empty sequence when `start` is itself a goal or none is reachable.
pub fn shortest_path_to_any(
    map: &WorldMap,
    start: Cell,
    goals: &BTreeSet<Cell>,
) -> Vec<Direction> {
    if goals.is_empty() || goals.contains(&start) {
        return Vec::new();
    }
    search(map, start, |cell| goals.contains(&cell))
}

fn search(map: &WorldMap, start: Cell, is_goal: impl Fn(Cell) -> bool) -> Vec<Direction> {
    if !map.contains(start) {
        return Vec::new();
    }

    let mut came_from: BTreeMap<Cell, (Cell, Direction)> = BTreeMap::new();
    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(cell) = queue.pop_front() {
        for (direction, next) in map.neighbors(cell) {
            if !visited.insert(next) {
                continue;
            }
            came_from.insert(next, (cell, direction));
            if is_goal(next) {
                return reconstruct(&came_from, start, next);
            }
            queue.push_back(next);
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::apply;

    /// Builds a fully observed map from rows of `#` (wall) and `.` (floor).
    fn map_from(rows: &[&str]) -> WorldMap {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let mut walls = Vec::new();
        let mut floors = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, tile) in row.chars().enumerate() {
                let cell = Cell::new(x as i32, y as i32);
                if tile == '#' {
                    walls.push(cell);
                } else {
                    floors.push(cell);
                }
            }
        }
        let mut map = WorldMap::new(width, height);
        map.observe(&walls, &floors, floors[0]);
        map
    }

    #[test]
    fn same_cell_is_empty() {
        let map = map_from(&["..", ".."]);
        assert!(shortest_path(&map, Cell::new(1, 1), Cell::new(1, 1)).is_empty());
    }

    #[test]
    fn path_length_matches_hop_distance() {
        let map = map_from(&[
            ".....", //
            ".###.", //
            ".#...", //
            ".#.#.", //
            "...#.",
        ]);
        let start = Cell::new(0, 0);
        let goal = Cell::new(2, 2);
        let path = shortest_path(&map, start, goal);
        // Around the top: E,E,E,E,S,S,W,W = 8; around the left: S x4, E,E, N,N = 8.
        assert_eq!(path.len(), 8);
        assert_eq!(apply(start, &path), goal);
    }

    #[test]
    fn expansion_order_is_deterministic() {
        let map = map_from(&["...", "...", "..."]);
        let path = shortest_path(&map, Cell::new(0, 0), Cell::new(1, 1));
        // South is expanded before East.
        assert_eq!(path, vec![Direction::South, Direction::East]);
    }

    #[test]
    fn unreachable_goal_is_empty() {
        let map = map_from(&[".#.", ".#.", ".#."]);
        assert!(shortest_path(&map, Cell::new(0, 0), Cell::new(2, 2)).is_empty());
        assert!(shortest_path(&map, Cell::new(0, 0), Cell::new(1, 1)).is_empty());
        assert!(shortest_path(&map, Cell::new(0, 0), Cell::new(9, 9)).is_empty());
    }

    #[test]
    fn nearest_goal_wins() {
        let map = map_from(&[".....", ".....", "....."]);
        let goals = BTreeSet::from([Cell::new(4, 0), Cell::new(0, 2)]);
        let path = shortest_path_to_any(&map, Cell::new(1, 1), &goals);
        assert_eq!(apply(Cell::new(1, 1), &path), Cell::new(0, 2));
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn start_in_goals_is_empty() {
        let map = map_from(&["..."]);
        let goals = BTreeSet::from([Cell::new(0, 0)]);
        assert!(shortest_path_to_any(&map, Cell::new(0, 0), &goals).is_empty());
        assert!(shortest_path_to_any(&map, Cell::new(0, 0), &BTreeSet::new()).is_empty());
    }
}
