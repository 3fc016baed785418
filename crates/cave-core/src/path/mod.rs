//! Path planning over the world map.
//!
//! All planners are pure functions of [`WorldMap`] state and return the move
//! sequence from `start` (exclusive) to the goal. An empty sequence means
//! either "already there" or "no path"; callers treat both as "try the next
//! strategy", never as a failure.
//!
//! - [`shortest_path`] / [`shortest_path_to_any`]: unweighted BFS, used for
//!   gem retrieval where speed-to-reward dominates.
//! - [`cost_aware_path_to_any`]: A* with a revisit penalty, used by
//!   exploration and memory-guided phases.
//!
//! Neighbor expansion always follows the fixed N, S, E, W priority so identical
//! maps give identical paths.

mod astar;
mod bfs;

use std::collections::BTreeMap;

use crate::state::{Cell, Direction, WorldMap};

pub use astar::cost_aware_path_to_any;
pub use bfs::{shortest_path, shortest_path_to_any};

/// Cell reached by applying `moves` to `start`, ignoring terrain.
pub fn apply(start: Cell, moves: &[Direction]) -> Cell {
    moves
        .iter()
        .fold(start, |cell, &direction| cell.step(direction))
}

/// Whether every step of `moves` from `start` stays on walkable cells.
pub fn is_walkable_route(map: &WorldMap, start: Cell, moves: &[Direction]) -> bool {
    let mut cell = start;
    moves.iter().all(|&direction| {
        cell = cell.step(direction);
        map.is_walkable(cell)
    })
}

/// Walks the predecessor links back from `goal` and returns the forward moves.
fn reconstruct(
    came_from: &BTreeMap<Cell, (Cell, Direction)>,
    start: Cell,
    goal: Cell,
) -> Vec<Direction> {
    let mut moves = Vec::new();
    let mut current = goal;
    while current != start {
        let Some(&(previous, direction)) = came_from.get(&current) else {
            return Vec::new();
        };
        moves.push(direction);
        current = previous;
    }
    moves.reverse();
    moves
}
