use std::collections::{BTreeMap, BTreeSet};

use super::reconstruct;
use crate::state::{Cell, Direction, WorldMap};

/// Fixed-point scale for path costs, so the open set is totally ordered.
const COST_SCALE: u64 = 1000;

/// Cost-aware shortest path to the nearest member of `goals`.
///
/// Entering a cell costs `1 + visits(cell) * revisit_penalty`, which steers
/// equal-length routes through less-visited terrain. The heuristic is the
/// Manhattan distance to the closest goal, admissible because every step
/// costs at least one. Returns an empty sequence when `start` is a goal or
/// none is reachable.
pub fn cost_aware_path_to_any(
    map: &WorldMap,
    start: Cell,
    goals: &BTreeSet<Cell>,
    revisit_penalty: f64,
) -> Vec<Direction> {
    if goals.is_empty() || goals.contains(&start) || !map.contains(start) {
        return Vec::new();
    }

    let penalty = if revisit_penalty.is_finite() && revisit_penalty > 0.0 {
        revisit_penalty
    } else {
        0.0
    };
    let step_cost = |cell: Cell| -> u64 {
        let extra = (f64::from(map.visits(cell)) * penalty * COST_SCALE as f64).round();
        COST_SCALE + extra as u64
    };
    let heuristic = |cell: Cell| -> u64 {
        goals
            .iter()
            .map(|&goal| u64::from(cell.manhattan_distance(goal)))
            .min()
            .unwrap_or(0)
            * COST_SCALE
    };

    // Best known cost from start.
    let mut cost: BTreeMap<Cell, u64> = BTreeMap::from([(start, 0)]);
    let mut came_from: BTreeMap<Cell, (Cell, Direction)> = BTreeMap::new();
    // Open set keyed on (estimated total, cell); a BTreeSet doubles as a
    // priority queue with deterministic tie-breaking.
    let mut open: BTreeSet<(u64, Cell)> = BTreeSet::from([(heuristic(start), start)]);
    let mut closed: BTreeSet<Cell> = BTreeSet::new();

    while let Some((_, current)) = open.pop_first() {
        if goals.contains(&current) {
            return reconstruct(&came_from, start, current);
        }
        if !closed.insert(current) {
            continue;
        }
        let current_cost = cost.get(&current).copied().unwrap_or(u64::MAX);

        for (direction, next) in map.neighbors(current) {
            if closed.contains(&next) {
                continue;
            }
            let tentative = current_cost.saturating_add(step_cost(next));
            let is_better = cost.get(&next).is_none_or(|&known| tentative < known);
            if !is_better {
                continue;
            }
            if let Some(&known) = cost.get(&next) {
                open.remove(&(known.saturating_add(heuristic(next)), next));
            }
            cost.insert(next, tentative);
            came_from.insert(next, (current, direction));
            open.insert((tentative.saturating_add(heuristic(next)), next));
        }
    }

    Vec::new()
}
