//! The decision cascade, highest priority first.
//!
//! Each strategy either records a move on the [`TickContext`] and succeeds, or
//! fails so the next one is tried. The engine falls back to
//! [`Move::FALLBACK`](crate::state::Move::FALLBACK) if every strategy fails.

use std::collections::BTreeSet;

use super::context::{PlanKind, TickContext};
use super::tree::{Behavior, Selector, Status};
use crate::path::{apply, cost_aware_path_to_any, shortest_path};
use crate::state::{Cell, Direction, Vector2};

/// Score bonus for stepping onto unknown terrain while hunting.
pub const HUNT_UNKNOWN_BONUS: f64 = 1.5;
/// Score penalty for stepping back onto the previous cell while hunting.
pub const HUNT_BACKTRACK_PENALTY: f64 = 2.0;
/// Weight of the remembered signal change when hunting.
pub const HUNT_SIGNAL_WEIGHT: f64 = 20.0;

/// Whether the agent has gone long enough without seeing a gem to start hunting.
pub fn is_hunt_active(tick: u64, last_gem_tick: u64, hunt_threshold: u64) -> bool {
    tick.saturating_sub(last_gem_tick) >= hunt_threshold
}

/// The full cascade in priority order.
pub fn cascade<'a>() -> Selector<TickContext<'a>> {
    Selector::new(vec![
        Box::new(AdjacentGem),
        Box::new(VisibleGemTarget),
        Box::new(SignalHunt),
        Box::new(RememberedGem),
        Box::new(FrontierExplore),
        Box::new(ContinuePlan),
        Box::new(MemoryGuidance),
        Box::new(LeastVisited),
    ])
}

/// Name reported when the cascade yields nothing.
pub const TERMINAL: &str = "wait";

// ============================================================================
// Gems
// ============================================================================

/// Step onto a confirmed gem in an orthogonally adjacent walkable cell.
pub struct AdjacentGem;

impl AdjacentGem {
    pub const NAME: &'static str = "adjacent-gem";
}

impl Behavior<TickContext<'_>> for AdjacentGem {
    fn tick(&self, ctx: &mut TickContext<'_>) -> Status {
        let found = Direction::ALL.into_iter().find(|&direction| {
            let cell = ctx.position.step(direction);
            ctx.map.is_walkable(cell)
                && ctx.gems.get(cell).is_some_and(|gem| gem.is_confirmed())
        });
        match found {
            Some(direction) => {
                ctx.step(direction, Self::NAME);
                Status::Success
            }
            None => Status::Failure,
        }
    }
}

/// Walk towards the best-scoring gem in view by shortest path.
///
/// Reuses the cached plan while it still targets the same gem.
pub struct VisibleGemTarget;

impl VisibleGemTarget {
    pub const NAME: &'static str = "visible-gem";

    fn best_target(ctx: &TickContext<'_>) -> Option<Cell> {
        let mut best: Option<(Cell, f64)> = None;
        // Visible gems iterate in cell order, so the strict comparison keeps
        // the smallest cell on equal scores.
        for gem in ctx.gems.visible(ctx.tick) {
            if gem.cell == ctx.position {
                continue;
            }
            let score = ctx.gems.score(gem, ctx.position, ctx.tick);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((gem.cell, score));
            }
        }
        best.map(|(cell, _)| cell)
    }
}

impl Behavior<TickContext<'_>> for VisibleGemTarget {
    fn tick(&self, ctx: &mut TickContext<'_>) -> Status {
        let Some(target) = Self::best_target(ctx) else {
            return Status::Failure;
        };

        let cached = ctx.plan().is_some_and(|plan| {
            plan.kind == PlanKind::Gem && plan.target == target && !plan.is_exhausted()
        });
        if cached && ctx.follow_plan(Self::NAME) {
            return Status::Success;
        }

        let moves = shortest_path(ctx.map, ctx.position, target);
        Status::from_bool(ctx.adopt_plan(target, PlanKind::Gem, moves, Self::NAME))
    }
}

/// Return to a confirmed gem that has dropped out of view.
pub struct RememberedGem;

impl RememberedGem {
    pub const NAME: &'static str = "remembered-gem";
}

impl Behavior<TickContext<'_>> for RememberedGem {
    fn tick(&self, ctx: &mut TickContext<'_>) -> Status {
        let Some(target) = ctx.gems.nearest_remembered(ctx.position, ctx.tick) else {
            return Status::Failure;
        };
        let moves = shortest_path(ctx.map, ctx.position, target);
        Status::from_bool(ctx.adopt_plan(target, PlanKind::Gem, moves, Self::NAME))
    }
}

// ============================================================================
// Signal hunt
// ============================================================================

/// Local greedy search after a long drought of gem sightings.
///
/// Each walkable neighbor is scored: unknown terrain earns
/// [`HUNT_UNKNOWN_BONUS`], the cell just left costs [`HUNT_BACKTRACK_PENALTY`],
/// and a neighbor whose last recorded signal exceeds the current reading earns
/// [`HUNT_SIGNAL_WEIGHT`] times the difference. The best score wins, ties by
/// direction priority.
pub struct SignalHunt;

impl SignalHunt {
    pub const NAME: &'static str = "signal-hunt";

    pub fn score(ctx: &TickContext<'_>, neighbor: Cell) -> f64 {
        let mut score = 0.0;
        if ctx.map.is_unknown(neighbor) {
            score += HUNT_UNKNOWN_BONUS;
        }
        if ctx.previous_position() == Some(neighbor) {
            score -= HUNT_BACKTRACK_PENALTY;
        }
        let now = ctx.signal.latest_at(ctx.position);
        let then = ctx.signal.latest_at(neighbor);
        if let (Some(now), Some(then)) = (now, then) {
            score += HUNT_SIGNAL_WEIGHT * (then.signal - now.signal);
        }
        score
    }
}

impl Behavior<TickContext<'_>> for SignalHunt {
    fn tick(&self, ctx: &mut TickContext<'_>) -> Status {
        if !ctx.hunting {
            return Status::Failure;
        }
        let mut best: Option<(Direction, f64)> = None;
        for (direction, neighbor) in ctx.map.neighbors(ctx.position) {
            let score = Self::score(ctx, neighbor);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((direction, score));
            }
        }
        match best {
            Some((direction, score)) => {
                tracing::trace!(tick = ctx.tick, %direction, score, "hunt step");
                ctx.step(direction, Self::NAME);
                Status::Success
            }
            None => Status::Failure,
        }
    }
}

// ============================================================================
// Exploration
// ============================================================================

/// Plan a cost-aware route to the nearest frontier cell.
///
/// Replans when there is no plan, when the plan is used up, every
/// `replan_interval` ticks, when an exploration target stopped being
/// frontier, or when a gem target is no longer tracked. Otherwise defers to
/// [`ContinuePlan`].
pub struct FrontierExplore;

impl FrontierExplore {
    pub const NAME: &'static str = "frontier";

    fn needs_replan(ctx: &TickContext<'_>) -> bool {
        match ctx.plan() {
            None => true,
            Some(plan) => {
                let stale = match plan.kind {
                    PlanKind::Explore => !ctx.map.frontier().contains(&plan.target),
                    PlanKind::Gem => ctx.gems.get(plan.target).is_none(),
                    PlanKind::Memory => false,
                };
                stale || plan.is_exhausted() || ctx.tick % ctx.config.replan_interval == 0
            }
        }
    }
}

impl Behavior<TickContext<'_>> for FrontierExplore {
    fn tick(&self, ctx: &mut TickContext<'_>) -> Status {
        if !Self::needs_replan(ctx) {
            return Status::Failure;
        }
        let goals: BTreeSet<Cell> = ctx
            .map
            .frontier()
            .iter()
            .copied()
            .filter(|&cell| cell != ctx.position)
            .collect();
        let penalty = ctx.config.revisit_penalty;
        let moves = cost_aware_path_to_any(ctx.map, ctx.position, &goals, penalty);
        let Some(target) = (!moves.is_empty()).then(|| apply(ctx.position, &moves)) else {
            return Status::Failure;
        };
        tracing::debug!(tick = ctx.tick, %target, steps = moves.len(), "exploration replanned");
        Status::from_bool(ctx.adopt_plan(target, PlanKind::Explore, moves, Self::NAME))
    }
}

/// Take the next step of the cached plan.
pub struct ContinuePlan;

impl ContinuePlan {
    pub const NAME: &'static str = "continue";
}

impl Behavior<TickContext<'_>> for ContinuePlan {
    fn tick(&self, ctx: &mut TickContext<'_>) -> Status {
        if ctx.plan().is_none() {
            return Status::Failure;
        }
        Status::from_bool(ctx.follow_plan(Self::NAME))
    }
}

/// Once the map has no frontier left, head for the strongest remembered
/// signal, or step along the estimated gradient.
pub struct MemoryGuidance;

impl MemoryGuidance {
    pub const NAME: &'static str = "memory";
}

impl Behavior<TickContext<'_>> for MemoryGuidance {
    fn tick(&self, ctx: &mut TickContext<'_>) -> Status {
        if !ctx.map.frontier().is_empty() {
            return Status::Failure;
        }

        if let Some(best) = ctx.signal.best_known_cell(ctx.map) {
            if best != ctx.position {
                let goals = BTreeSet::from([best]);
                let penalty = ctx.config.revisit_penalty;
                let moves = cost_aware_path_to_any(ctx.map, ctx.position, &goals, penalty);
                if ctx.adopt_plan(best, PlanKind::Memory, moves, Self::NAME) {
                    return Status::Success;
                }
            }
        }

        let gradient = ctx.signal.gradient(ctx.position, ctx.map);
        if gradient.is_zero() {
            return Status::Failure;
        }
        let mut best: Option<(Direction, f64)> = None;
        for (direction, _) in ctx.map.neighbors(ctx.position) {
            let alignment = gradient.dot(Vector2::of(direction));
            let better = best.is_none_or(|(_, best_alignment)| alignment > best_alignment);
            if alignment > 0.0 && better {
                best = Some((direction, alignment));
            }
        }
        match best {
            Some((direction, _)) => {
                ctx.step(direction, Self::NAME);
                Status::Success
            }
            None => Status::Failure,
        }
    }
}

/// Move to the walkable neighbor visited least often.
pub struct LeastVisited;

impl LeastVisited {
    pub const NAME: &'static str = "least-visited";
}

impl Behavior<TickContext<'_>> for LeastVisited {
    fn tick(&self, ctx: &mut TickContext<'_>) -> Status {
        let Some(fewest) = ctx
            .map
            .neighbors(ctx.position)
            .map(|(_, cell)| ctx.map.visits(cell))
            .min()
        else {
            return Status::Failure;
        };
        let ties: Vec<Direction> = ctx
            .map
            .neighbors(ctx.position)
            .filter(|&(_, cell)| ctx.map.visits(cell) == fewest)
            .map(|(direction, _)| direction)
            .collect();
        match ctx.tie_breaker.pick(&ties, ctx.tick) {
            Some(direction) => {
                ctx.step(direction, Self::NAME);
                Status::Success
            }
            None => Status::Failure,
        }
    }
}
