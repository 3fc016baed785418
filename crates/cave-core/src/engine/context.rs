//! Per-tick blackboard shared by the cascade strategies.

use std::collections::VecDeque;

use crate::config::AgentConfig;
use crate::rng::TieBreaker;
use crate::state::{Cell, Direction, GemTracker, History, Move, SignalEstimator, WorldMap};

/// Ring of the agent's recent cells, newest last.
pub type PositionHistory = History<Cell, { AgentConfig::POSITION_HISTORY }>;

/// Why a cached path was planned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanKind {
    Gem,
    Explore,
    Memory,
}

/// Cached route, consumed one move per tick to avoid replanning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    pub target: Cell,
    pub kind: PlanKind,
    pub moves: VecDeque<Direction>,
}

impl Plan {
    pub fn new(target: Cell, kind: PlanKind, moves: Vec<Direction>) -> Self {
        Self {
            target,
            kind,
            moves: moves.into(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Context for one decision.
///
/// Read access to every belief store, write access to the cached plan, and
/// the slot where the winning strategy records its move.
pub struct TickContext<'a> {
    pub tick: u64,
    pub position: Cell,
    pub hunting: bool,
    pub config: &'a AgentConfig,
    pub map: &'a WorldMap,
    pub gems: &'a GemTracker,
    pub signal: &'a SignalEstimator,
    pub positions: &'a PositionHistory,
    pub tie_breaker: &'a dyn TieBreaker,
    plan: &'a mut Option<Plan>,
    decision: Option<(Move, &'static str)>,
}

impl<'a> TickContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tick: u64,
        position: Cell,
        hunting: bool,
        config: &'a AgentConfig,
        map: &'a WorldMap,
        gems: &'a GemTracker,
        signal: &'a SignalEstimator,
        positions: &'a PositionHistory,
        tie_breaker: &'a dyn TieBreaker,
        plan: &'a mut Option<Plan>,
    ) -> Self {
        Self {
            tick,
            position,
            hunting,
            config,
            map,
            gems,
            signal,
            positions,
            tie_breaker,
            plan,
            decision: None,
        }
    }

    /// Records the move chosen by `strategy`.
    ///
    /// Only the first decision of a tick counts; a selector stops at the first
    /// success, so a second call means two strategies claimed the same tick.
    pub fn decide(&mut self, mv: Move, strategy: &'static str) {
        if let Some((kept, winner)) = self.decision {
            tracing::warn!(%kept, winner, ignored = strategy, "move already decided");
            return;
        }
        self.decision = Some((mv, strategy));
    }

    pub fn decision(&self) -> Option<(Move, &'static str)> {
        self.decision
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn clear_plan(&mut self) {
        *self.plan = None;
    }

    /// The cell occupied on the previous tick.
    pub fn previous_position(&self) -> Option<Cell> {
        self.positions.last().copied()
    }

    /// Pops the next cached move if it still leads onto walkable ground.
    ///
    /// A blocked or exhausted plan is discarded.
    pub fn follow_plan(&mut self, strategy: &'static str) -> bool {
        let next = self
            .plan
            .as_mut()
            .and_then(|plan| plan.moves.front().copied());
        let Some(direction) = next else {
            self.clear_plan();
            return false;
        };
        if !self.map.is_walkable(self.position.step(direction)) {
            tracing::debug!(tick = self.tick, %direction, "cached plan blocked");
            self.clear_plan();
            return false;
        }
        if let Some(plan) = self.plan.as_mut() {
            plan.moves.pop_front();
        }
        self.decide(direction.into(), strategy);
        true
    }

    /// Caches a fresh plan and takes its first step. Empty routes are rejected.
    pub fn adopt_plan(
        &mut self,
        target: Cell,
        kind: PlanKind,
        moves: Vec<Direction>,
        strategy: &'static str,
    ) -> bool {
        if moves.is_empty() {
            return false;
        }
        *self.plan = Some(Plan::new(target, kind, moves));
        self.follow_plan(strategy)
    }

    /// Takes a single step outside of any plan.
    pub fn step(&mut self, direction: Direction, strategy: &'static str) {
        self.clear_plan();
        self.decide(direction.into(), strategy);
    }
}
