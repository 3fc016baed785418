//! Per-tick decision engine.
//!
//! [`DecisionEngine::tick`] folds one [`Observation`] into the belief stores
//! (map, gems, signal), then runs the strategy cascade and returns exactly one
//! [`Move`]. The engine never fails: malformed positions and empty cascades
//! both resolve to [`Move::FALLBACK`].

mod context;
mod strategies;
mod tree;

pub use context::{Plan, PlanKind, PositionHistory, TickContext};
pub use strategies::{
    cascade, is_hunt_active, AdjacentGem, ContinuePlan, FrontierExplore, LeastVisited,
    MemoryGuidance, RememberedGem, SignalHunt, VisibleGemTarget, HUNT_BACKTRACK_PENALTY,
    HUNT_SIGNAL_WEIGHT, HUNT_UNKNOWN_BONUS, TERMINAL,
};
pub use tree::{Behavior, Selector, Status};

use crate::config::AgentConfig;
use crate::error::ConfigError;
use crate::observation::Observation;
use crate::rng::{FixedPriority, TieBreaker};
use crate::state::{Cell, GemTracker, Move, SignalEstimator, WorldMap};

/// Owns all agent memory and turns observations into moves.
#[derive(Debug)]
pub struct DecisionEngine {
    config: AgentConfig,
    map: WorldMap,
    gems: GemTracker,
    signal: SignalEstimator,
    positions: PositionHistory,
    plan: Option<Plan>,
    /// Where the agent should stand next tick if the last move succeeded.
    expected: Option<Cell>,
    position: Cell,
    tick: u64,
    last_gem_tick: u64,
    last_strategy: Option<&'static str>,
    tie_breaker: Box<dyn TieBreaker>,
}

impl DecisionEngine {
    pub fn new(config: AgentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            map: WorldMap::new(config.width, config.height),
            gems: GemTracker::new(
                config.width,
                config.height,
                config.vis_radius,
                config.ttl_reference,
            ),
            signal: SignalEstimator::new(config.width, config.height),
            positions: PositionHistory::new(),
            plan: None,
            expected: None,
            position: Cell::ORIGIN,
            tick: 0,
            last_gem_tick: 0,
            last_strategy: None,
            tie_breaker: Box::new(FixedPriority),
            config,
        })
    }

    /// Replaces the least-visited tie-break source.
    pub fn with_tie_breaker(mut self, tie_breaker: impl TieBreaker + 'static) -> Self {
        self.tie_breaker = Box::new(tie_breaker);
        self
    }

    /// Processes one observation and returns the move for this tick.
    pub fn tick(&mut self, observation: &Observation) -> Move {
        let tick = observation.tick;
        let position = observation.position;

        if !self.map.contains(position) {
            tracing::warn!(tick, %position, "position outside the grid, waiting");
            self.tick = tick;
            self.last_strategy = Some(TERMINAL);
            return Move::FALLBACK;
        }

        if self.plan.is_some() && self.expected != Some(position) {
            tracing::debug!(tick, %position, expected = ?self.expected, "off plan, dropping it");
            self.plan = None;
        }

        self.tick = tick;
        self.position = position;
        self.observe(observation);

        let (mv, strategy) = self.decide();

        self.positions.push(position);
        self.expected = mv.direction().map(|direction| position.step(direction));
        self.last_strategy = Some(strategy);

        tracing::debug!(tick, %position, strategy, %mv, hunting = self.is_hunting(), "decided");
        mv
    }

    fn observe(&mut self, observation: &Observation) {
        let tick = observation.tick;
        self.map
            .observe(&observation.walls, &observation.floors, observation.position);
        self.map.visit(observation.position);

        self.gems.update(&observation.visible_gems, tick);
        self.gems.decay(tick);
        if self.gems.visible(tick).next().is_some() {
            self.last_gem_tick = tick;
        }

        if let Some(level) = observation.signal_level {
            self.signal.observe(observation.position, level);
        }
    }

    fn decide(&mut self) -> (Move, &'static str) {
        let hunting = self.is_hunting();
        let mut ctx = TickContext::new(
            self.tick,
            self.position,
            hunting,
            &self.config,
            &self.map,
            &self.gems,
            &self.signal,
            &self.positions,
            self.tie_breaker.as_ref(),
            &mut self.plan,
        );
        cascade().tick(&mut ctx);
        ctx.decision().unwrap_or((Move::FALLBACK, TERMINAL))
    }

    /// Whether signal-hunt mode is active for the current tick.
    pub fn is_hunting(&self) -> bool {
        is_hunt_active(self.tick, self.last_gem_tick, self.config.hunt_threshold)
    }

    /// Whether the configured tick budget has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.tick >= self.config.max_ticks
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn tick_index(&self) -> u64 {
        self.tick
    }

    pub fn last_gem_tick(&self) -> u64 {
        self.last_gem_tick
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    pub fn gems(&self) -> &GemTracker {
        &self.gems
    }

    pub fn signal(&self) -> &SignalEstimator {
        &self.signal
    }

    pub fn positions(&self) -> &PositionHistory {
        &self.positions
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    /// Name of the strategy that produced the latest move.
    pub fn last_strategy(&self) -> Option<&'static str> {
        self.last_strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(width: u32, height: u32) -> DecisionEngine {
        DecisionEngine::new(AgentConfig::new().with_dimensions(width, height))
            .expect("valid config")
    }

    #[test]
    fn rejects_invalid_config() {
        let err = DecisionEngine::new(AgentConfig::new().with_dimensions(0, 5)).unwrap_err();
        assert_eq!(err, ConfigError::EmptyGrid { width: 0, height: 5 });
    }

    #[test]
    fn out_of_bounds_position_waits() {
        let mut engine = engine(5, 5);
        let mv = engine.tick(&Observation::new(1, Cell::new(9, 9)));
        assert_eq!(mv, Move::Wait);
        assert_eq!(engine.last_strategy(), Some(TERMINAL));
        assert_eq!(engine.map().visits(Cell::new(4, 4)), 0);
    }

    #[test]
    fn boxed_in_agent_waits() {
        let mut engine = engine(3, 3);
        let centre = Cell::new(1, 1);
        let walls = [
            Cell::new(1, 0),
            Cell::new(1, 2),
            Cell::new(0, 1),
            Cell::new(2, 1),
        ];
        let mv = engine.tick(&Observation::new(1, centre).with_walls(walls));
        assert_eq!(mv, Move::Wait);
        assert_eq!(engine.last_strategy(), Some(TERMINAL));
    }

    #[test]
    fn visible_gem_resets_hunt_clock() {
        let mut engine =
            DecisionEngine::new(AgentConfig::new().with_dimensions(5, 5).with_hunt_threshold(3))
                .expect("valid config");
        engine.tick(&Observation::new(3, Cell::ORIGIN));
        assert!(engine.is_hunting());

        engine.tick(&Observation::new(4, Cell::ORIGIN).with_gem(Cell::new(4, 4), 20));
        assert_eq!(engine.last_gem_tick(), 4);
        assert!(!engine.is_hunting());
    }

    #[test]
    fn failed_move_drops_plan() {
        let mut engine = engine(5, 1);
        let floors = [Cell::new(0, 0), Cell::new(1, 0)];
        let first = engine.tick(&Observation::new(1, Cell::ORIGIN).with_floors(floors));
        assert_eq!(first, Move::East);
        assert!(engine.plan().is_some());

        // The move did not happen; the cached route is no longer trusted.
        engine.tick(&Observation::new(2, Cell::ORIGIN).with_floors(floors));
        assert_eq!(engine.positions().len(), 2);
        assert_eq!(engine.last_strategy(), Some(FrontierExplore::NAME));
    }
}
