//! Decision logic for a turn-based cave-exploration gem collector.
//!
//! `cave-core` is pure and deterministic: it knows nothing about stdin,
//! processes or wire formats. Each tick an [`Observation`] flows into
//! [`engine::DecisionEngine`], which updates its beliefs about the cave
//! (terrain, gems, ambient signal) and answers with a single [`Move`].
//! Identical observation sequences always produce identical moves.
pub mod config;
pub mod engine;
pub mod error;
pub mod observation;
pub mod path;
pub mod rng;
pub mod state;
pub use config::AgentConfig;
pub use engine::{DecisionEngine, Plan, PlanKind, PositionHistory};
pub use error::ConfigError;
pub use observation::Observation;
pub use path::{cost_aware_path_to_any, shortest_path, shortest_path_to_any};
pub use rng::{FixedPriority, SeededTieBreak, TieBreaker};
pub use state::{
    Cell, Direction, Gem, GemKind, GemTracker, History, Move, SignalEstimator, SignalHistory,
    SignalSample, Terrain, Vector2, VisibleGem, WorldMap,
};
