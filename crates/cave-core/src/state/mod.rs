//! Belief state owned by the decision engine.
//!
//! Every store here is updated once per tick from the observation, before the
//! cascade runs:
//! - [`WorldMap`]: terrain classification, visit counters, frontier
//! - [`GemTracker`]: confirmed and estimated gems, collection bookkeeping
//! - [`SignalEstimator`]: heatmap, sample history, gradient
pub mod gems;
pub mod geometry;
pub mod history;
pub mod map;
pub mod signal;

pub use gems::{Gem, GemKind, GemTracker, VisibleGem};
pub use geometry::{Cell, Direction, Move, Vector2};
pub use history::History;
pub use map::{Terrain, WorldMap};
pub use signal::{SignalEstimator, SignalHistory, SignalSample};
