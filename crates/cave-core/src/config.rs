use crate::error::ConfigError;

/// Agent configuration constants and tunable parameters.
///
/// The first observation of a game carries the world-facing fields (grid size,
/// radii, thresholds). The remaining fields tune the decision cascade and are
/// normally left at their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentConfig {
    pub width: u32,
    pub height: u32,
    /// Radius of the agent's view, used to normalize gem distance scores.
    pub vis_radius: u32,
    /// Radius within which the ambient signal is reported.
    pub signal_radius: u32,
    /// Ticks without a visible gem after which signal hunting starts.
    pub hunt_threshold: u64,
    pub max_ticks: u64,
    /// Exploration plans are recomputed every this many ticks.
    pub replan_interval: u64,
    /// Extra A* cost per previous visit of a cell.
    pub revisit_penalty: f64,
    /// Normalization constant for gem urgency (`ttl / ttl_reference`).
    pub ttl_reference: f64,
}

impl AgentConfig {
    // ===== compile-time constants used as type parameters =====
    /// Capacity of the position history ring.
    pub const POSITION_HISTORY: usize = 16;
    /// Capacity of the short-term signal sample ring.
    pub const SIGNAL_HISTORY: usize = 8;
    /// Upper bound on `width * height`; per-cell arrays are allocated up front.
    pub const MAX_CELLS: u64 = 1 << 20;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_WIDTH: u32 = 19;
    pub const DEFAULT_HEIGHT: u32 = 19;
    pub const DEFAULT_VIS_RADIUS: u32 = 5;
    pub const DEFAULT_SIGNAL_RADIUS: u32 = 10;
    pub const DEFAULT_HUNT_THRESHOLD: u64 = 150;
    pub const DEFAULT_MAX_TICKS: u64 = 1200;
    pub const DEFAULT_REPLAN_INTERVAL: u64 = 10;
    pub const DEFAULT_REVISIT_PENALTY: f64 = 0.1;
    pub const DEFAULT_TTL_REFERENCE: f64 = 300.0;

    pub fn new() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            vis_radius: Self::DEFAULT_VIS_RADIUS,
            signal_radius: Self::DEFAULT_SIGNAL_RADIUS,
            hunt_threshold: Self::DEFAULT_HUNT_THRESHOLD,
            max_ticks: Self::DEFAULT_MAX_TICKS,
            replan_interval: Self::DEFAULT_REPLAN_INTERVAL,
            revisit_penalty: Self::DEFAULT_REVISIT_PENALTY,
            ttl_reference: Self::DEFAULT_TTL_REFERENCE,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_vis_radius(mut self, vis_radius: u32) -> Self {
        self.vis_radius = vis_radius;
        self
    }

    pub fn with_hunt_threshold(mut self, hunt_threshold: u64) -> Self {
        self.hunt_threshold = hunt_threshold;
        self
    }

    pub fn with_replan_interval(mut self, replan_interval: u64) -> Self {
        self.replan_interval = replan_interval;
        self
    }

    pub fn with_revisit_penalty(mut self, revisit_penalty: f64) -> Self {
        self.revisit_penalty = revisit_penalty;
        self
    }

    /// Checks the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        let cells = u64::from(self.width) * u64::from(self.height);
        if cells > Self::MAX_CELLS
            || i32::try_from(self.width).is_err()
            || i32::try_from(self.height).is_err()
        {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.vis_radius == 0 {
            return Err(ConfigError::ZeroVisibility);
        }
        if self.replan_interval == 0 {
            return Err(ConfigError::ZeroReplanInterval);
        }
        if !self.revisit_penalty.is_finite() || self.revisit_penalty < 0.0 {
            return Err(ConfigError::InvalidRevisitPenalty(self.revisit_penalty));
        }
        if !self.ttl_reference.is_finite() || self.ttl_reference <= 0.0 {
            return Err(ConfigError::InvalidTtlReference(self.ttl_reference));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}
