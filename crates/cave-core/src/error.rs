//! Error types for the decision core.
//!
//! Nothing in the per-tick path is fatal: search failures are ordinary empty
//! results and out-of-bounds input is dropped. The only error surfaced to
//! callers is an unusable configuration.

/// Invalid agent configuration.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid must be non-empty, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("grid {width}x{height} is too large")]
    GridTooLarge { width: u32, height: u32 },

    #[error("visibility radius must be positive")]
    ZeroVisibility,

    #[error("replan interval must be positive")]
    ZeroReplanInterval,

    #[error("revisit penalty must be finite and non-negative, got {0}")]
    InvalidRevisitPenalty(f64),

    #[error("ttl reference must be finite and positive, got {0}")]
    InvalidTtlReference(f64),
}
