//! Stdin/stdout collaborator around [`cave_core::DecisionEngine`].
//!
//! The binary reads one JSON observation per line, answers each with one move
//! token, and keeps all diagnostics on stderr.
pub mod config;
pub mod logging;
pub mod protocol;
pub mod runner;
pub use config::BotConfig;
pub use protocol::{ProtocolError, WireConfig, WireGem, WireObservation};
pub use runner::{RunSummary, Runner};
