//! Process configuration read from the environment.
use std::env;
use std::path::PathBuf;

use cave_core::AgentConfig;

/// Settings that do not travel on the wire.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BotConfig {
    /// Directory for a persistent log file, in addition to stderr.
    pub log_dir: Option<PathBuf>,
    pub replan_interval: Option<u64>,
    pub revisit_penalty: Option<f64>,
    /// Seeds the least-visited tie-break; fixed N, S, E, W priority when unset.
    pub tie_break_seed: Option<u64>,
}

impl BotConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CAVE_LOG_DIR` - Also write logs to `<dir>/cave-bot.log` (default: stderr only)
    /// - `CAVE_REPLAN_INTERVAL` - Ticks between exploration replans (default: 10)
    /// - `CAVE_REVISIT_PENALTY` - Extra path cost per prior visit (default: 0.1)
    /// - `CAVE_TIE_BREAK_SEED` - Seed for the least-visited tie-break (default: none)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`BotConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).map(|value| value.trim().to_owned());
        let mut config = Self::default();

        config.log_dir = read("CAVE_LOG_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        if let Some(interval) = read("CAVE_REPLAN_INTERVAL").and_then(|v| v.parse::<u64>().ok()) {
            config.replan_interval = Some(interval.max(1));
        }

        config.revisit_penalty = read("CAVE_REVISIT_PENALTY")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|penalty| penalty.is_finite() && *penalty >= 0.0);

        config.tie_break_seed = read("CAVE_TIE_BREAK_SEED").and_then(|v| v.parse().ok());

        config
    }

    /// Engine tunables with the environment overrides applied.
    pub fn agent_config(&self) -> AgentConfig {
        let mut config = AgentConfig::default();
        if let Some(interval) = self.replan_interval {
            config = config.with_replan_interval(interval);
        }
        if let Some(penalty) = self.revisit_penalty {
            config = config.with_revisit_penalty(penalty);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = BotConfig::from_lookup(lookup(&[]));
        assert_eq!(config, BotConfig::default());
        assert_eq!(config.agent_config(), AgentConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = BotConfig::from_lookup(lookup(&[
            ("CAVE_LOG_DIR", "/var/log/cave"),
            ("CAVE_REPLAN_INTERVAL", "4"),
            ("CAVE_REVISIT_PENALTY", "0.25"),
            ("CAVE_TIE_BREAK_SEED", " 99 "),
        ]));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/cave")));
        assert_eq!(config.tie_break_seed, Some(99));

        let agent = config.agent_config();
        assert_eq!(agent.replan_interval, 4);
        assert_eq!(agent.revisit_penalty, 0.25);
    }

    #[test]
    fn ignores_unusable_values() {
        let config = BotConfig::from_lookup(lookup(&[
            ("CAVE_LOG_DIR", ""),
            ("CAVE_REPLAN_INTERVAL", "0"),
            ("CAVE_REVISIT_PENALTY", "-3"),
            ("CAVE_TIE_BREAK_SEED", "lucky"),
        ]));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.replan_interval, Some(1));
        assert_eq!(config.revisit_penalty, None);
        assert_eq!(config.tie_break_seed, None);
        assert!(config.agent_config().validate().is_ok());
    }
}
