//! The read-decide-write loop.
use std::io::{self, BufRead, Write};

use cave_core::{ConfigError, DecisionEngine, Move, Observation, SeededTieBreak};

use crate::config::BotConfig;
use crate::protocol::WireObservation;

/// Totals reported once the feed ends.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    /// Non-blank lines answered.
    pub answered: u64,
    /// Lines answered with the fallback because they could not be used.
    pub malformed: u64,
    pub last_tick: u64,
    pub gems_collected: usize,
    pub gems_expired: u32,
    pub explored: f64,
}

/// Drives a [`DecisionEngine`] from a line feed.
///
/// Each non-blank input line yields exactly one move token on its own line,
/// flushed immediately. The engine is built from the first line that parses
/// as JSON, even when that line carries no usable position.
pub struct Runner<R, W> {
    input: R,
    output: W,
    settings: BotConfig,
    engine: Option<DecisionEngine>,
    summary: RunSummary,
}

impl<R: BufRead, W: Write> Runner<R, W> {
    pub fn new(input: R, output: W, settings: BotConfig) -> Self {
        Self {
            input,
            output,
            settings,
            engine: None,
            summary: RunSummary::default(),
        }
    }

    /// Runs until the input ends or the tick budget is spent.
    ///
    /// Only I/O failures are returned; bad lines are answered with the fallback.
    pub fn run(mut self) -> io::Result<RunSummary> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                tracing::info!("observation feed closed");
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            let mv = self.handle_line(&line);
            writeln!(self.output, "{mv}")?;
            self.output.flush()?;

            if self.engine.as_ref().is_some_and(DecisionEngine::is_exhausted) {
                tracing::info!("tick budget reached");
                break;
            }
        }

        let summary = self.summary();
        tracing::info!(
            answered = summary.answered,
            malformed = summary.malformed,
            last_tick = summary.last_tick,
            collected = summary.gems_collected,
            expired = summary.gems_expired,
            explored = format_args!("{:.0}%", summary.explored * 100.0),
            "run finished"
        );
        Ok(summary)
    }

    /// Decides the move for one raw line. Never fails.
    pub fn handle_line(&mut self, line: &str) -> Move {
        self.summary.answered += 1;
        match self.try_handle_line(line) {
            Ok(mv) => mv,
            Err(reason) => {
                self.summary.malformed += 1;
                tracing::warn!(%reason, "answering with fallback");
                Move::FALLBACK
            }
        }
    }

    fn try_handle_line(&mut self, line: &str) -> Result<Move, LineError> {
        let wire = WireObservation::parse(line.trim())?;

        // The config block arrives once; honor it even if the rest of the
        // line is unusable.
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => self.build_engine(&wire)?,
        };
        let engine = self.engine.insert(engine);

        let observation = Observation::try_from(&wire)?;
        Ok(engine.tick(&observation))
    }

    fn build_engine(&self, wire: &WireObservation) -> Result<DecisionEngine, ConfigError> {
        let base = self.settings.agent_config();
        let config = match wire.config() {
            Ok(Some(config)) => config.apply(base.clone()),
            Ok(None) => base.clone(),
            Err(err) => {
                tracing::warn!(%err, "ignoring malformed config block");
                base.clone()
            }
        };

        let engine = match DecisionEngine::new(config) {
            Ok(engine) => engine,
            Err(err) => {
                tracing::warn!(%err, "invalid game config, using defaults");
                DecisionEngine::new(base)?
            }
        };
        let config = engine.config();
        tracing::info!(
            width = config.width,
            height = config.height,
            vis_radius = config.vis_radius,
            hunt_threshold = config.hunt_threshold,
            max_ticks = config.max_ticks,
            "cave explorer launching"
        );

        Ok(match self.settings.tie_break_seed {
            Some(seed) => engine.with_tie_breaker(SeededTieBreak::new(seed)),
            None => engine,
        })
    }

    pub fn engine(&self) -> Option<&DecisionEngine> {
        self.engine.as_ref()
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = self.summary.clone();
        if let Some(engine) = &self.engine {
            summary.last_tick = engine.tick_index();
            summary.gems_collected = engine.gems().collected_count();
            summary.gems_expired = engine.gems().expired_count();
            summary.explored = engine.map().known_ratio();
        }
        summary
    }
}

#[derive(Debug, thiserror::Error)]
enum LineError {
    #[error(transparent)]
    Protocol(#[from] crate::protocol::ProtocolError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
