//! Line-delimited JSON feed spoken by the game host.
//!
//! One JSON object per tick:
//!
//! ```json
//! {"tick": 3, "bot": [4, 7], "wall": [[4, 6]], "floor": [[5, 7]],
//!  "visible_gems": [{"position": [6, 7], "ttl": 120}], "signal_level": 0.42}
//! ```
//!
//! The first object may carry a `config` block. Every field except `bot` is
//! optional and defaults to empty.

use cave_core::{AgentConfig, Cell, Observation, VisibleGem};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coordinate pair as sent on the wire.
pub type WirePoint = [i64; 2];

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed observation: {0}")]
    Json(#[from] serde_json::Error),

    #[error("observation has no `bot` position")]
    MissingPosition,

    #[error("bot position [{x}, {y}] is negative")]
    NegativePosition { x: i64, y: i64 },

    #[error("coordinate [{x}, {y}] is out of range")]
    CoordinateOverflow { x: i64, y: i64 },
}

/// Raw per-tick observation.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WireObservation {
    pub tick: u64,
    pub bot: Option<WirePoint>,
    pub wall: Vec<WirePoint>,
    pub floor: Vec<WirePoint>,
    pub visible_gems: Vec<WireGem>,
    pub signal_level: Option<f64>,
    /// Kept untyped so a malformed block does not discard the observation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct WireGem {
    pub position: WirePoint,
    pub ttl: u32,
}

/// One-time game configuration. Absent fields keep their defaults.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct WireConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub vis_radius: Option<u32>,
    pub signal_radius: Option<u32>,
    pub hunt_threshold: Option<u64>,
    pub max_ticks: Option<u64>,
}

impl WireConfig {
    /// Overlays the fields present on the wire onto `base`.
    pub fn apply(&self, mut base: AgentConfig) -> AgentConfig {
        if let Some(width) = self.width {
            base.width = width;
        }
        if let Some(height) = self.height {
            base.height = height;
        }
        if let Some(vis_radius) = self.vis_radius {
            base.vis_radius = vis_radius;
        }
        if let Some(signal_radius) = self.signal_radius {
            base.signal_radius = signal_radius;
        }
        if let Some(hunt_threshold) = self.hunt_threshold {
            base.hunt_threshold = hunt_threshold;
        }
        if let Some(max_ticks) = self.max_ticks {
            base.max_ticks = max_ticks;
        }
        base
    }
}

impl WireObservation {
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(line)?)
    }

    /// The typed `config` block, if one was sent.
    pub fn config(&self) -> Result<Option<WireConfig>, ProtocolError> {
        self.config
            .clone()
            .map(serde_json::from_value)
            .transpose()
            .map_err(ProtocolError::from)
    }
}

fn to_cell([x, y]: WirePoint) -> Result<Cell, ProtocolError> {
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(cx), Ok(cy)) => Ok(Cell::new(cx, cy)),
        _ => Err(ProtocolError::CoordinateOverflow { x, y }),
    }
}

fn to_cells(points: &[WirePoint]) -> Result<Vec<Cell>, ProtocolError> {
    points.iter().copied().map(to_cell).collect()
}

/// Terrain and gem coordinates pass through unchecked against the grid; the
/// engine drops out-of-bounds cells itself. Only the agent position must be
/// non-negative.
impl TryFrom<&WireObservation> for Observation {
    type Error = ProtocolError;

    fn try_from(wire: &WireObservation) -> Result<Self, Self::Error> {
        let [x, y] = wire.bot.ok_or(ProtocolError::MissingPosition)?;
        if x < 0 || y < 0 {
            return Err(ProtocolError::NegativePosition { x, y });
        }
        let visible_gems = wire
            .visible_gems
            .iter()
            .map(|gem| Ok(VisibleGem::new(to_cell(gem.position)?, gem.ttl)))
            .collect::<Result<Vec<_>, ProtocolError>>()?;

        Ok(Observation {
            tick: wire.tick,
            position: to_cell([x, y])?,
            walls: to_cells(&wire.wall)?,
            floors: to_cells(&wire.floor)?,
            visible_gems,
            signal_level: wire.signal_level.filter(|level| level.is_finite()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_observation() {
        let line = r#"{"tick": 3, "bot": [4, 7], "wall": [[4, 6]], "floor": [[5, 7], [3, 7]],
            "visible_gems": [{"position": [6, 7], "ttl": 120}], "signal_level": 0.42}"#;
        let wire = WireObservation::parse(line).unwrap();
        let observation = Observation::try_from(&wire).unwrap();

        assert_eq!(observation.tick, 3);
        assert_eq!(observation.position, Cell::new(4, 7));
        assert_eq!(observation.walls, vec![Cell::new(4, 6)]);
        assert_eq!(observation.floors.len(), 2);
        assert_eq!(observation.visible_gems, vec![VisibleGem::new(Cell::new(6, 7), 120)]);
        assert_eq!(observation.signal_level, Some(0.42));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let wire = WireObservation::parse(r#"{"tick": 1, "bot": [0, 0]}"#).unwrap();
        let observation = Observation::try_from(&wire).unwrap();
        assert!(observation.walls.is_empty());
        assert!(observation.visible_gems.is_empty());
        assert_eq!(observation.signal_level, None);
        assert!(wire.config().unwrap().is_none());
    }

    #[test]
    fn rejects_bad_positions() {
        let wire = WireObservation::parse(r#"{"tick": 1}"#).unwrap();
        assert!(matches!(
            Observation::try_from(&wire),
            Err(ProtocolError::MissingPosition)
        ));

        let wire = WireObservation::parse(r#"{"tick": 1, "bot": [-1, 2]}"#).unwrap();
        assert!(matches!(
            Observation::try_from(&wire),
            Err(ProtocolError::NegativePosition { x: -1, y: 2 })
        ));

        let wire =
            WireObservation::parse(r#"{"tick": 1, "bot": [0, 0], "wall": [[9999999999, 0]]}"#)
                .unwrap();
        assert!(matches!(
            Observation::try_from(&wire),
            Err(ProtocolError::CoordinateOverflow { .. })
        ));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            WireObservation::parse("{not json"),
            Err(ProtocolError::Json(_))
        ));
        assert!(WireObservation::parse(r#"{"tick": "soon", "bot": [0, 0]}"#).is_err());
    }

    #[test]
    fn config_overlays_defaults() {
        let line = r#"{"tick": 1, "bot": [0, 0], "config": {"width": 25, "hunt_threshold": 90}}"#;
        let wire = WireObservation::parse(line).unwrap();
        let config = wire.config().unwrap().unwrap().apply(AgentConfig::default());
        assert_eq!(config.width, 25);
        assert_eq!(config.height, AgentConfig::DEFAULT_HEIGHT);
        assert_eq!(config.hunt_threshold, 90);
        assert_eq!(config.max_ticks, AgentConfig::DEFAULT_MAX_TICKS);
    }

    #[test]
    fn malformed_config_keeps_observation() {
        let line = r#"{"tick": 1, "bot": [2, 2], "config": {"width": "wide"}}"#;
        let wire = WireObservation::parse(line).unwrap();
        assert!(wire.config().is_err());
        assert!(Observation::try_from(&wire).is_ok());
    }
}
