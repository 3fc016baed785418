use crate::state::{Cell, VisibleGem};

/// Everything the agent learns on one tick.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub tick: u64,
    pub position: Cell,
    pub walls: Vec<Cell>,
    pub floors: Vec<Cell>,
    pub visible_gems: Vec<VisibleGem>,
    /// Ambient signal strength at `position`, when the world reports one.
    pub signal_level: Option<f64>,
}

impl Observation {
    pub fn new(tick: u64, position: Cell) -> Self {
        Self {
            tick,
            position,
            ..Self::default()
        }
    }

    pub fn with_walls(mut self, walls: impl IntoIterator<Item = Cell>) -> Self {
        self.walls.extend(walls);
        self
    }

    pub fn with_floors(mut self, floors: impl IntoIterator<Item = Cell>) -> Self {
        self.floors.extend(floors);
        self
    }

    pub fn with_gem(mut self, cell: Cell, ttl: u32) -> Self {
        self.visible_gems.push(VisibleGem::new(cell, ttl));
        self
    }

    pub fn with_signal(mut self, signal_level: f64) -> Self {
        self.signal_level = Some(signal_level);
        self
    }
}
