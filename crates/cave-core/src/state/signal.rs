//! Ambient signal memory and gradient estimation.
//!
//! The heatmap keeps the strongest reading ever seen per cell. A short rolling
//! history of raw samples feeds the hunt scoring and the gradient's temporal
//! term. The gradient is a noisy approximation from sparse point samples and is
//! only meant as a fallback heuristic.

use super::geometry::{Cell, Vector2};
use super::history::History;
use super::map::{Terrain, WorldMap};
use crate::config::AgentConfig;

/// Gradients shorter than this are reported as zero.
const MIN_GRADIENT: f64 = 1e-9;

/// One `(position, signal)` reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalSample {
    pub cell: Cell,
    pub signal: f64,
}

/// Short-term ring of raw readings, oldest evicted first.
pub type SignalHistory = History<SignalSample, { AgentConfig::SIGNAL_HISTORY }>;

#[derive(Clone, Debug)]
pub struct SignalEstimator {
    width: u32,
    height: u32,
    heatmap: Vec<Option<f64>>,
    history: SignalHistory,
}

impl SignalEstimator {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            heatmap: vec![None; width as usize * height as usize],
            history: SignalHistory::new(),
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let inside = cell.x >= 0
            && cell.y >= 0
            && (cell.x as u32) < self.width
            && (cell.y as u32) < self.height;
        inside.then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Records a reading taken at `cell`.
    pub fn observe(&mut self, cell: Cell, signal: f64) {
        if !signal.is_finite() {
            tracing::warn!(%cell, signal, "ignored non-finite signal sample");
            return;
        }
        let Some(index) = self.index(cell) else {
            tracing::warn!(%cell, "ignored out-of-bounds signal sample");
            return;
        };
        let best = &mut self.heatmap[index];
        *best = Some(best.map_or(signal, |previous| previous.max(signal)));
        self.history.push(SignalSample { cell, signal });
    }

    /// Strongest reading ever observed at `cell`.
    pub fn value_at(&self, cell: Cell) -> Option<f64> {
        self.index(cell).and_then(|index| self.heatmap[index])
    }

    /// Most recent reading.
    pub fn current(&self) -> Option<SignalSample> {
        self.history.last().copied()
    }

    /// Most recent reading taken at `cell` that is still in the short-term history.
    pub fn latest_at(&self, cell: Cell) -> Option<SignalSample> {
        self.history
            .iter()
            .rev()
            .find(|sample| sample.cell == cell)
            .copied()
    }

    pub fn history(&self) -> &SignalHistory {
        &self.history
    }

    /// Unit vector pointing up the estimated signal slope at `cell`.
    ///
    /// Spatial term: each walkable neighbor with a heatmap value contributes
    /// its offset weighted by the value difference. Temporal term: the last
    /// two samples contribute their displacement weighted by their signal
    /// delta. Returns [`Vector2::ZERO`] when the sum is negligible.
    pub fn gradient(&self, cell: Cell, map: &WorldMap) -> Vector2 {
        let here = self.value_at(cell).unwrap_or(0.0);
        let mut accumulated = Vector2::ZERO;

        for (_, neighbor) in map.neighbors(cell) {
            if let Some(value) = self.value_at(neighbor) {
                accumulated += Vector2::between(cell, neighbor).scaled(value - here);
            }
        }

        if let (Some(current), Some(previous)) = (self.history.back(0), self.history.back(1)) {
            accumulated += Vector2::between(previous.cell, current.cell)
                .scaled(current.signal - previous.signal);
        }

        let length = accumulated.length();
        if length < MIN_GRADIENT {
            Vector2::ZERO
        } else {
            accumulated.scaled(1.0 / length)
        }
    }

    /// Non-wall cell with the highest heatmap value, ties by cell order.
    pub fn best_known_cell(&self, map: &WorldMap) -> Option<Cell> {
        let mut best: Option<(Cell, f64)> = None;
        for (index, value) in self.heatmap.iter().enumerate() {
            let Some(value) = *value else { continue };
            let cell = Cell::new(
                (index % self.width as usize) as i32,
                (index / self.width as usize) as i32,
            );
            if map.terrain(cell) == Terrain::Wall {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_cell, best_value)) => {
                    value > best_value || (value == best_value && cell < best_cell)
                }
            };
            if better {
                best = Some((cell, value));
            }
        }
        best.map(|(cell, _)| cell)
    }
}
