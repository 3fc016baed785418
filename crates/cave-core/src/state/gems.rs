//! Belief state about collectible gems.
//!
//! Gems are either confirmed by a direct sighting (exact ttl known) or
//! estimated (inferred, decaying confidence, no ttl). Confirmed gems that drop
//! out of view are kept for one missed tick, then treated as collected unless
//! their ttl had already run out.

use std::collections::{BTreeMap, BTreeSet};

use super::geometry::Cell;

/// Confidence multiplier applied to estimated gems per elapsed tick.
const ESTIMATE_DECAY: f64 = 0.97;
/// Estimated gems below this confidence are forgotten.
const ESTIMATE_FLOOR: f64 = 0.05;

const DISTANCE_WEIGHT: f64 = 0.6;
const URGENCY_WEIGHT: f64 = 0.4;

/// A gem reported by the current observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleGem {
    pub cell: Cell,
    pub ttl: u32,
}

impl VisibleGem {
    pub const fn new(cell: Cell, ttl: u32) -> Self {
        Self { cell, ttl }
    }
}

/// How the tracker came to believe in a gem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GemKind {
    /// Directly observed; `ttl` is the remaining lifetime as of `last_seen`.
    Confirmed { ttl: u32 },
    /// Inferred without a sighting.
    Estimated,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gem {
    pub cell: Cell,
    pub kind: GemKind,
    pub confidence: f64,
    pub last_seen: u64,
}

impl Gem {
    pub fn is_confirmed(&self) -> bool {
        matches!(self.kind, GemKind::Confirmed { .. })
    }

    /// Remaining lifetime at `tick`, or `None` for estimated gems.
    pub fn remaining_ttl(&self, tick: u64) -> Option<u32> {
        match self.kind {
            GemKind::Confirmed { ttl } => {
                let elapsed = tick.saturating_sub(self.last_seen);
                Some(u64::from(ttl).saturating_sub(elapsed) as u32)
            }
            GemKind::Estimated => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GemTracker {
    width: u32,
    height: u32,
    vis_radius: f64,
    ttl_reference: f64,
    gems: BTreeMap<Cell, Gem>,
    collected: BTreeSet<Cell>,
    expired: u32,
    last_decay: u64,
}

impl GemTracker {
    pub fn new(width: u32, height: u32, vis_radius: u32, ttl_reference: f64) -> Self {
        Self {
            width,
            height,
            vis_radius: f64::from(vis_radius.max(1)),
            ttl_reference,
            gems: BTreeMap::new(),
            collected: BTreeSet::new(),
            expired: 0,
            last_decay: 0,
        }
    }

    fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as u32) < self.width
            && (cell.y as u32) < self.height
    }

    /// Applies this tick's sightings.
    ///
    /// Every visible gem becomes (or stays) confirmed with full confidence.
    /// Confirmed gems unseen for more than one tick are dropped: into the
    /// collected set when they still had ttl left, into the expired counter
    /// otherwise.
    pub fn update(&mut self, visible: &[VisibleGem], tick: u64) {
        for gem in visible {
            if !self.contains(gem.cell) {
                tracing::warn!(cell = %gem.cell, "ignored out-of-bounds gem");
                continue;
            }
            self.gems.insert(
                gem.cell,
                Gem {
                    cell: gem.cell,
                    kind: GemKind::Confirmed { ttl: gem.ttl },
                    confidence: 1.0,
                    last_seen: tick,
                },
            );
        }

        let stale: Vec<Gem> = self
            .gems
            .values()
            .filter(|gem| gem.is_confirmed() && gem.last_seen.saturating_add(1) < tick)
            .copied()
            .collect();

        for gem in stale {
            self.gems.remove(&gem.cell);
            if gem.remaining_ttl(tick).unwrap_or(0) > 0 {
                if self.collected.insert(gem.cell) {
                    tracing::debug!(cell = %gem.cell, tick, "gem collected");
                }
            } else {
                self.expired += 1;
                tracing::debug!(cell = %gem.cell, tick, "gem expired");
            }
        }
    }

    /// Advances time-based decay to `tick`.
    ///
    /// Confirmed gems out of sight whose ttl has run out are removed without
    /// being marked collected. Estimated gems lose confidence and are
    /// forgotten below the floor.
    pub fn decay(&mut self, tick: u64) {
        let previous = self.last_decay;
        self.last_decay = previous.max(tick);

        let mut expired = 0;
        self.gems.retain(|_, gem| match gem.kind {
            GemKind::Confirmed { .. } => {
                let alive = gem.last_seen == tick || gem.remaining_ttl(tick).unwrap_or(0) > 0;
                if !alive {
                    expired += 1;
                }
                alive
            }
            GemKind::Estimated => {
                let elapsed = tick.saturating_sub(gem.last_seen.max(previous));
                gem.confidence *= ESTIMATE_DECAY.powi(elapsed.min(i32::MAX as u64) as i32);
                gem.confidence >= ESTIMATE_FLOOR
            }
        });
        self.expired += expired;
    }

    /// Records an inferred gem. A confirmed gem at the same cell wins.
    ///
    /// No observation field carries inferred gems, so [`DecisionEngine`]
    /// never calls this; it only decays whatever a caller records here.
    ///
    /// [`DecisionEngine`]: crate::engine::DecisionEngine
    pub fn estimate(&mut self, cell: Cell, confidence: f64, tick: u64) {
        if !self.contains(cell) || !confidence.is_finite() {
            return;
        }
        if self.gems.get(&cell).is_some_and(Gem::is_confirmed) {
            return;
        }
        self.gems.insert(
            cell,
            Gem {
                cell,
                kind: GemKind::Estimated,
                confidence: confidence.clamp(0.0, 1.0),
                last_seen: tick,
            },
        );
    }

    pub fn get(&self, cell: Cell) -> Option<&Gem> {
        self.gems.get(&cell)
    }

    pub fn confirmed(&self) -> impl Iterator<Item = &Gem> {
        self.gems.values().filter(|gem| gem.is_confirmed())
    }

    pub fn estimated(&self) -> impl Iterator<Item = &Gem> {
        self.gems.values().filter(|gem| !gem.is_confirmed())
    }

    /// Confirmed gems sighted on `tick`.
    pub fn visible(&self, tick: u64) -> impl Iterator<Item = &Gem> {
        self.confirmed().filter(move |gem| gem.last_seen == tick)
    }

    /// Closest confirmed gem by Manhattan distance, ties by cell order.
    pub fn nearest_confirmed(&self, from: Cell) -> Option<Cell> {
        Self::nearest(self.confirmed(), from)
    }

    /// Closest confirmed gem that was not sighted on `tick`, other than one
    /// at `from` itself.
    pub fn nearest_remembered(&self, from: Cell, tick: u64) -> Option<Cell> {
        let remembered = self
            .confirmed()
            .filter(|gem| gem.last_seen < tick && gem.cell != from);
        Self::nearest(remembered, from)
    }

    fn nearest<'a>(gems: impl Iterator<Item = &'a Gem>, from: Cell) -> Option<Cell> {
        // Iteration is in cell order, so `min_by_key` keeps the smallest cell on ties.
        gems.map(|gem| gem.cell)
            .min_by_key(|cell| cell.manhattan_distance(from))
    }

    /// Composite desirability of `gem` seen from `from`; higher is better.
    ///
    /// Blends proximity (`exp(-d / vis_radius)`) with urgency
    /// (`ttl / ttl_reference`). Estimated gems carry no urgency and their
    /// proximity term is scaled by confidence; the engine's own cascade only
    /// ever scores confirmed gems.
    pub fn score(&self, gem: &Gem, from: Cell, tick: u64) -> f64 {
        let distance = f64::from(gem.cell.manhattan_distance(from));
        let distance_score = (-distance / self.vis_radius).exp();
        match gem.remaining_ttl(tick) {
            Some(ttl) => {
                let urgency_score = f64::from(ttl) / self.ttl_reference;
                DISTANCE_WEIGHT * distance_score + URGENCY_WEIGHT * urgency_score
            }
            None => DISTANCE_WEIGHT * distance_score * gem.confidence,
        }
    }

    pub fn is_collected(&self, cell: Cell) -> bool {
        self.collected.contains(&cell)
    }

    pub fn collected(&self) -> &BTreeSet<Cell> {
        &self.collected
    }

    pub fn collected_count(&self) -> usize {
        self.collected.len()
    }

    pub fn expired_count(&self) -> u32 {
        self.expired
    }

    pub fn len(&self) -> usize {
        self.gems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> GemTracker {
        GemTracker::new(10, 10, 5, 300.0)
    }

    #[test]
    fn survives_one_missed_tick() {
        let mut gems = tracker();
        gems.update(&[VisibleGem::new(Cell::new(3, 3), 50)], 10);
        gems.update(&[], 11);
        assert!(gems.get(Cell::new(3, 3)).is_some());
        assert!(!gems.is_collected(Cell::new(3, 3)));
    }

    #[test]
    fn sighting_refreshes_record() {
        let mut gems = tracker();
        gems.update(&[VisibleGem::new(Cell::new(3, 3), 50)], 10);
        gems.update(&[VisibleGem::new(Cell::new(3, 3), 40)], 12);
        let gem = gems.get(Cell::new(3, 3)).copied();
        assert_eq!(gem.map(|g| g.last_seen), Some(12));
        assert_eq!(gem.map(|g| g.kind), Some(GemKind::Confirmed { ttl: 40 }));
    }

    #[test]
    fn timed_out_gem_is_expired_not_collected() {
        let mut gems = tracker();
        gems.update(&[VisibleGem::new(Cell::new(1, 1), 1)], 5);
        gems.update(&[], 7);
        assert!(gems.is_empty());
        assert_eq!(gems.collected_count(), 0);
        assert_eq!(gems.expired_count(), 1);
    }

    #[test]
    fn decay_removes_out_of_sight_gems_past_ttl() {
        let mut gems = tracker();
        gems.update(&[VisibleGem::new(Cell::new(1, 1), 1)], 5);
        gems.decay(5);
        assert_eq!(gems.len(), 1);
        gems.update(&[], 6);
        gems.decay(6);
        assert!(gems.is_empty());
        assert_eq!(gems.expired_count(), 1);
        assert_eq!(gems.collected_count(), 0);
    }

    #[test]
    fn estimates_decay_and_never_override_confirmed() {
        let mut gems = tracker();
        gems.estimate(Cell::new(4, 4), 0.5, 0);
        gems.decay(1);
        let confidence = gems.get(Cell::new(4, 4)).map(|g| g.confidence);
        assert!(confidence.is_some_and(|c| c < 0.5));

        gems.decay(200);
        assert!(gems.estimated().next().is_none());

        gems.update(&[VisibleGem::new(Cell::new(2, 2), 9)], 200);
        gems.estimate(Cell::new(2, 2), 0.9, 200);
        assert!(gems.get(Cell::new(2, 2)).is_some_and(Gem::is_confirmed));
    }

    #[test]
    fn sighting_replaces_estimate() {
        let mut gems = tracker();
        gems.estimate(Cell::new(4, 4), 0.8, 0);
        gems.update(&[VisibleGem::new(Cell::new(4, 4), 20)], 1);
        assert!(gems.get(Cell::new(4, 4)).is_some_and(Gem::is_confirmed));
    }

    #[test]
    fn nearest_breaks_ties_by_cell_order() {
        let mut gems = tracker();
        gems.update(
            &[
                VisibleGem::new(Cell::new(6, 5), 10),
                VisibleGem::new(Cell::new(4, 5), 10),
                VisibleGem::new(Cell::new(5, 8), 10),
            ],
            1,
        );
        assert_eq!(gems.nearest_confirmed(Cell::new(5, 5)), Some(Cell::new(4, 5)));
        assert_eq!(gems.nearest_remembered(Cell::new(5, 5), 1), None);
        assert_eq!(gems.nearest_remembered(Cell::new(5, 5), 2), Some(Cell::new(4, 5)));
    }

    #[test]
    fn remembered_gem_under_the_agent_is_skipped() {
        let mut gems = tracker();
        gems.update(
            &[
                VisibleGem::new(Cell::new(2, 2), 30),
                VisibleGem::new(Cell::new(7, 2), 30),
            ],
            1,
        );
        assert_eq!(gems.nearest_remembered(Cell::new(2, 2), 2), Some(Cell::new(7, 2)));
        assert_eq!(gems.nearest_confirmed(Cell::new(2, 2)), Some(Cell::new(2, 2)));
    }

    #[test]
    fn score_blends_distance_and_urgency() {
        let gems = tracker();
        let near = Gem {
            cell: Cell::new(1, 0),
            kind: GemKind::Confirmed { ttl: 300 },
            confidence: 1.0,
            last_seen: 0,
        };
        let score = gems.score(&near, Cell::ORIGIN, 0);
        let expected = 0.6 * (-1.0f64 / 5.0).exp() + 0.4;
        assert!((score - expected).abs() < 1e-12);

        let far = Gem {
            cell: Cell::new(9, 9),
            ..near
        };
        assert!(gems.score(&far, Cell::ORIGIN, 0) < score);
    }

    #[test]
    fn out_of_bounds_gems_are_ignored() {
        let mut gems = tracker();
        gems.update(&[VisibleGem::new(Cell::new(10, 0), 5)], 0);
        assert!(gems.is_empty());
    }
}
