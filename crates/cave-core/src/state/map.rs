//! Incremental model of the explored grid.
//!
//! The map starts fully [`Terrain::Unknown`] and is refined by observations.
//! Walls and floors are permanent once seen; the world is static.

use std::collections::BTreeSet;

use super::geometry::{Cell, Direction};

/// Classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    Unknown,
    Wall,
    Floor,
}

impl Terrain {
    /// Unknown cells are optimistically walkable until proven blocked.
    pub fn is_walkable(self) -> bool {
        !matches!(self, Terrain::Wall)
    }
}

/// Per-cell classification and visit counters, plus the derived frontier.
#[derive(Clone, Debug)]
pub struct WorldMap {
    width: u32,
    height: u32,
    terrain: Vec<Terrain>,
    visits: Vec<u32>,
    frontier: BTreeSet<Cell>,
}

impl WorldMap {
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            terrain: vec![Terrain::Unknown; len],
            visits: vec![0; len],
            frontier: BTreeSet::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as u32) < self.width
            && (cell.y as u32) < self.height
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Classification of `cell`; out-of-bounds cells read as walls.
    pub fn terrain(&self, cell: Cell) -> Terrain {
        self.index(cell)
            .map_or(Terrain::Wall, |index| self.terrain[index])
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.index(cell)
            .is_some_and(|index| self.terrain[index].is_walkable())
    }

    pub fn is_unknown(&self, cell: Cell) -> bool {
        self.index(cell)
            .is_some_and(|index| self.terrain[index] == Terrain::Unknown)
    }

    pub fn visits(&self, cell: Cell) -> u32 {
        self.index(cell).map_or(0, |index| self.visits[index])
    }

    /// Records one tick spent on `cell`.
    pub fn visit(&mut self, cell: Cell) {
        if let Some(index) = self.index(cell) {
            self.visits[index] = self.visits[index].saturating_add(1);
        }
    }

    /// Applies one tick of terrain observations.
    ///
    /// Walls win over floors reported for the same cell, and `position` is
    /// marked as floor since the agent is standing on it. Returns the number
    /// of out-of-bounds cells that were ignored.
    pub fn observe(&mut self, walls: &[Cell], floors: &[Cell], position: Cell) -> usize {
        let mut rejected = 0;
        let mut changed = false;

        for &cell in floors.iter().chain(std::iter::once(&position)) {
            match self.set(cell, Terrain::Floor) {
                Some(updated) => changed |= updated,
                None => rejected += 1,
            }
        }
        for &cell in walls {
            match self.set(cell, Terrain::Wall) {
                Some(updated) => changed |= updated,
                None => rejected += 1,
            }
        }

        if rejected > 0 {
            tracing::warn!(rejected, "ignored out-of-bounds terrain cells");
        }
        if changed {
            self.recompute_frontier();
        }
        rejected
    }

    /// Returns `None` when out of bounds, otherwise whether the cell changed.
    fn set(&mut self, cell: Cell, terrain: Terrain) -> Option<bool> {
        let index = self.index(cell)?;
        let previous = self.terrain[index];
        // A wall never turns back into floor.
        if previous == Terrain::Wall || previous == terrain {
            return Some(false);
        }
        self.terrain[index] = terrain;
        Some(true)
    }

    fn recompute_frontier(&mut self) {
        let mut frontier = BTreeSet::new();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let cell = Cell::new(x, y);
                if self.terrain(cell) == Terrain::Floor
                    && Direction::ALL
                        .into_iter()
                        .any(|direction| self.is_unknown(cell.step(direction)))
                {
                    frontier.insert(cell);
                }
            }
        }
        self.frontier = frontier;
    }

    /// Floor cells bordering at least one unknown cell, in cell order.
    ///
    /// Empty once every reachable region is sealed off or fully explored.
    pub fn frontier(&self) -> &BTreeSet<Cell> {
        &self.frontier
    }

    /// Walkable orthogonal neighbors of `cell`, in N, S, E, W order.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = (Direction, Cell)> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |direction| (direction, cell.step(direction)))
            .filter(|&(_, next)| self.is_walkable(next))
    }

    /// Fraction of cells that are no longer unknown.
    pub fn known_ratio(&self) -> f64 {
        if self.terrain.is_empty() {
            return 0.0;
        }
        let known = self
            .terrain
            .iter()
            .filter(|&&terrain| terrain != Terrain::Unknown)
            .count();
        known as f64 / self.terrain.len() as f64
    }
}
