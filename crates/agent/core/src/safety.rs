//! Safety-map queries over the danger grid.
//!
//! The weighted map itself is produced by an external generator behind
//! [`DangerModel`]; this module only answers the two questions the decision
//! engine asks every cycle: how dangerous is a cell, and where is the
//! nearest safe cell within immediate reach.

use crate::state::{DangerGrid, MatchState, Position};

/// Rebuilds the danger grid from the current occupancy (black-box
/// weighted-map generator, re-run whenever the occupancy changes).
pub trait DangerModel: Send + Sync {
    fn rebuild(&self, state: &MatchState) -> DangerGrid;
}

/// Outcome of the bounded nearest-safe-cell probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NearestSafe {
    /// The current cell is already safe.
    Here(Position),
    /// One orthogonal step away.
    Orthogonal(Position),
    /// One diagonal step (two moves) away.
    Diagonal(Position),
    /// Nothing safe within the probe; callers fall back to flag-seeking.
    Unreachable,
}

impl NearestSafe {
    /// Distance class on the fuzzification domain: 0, 1, 2, or 3-plus.
    pub const fn distance_class(self) -> u8 {
        match self {
            NearestSafe::Here(_) => 0,
            NearestSafe::Orthogonal(_) => 1,
            NearestSafe::Diagonal(_) => 2,
            NearestSafe::Unreachable => 3,
        }
    }

    pub const fn position(self) -> Option<Position> {
        match self {
            NearestSafe::Here(pos)
            | NearestSafe::Orthogonal(pos)
            | NearestSafe::Diagonal(pos) => Some(pos),
            NearestSafe::Unreachable => None,
        }
    }
}

/// Read-only view answering danger queries for one planning cycle.
pub struct SafetyMap<'a> {
    danger: &'a DangerGrid,
}

// Probe order is fixed: up, left, right, down, then the four diagonals
// clockwise from upper-left. The first safe cell wins.
const ORTHOGONAL_PROBES: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
const DIAGONAL_PROBES: [(i32, i32); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

impl<'a> SafetyMap<'a> {
    pub fn new(danger: &'a DangerGrid) -> Self {
        Self { danger }
    }

    /// Danger weight at a cell; off-grid cells are maximally dangerous.
    pub fn danger_at(&self, position: Position) -> u32 {
        self.danger.get(position).unwrap_or(u32::MAX)
    }

    pub fn is_safe(&self, position: Position) -> bool {
        self.danger.is_safe(position)
    }

    /// Bounded, constant-time probe for the nearest safe cell: the current
    /// cell, the four orthogonal neighbors, then the four diagonals.
    pub fn nearest_safe_cell(&self, from: Position) -> NearestSafe {
        if self.danger.is_safe(from) {
            return NearestSafe::Here(from);
        }
        for (dx, dy) in ORTHOGONAL_PROBES {
            let probe = Position::new(from.x + dx, from.y + dy);
            if self.danger.is_safe(probe) {
                return NearestSafe::Orthogonal(probe);
            }
        }
        for (dx, dy) in DIAGONAL_PROBES {
            let probe = Position::new(from.x + dx, from.y + dy);
            if self.danger.is_safe(probe) {
                return NearestSafe::Diagonal(probe);
            }
        }
        NearestSafe::Unreachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateError;

    fn hostile_grid() -> DangerGrid {
        DangerGrid::uniform(5, 5, 9)
    }

    #[test]
    fn current_cell_wins_when_safe() {
        let mut danger = hostile_grid();
        danger.set(Position::new(2, 2), DangerGrid::SAFE).unwrap();

        let map = SafetyMap::new(&danger);
        assert_eq!(
            map.nearest_safe_cell(Position::new(2, 2)),
            NearestSafe::Here(Position::new(2, 2))
        );
    }

    #[test]
    fn probe_order_prefers_up_over_other_orthogonals() {
        let mut danger = hostile_grid();
        danger.set(Position::new(2, 1), DangerGrid::SAFE).unwrap();
        danger.set(Position::new(3, 2), DangerGrid::SAFE).unwrap();

        let map = SafetyMap::new(&danger);
        assert_eq!(
            map.nearest_safe_cell(Position::new(2, 2)),
            NearestSafe::Orthogonal(Position::new(2, 1))
        );
    }

    #[test]
    fn diagonals_are_probed_after_orthogonals() {
        let mut danger = hostile_grid();
        danger.set(Position::new(1, 1), DangerGrid::SAFE).unwrap();

        let map = SafetyMap::new(&danger);
        let found = map.nearest_safe_cell(Position::new(2, 2));
        assert_eq!(found, NearestSafe::Diagonal(Position::new(1, 1)));
        assert_eq!(found.distance_class(), 2);
    }

    #[test]
    fn no_safe_neighbor_reports_three_plus_without_coordinates() {
        let danger = hostile_grid();
        let map = SafetyMap::new(&danger);

        let found = map.nearest_safe_cell(Position::new(2, 2));
        assert_eq!(found, NearestSafe::Unreachable);
        assert_eq!(found.distance_class(), 3);
        assert_eq!(found.position(), None);
    }

    #[test]
    fn off_grid_cells_are_maximally_dangerous() -> Result<(), StateError> {
        let danger = hostile_grid();
        let map = SafetyMap::new(&danger);
        assert_eq!(map.danger_at(Position::new(-1, 0)), u32::MAX);
        assert_eq!(map.danger_at(Position::new(0, 0)), 9);
        Ok(())
    }
}
