//! Derived feature extraction for the decision engine.
//!
//! Nothing in here is persisted: the feature set is recomputed from the
//! world model at the start of every planning cycle, so it can never go
//! stale relative to the snapshot it was derived from.

use crate::safety::{NearestSafe, SafetyMap};
use crate::state::{MatchStage, MatchState, Peer, Position, glyph};

/// The crisp inputs of one planning cycle.
///
/// Every field an observation may not have produced yet is optional; the
/// decision engine degrades to its fallback target rather than crash when
/// something is missing.
#[derive(Clone, Copy, Debug)]
pub struct FeatureSet {
    pub flag_distance: Option<f64>,
    /// Longest possible flag distance on this grid (the diagonal).
    pub max_flag_distance: Option<f64>,
    pub nearest_enemy: Option<(f64, Position)>,
    pub nearest_ally: Option<(f64, Position)>,
    pub nearest_recharge: Option<(f64, Position)>,
    pub safe_cell: NearestSafe,
    pub energy: i64,
    pub stage: MatchStage,
    pub alive_ally_ratio: Option<f64>,
    pub wanted_flag: Option<Position>,
    pub defended_flag: Option<Position>,
}

impl FeatureSet {
    /// Derives the full feature set from the current world model.
    pub fn extract(state: &MatchState) -> Self {
        let me = state.me.position;
        let flags = state.flags;

        let safe_cell = match (&state.danger, me) {
            (Some(danger), Some(position)) => {
                SafetyMap::new(danger).nearest_safe_cell(position)
            }
            _ => NearestSafe::Unreachable,
        };

        Self {
            flag_distance: match (me, flags) {
                (Some(me), Some(flags)) => Some(me.euclidean(flags.wanted)),
                _ => None,
            },
            max_flag_distance: state.occupancy.as_ref().map(|grid| grid.diagonal()),
            nearest_enemy: me.and_then(|me| nearest_peer(state.enemies.values(), me)),
            nearest_ally: me.and_then(|me| nearest_peer(state.allies.values(), me)),
            nearest_recharge: me.and_then(|me| nearest_recharge(state, me)),
            safe_cell,
            energy: state.me.energy,
            stage: state.stage,
            alive_ally_ratio: state.alive_ally_ratio(),
            wanted_flag: flags.map(|flags| flags.wanted),
            defended_flag: flags.map(|flags| flags.defended),
        }
    }
}

fn nearest_peer<'a>(
    peers: impl Iterator<Item = &'a Peer>,
    me: Position,
) -> Option<(f64, Position)> {
    peers
        .filter(|peer| peer.is_alive())
        .filter_map(|peer| peer.position)
        .map(|position| (me.euclidean(position), position))
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
}

fn nearest_recharge(state: &MatchState, me: Position) -> Option<(f64, Position)> {
    let grid = state.occupancy.as_ref()?;
    grid.positions_of(glyph::RECHARGE)
        .map(|position| (me.euclidean(position), position))
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{OccupancyGrid, PlayerStatus, Symbol, TeamId};

    fn populated_state() -> MatchState {
        let mut state = MatchState::new("karen");
        state.me.symbol = Some(Symbol('A'));
        state.me.team = Some(TeamId("0".into()));
        let rows: Vec<Vec<char>> = [
            "A....$",
            "......",
            "..c...",
            "b....x",
            "X.....",
        ]
        .iter()
        .map(|row| row.chars().collect())
        .collect();
        state.occupancy = Some(OccupancyGrid::from_rows(&rows).unwrap());
        state.me.position = Some(Position::new(0, 0));

        let mut rival = Peer::sighted(Symbol('c'), "rival", TeamId("1".into()));
        rival.position = Some(Position::new(2, 2));
        state.observe_new_peer(rival);

        let mut other = Peer::sighted(Symbol('b'), "other", TeamId("1".into()));
        other.position = Some(Position::new(0, 3));
        state.observe_new_peer(other);
        state
    }

    #[test]
    fn nearest_queries_pick_the_closest_living_entity() {
        let mut state = populated_state();
        let features = FeatureSet::extract(&state);
        // (2,2) is sqrt(8) away, (0,3) is 3 away.
        assert_eq!(features.nearest_enemy.unwrap().1, Position::new(2, 2));

        // A dead enemy no longer counts as a threat.
        state.enemies.get_mut(&'c').unwrap().status = PlayerStatus::Killed;
        let features = FeatureSet::extract(&state);
        assert_eq!(features.nearest_enemy.unwrap().1, Position::new(0, 3));
    }

    #[test]
    fn recharge_is_found_on_the_occupancy_grid() {
        let features = FeatureSet::extract(&populated_state());
        assert_eq!(features.nearest_recharge.unwrap().1, Position::new(5, 0));
    }

    #[test]
    fn missing_observations_leave_features_unset() {
        let state = MatchState::new("karen");
        let features = FeatureSet::extract(&state);

        assert!(features.flag_distance.is_none());
        assert!(features.nearest_enemy.is_none());
        assert!(features.nearest_recharge.is_none());
        assert_eq!(features.safe_cell, NearestSafe::Unreachable);
        assert!(features.alive_ally_ratio.is_none());
    }
}
