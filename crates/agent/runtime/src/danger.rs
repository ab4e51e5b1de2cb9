//! Default danger-map generator.
//!
//! The weighted-map generator is an external collaborator consumed through
//! [`DangerModel`]; this module ships the out-of-the-box implementation:
//! every living enemy projects weight onto the cells it can reach, with the
//! full ceiling weight on its firing lines and a gradient falling off with
//! distance elsewhere. Cells no enemy reaches keep the safe weight.

use agent_core::safety::DangerModel;
use agent_core::state::{DangerGrid, MatchState, Position};

/// Weights cells by enemy reach: firing lines first, proximity second.
#[derive(Clone, Copy, Debug)]
pub struct LineOfFireModel {
    /// Weight assigned to cells directly in an enemy's line of fire.
    pub max_weight: u32,
    /// Straight-line range of an enemy shot, in cells.
    pub attack_range: u32,
}

impl LineOfFireModel {
    pub fn new(max_weight: u32, attack_range: u32) -> Self {
        Self {
            max_weight: max_weight.max(2),
            attack_range: attack_range.max(1),
        }
    }
}

impl DangerModel for LineOfFireModel {
    fn rebuild(&self, state: &MatchState) -> DangerGrid {
        let Some(grid) = state.occupancy.as_ref() else {
            return DangerGrid::uniform(0, 0, DangerGrid::SAFE);
        };

        let mut danger = DangerGrid::uniform(grid.width(), grid.height(), DangerGrid::SAFE);
        let threats: Vec<Position> = state
            .enemies
            .values()
            .filter(|enemy| enemy.is_alive())
            .filter_map(|enemy| enemy.position)
            .collect();

        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                let cell = Position::new(x, y);
                let mut weight = DangerGrid::SAFE;

                for &threat in &threats {
                    let aligned = (cell.x == threat.x || cell.y == threat.y)
                        && cell.manhattan(threat) <= self.attack_range;
                    let projected = if aligned {
                        self.max_weight
                    } else {
                        self.max_weight
                            .saturating_sub(cell.manhattan(threat))
                            .max(DangerGrid::SAFE)
                    };
                    weight = weight.max(projected);
                }

                // Uniform grids start safe, so only heavier cells are written.
                if weight > DangerGrid::SAFE {
                    let _ = danger.set(cell, weight);
                }
            }
        }

        danger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::state::{OccupancyGrid, Peer, Symbol, TeamId};

    fn state_with_enemy_at(pos: Position) -> MatchState {
        let mut state = MatchState::new("karen");
        state.me.team = Some(TeamId("0".into()));
        let rows: Vec<Vec<char>> = (0..12)
            .map(|_| ".".repeat(12).chars().collect())
            .collect();
        state.occupancy = Some(OccupancyGrid::from_rows(&rows).unwrap());
        let mut enemy = Peer::sighted(Symbol('z'), "rival", TeamId("1".into()));
        enemy.position = Some(pos);
        state.observe_new_peer(enemy);
        state
    }

    #[test]
    fn firing_lines_carry_the_ceiling_weight() {
        let model = LineOfFireModel::new(10, 5);
        let danger = model.rebuild(&state_with_enemy_at(Position::new(5, 5)));

        assert_eq!(danger.get(Position::new(5, 2)), Some(10));
        assert_eq!(danger.get(Position::new(8, 5)), Some(10));
        // Beyond range the line no longer applies.
        assert_eq!(danger.get(Position::new(11, 5)), Some(10 - 6));
    }

    #[test]
    fn weight_decays_with_distance_off_the_lines() {
        let model = LineOfFireModel::new(10, 5);
        let danger = model.rebuild(&state_with_enemy_at(Position::new(5, 5)));

        assert_eq!(danger.get(Position::new(7, 7)), Some(6));
        assert_eq!(danger.get(Position::new(0, 1)), Some(DangerGrid::SAFE));
    }

    #[test]
    fn dead_enemies_project_no_danger() {
        let mut state = state_with_enemy_at(Position::new(5, 5));
        state.enemies.get_mut(&'z').unwrap().status = agent_core::state::PlayerStatus::Killed;

        let model = LineOfFireModel::new(10, 5);
        let danger = model.rebuild(&state);
        assert!(danger.is_safe(Position::new(5, 6)));
    }
}
