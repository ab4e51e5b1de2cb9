//! Tactical planning collaborator: single safe steps and short-horizon
//! reactive engagement.
//!
//! Pathfinding internals are outside this crate's concern; the machine only
//! depends on the [`TacticalPlanner`] trait. The bundled [`GreedyPlanner`]
//! picks the passable neighbor with the lowest (danger, distance) cost and
//! opens fire when an enemy sits on a firing line within range.

use arrayvec::ArrayVec;
use strum::IntoEnumIterator;
use thiserror::Error;

use agent_core::SafetyMap;
use agent_core::state::{Direction, MatchState, Position, glyph};

/// Atomic actions a reactive plan is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TacticalStep {
    Move(Direction),
    Shoot(Direction),
}

/// Planning failures, split so callers can tell a dead end from a bug.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlanError {
    /// Every neighbor is blocked or off-grid; not an error to recover from,
    /// just nothing to do this step.
    #[error("no viable move toward the target")]
    NoMoveAvailable,

    /// The planner was invoked in a state it cannot work with.
    #[error("planner fault: {reason}")]
    Fault { reason: String },
}

/// Short-horizon movement and combat planning toward a target cell.
pub trait TacticalPlanner: Send + Sync {
    /// One step toward `goal` preferring low-danger cells. Returns the
    /// direction and the cell it leads to.
    fn safe_step(&self, state: &MatchState, goal: Position)
    -> Result<(Direction, Position), PlanError>;

    /// Reactive plan for when a threat is close: possibly a shot, then a
    /// step toward `goal`.
    fn engage(&self, state: &MatchState, goal: Position) -> Result<Vec<TacticalStep>, PlanError>;
}

/// Default greedy planner.
#[derive(Clone, Copy, Debug)]
pub struct GreedyPlanner {
    /// Straight-line range of the agent's own shot.
    pub attack_range: u32,
}

impl GreedyPlanner {
    pub fn new(attack_range: u32) -> Self {
        Self {
            attack_range: attack_range.max(1),
        }
    }

    /// Direction of a living enemy on a firing line within range, if any.
    fn firing_solution(&self, state: &MatchState, me: Position) -> Option<Direction> {
        state
            .enemies
            .values()
            .filter(|enemy| enemy.is_alive())
            .filter_map(|enemy| enemy.position)
            .find_map(|enemy| {
                if enemy.manhattan(me) > self.attack_range {
                    return None;
                }
                if enemy.x == me.x {
                    Some(if enemy.y < me.y {
                        Direction::North
                    } else {
                        Direction::South
                    })
                } else if enemy.y == me.y {
                    Some(if enemy.x < me.x {
                        Direction::West
                    } else {
                        Direction::East
                    })
                } else {
                    None
                }
            })
    }
}

/// Terrain an agent may step onto.
fn passable(cell: char) -> bool {
    matches!(
        cell,
        glyph::EMPTY | glyph::RECHARGE | glyph::FLAG_LOWER | glyph::FLAG_UPPER
    )
}

impl TacticalPlanner for GreedyPlanner {
    fn safe_step(
        &self,
        state: &MatchState,
        goal: Position,
    ) -> Result<(Direction, Position), PlanError> {
        let me = state.me.position.ok_or_else(|| PlanError::Fault {
            reason: "own position unknown".to_owned(),
        })?;
        let grid = state.occupancy.as_ref().ok_or_else(|| PlanError::Fault {
            reason: "no grid observation".to_owned(),
        })?;

        let mut candidates: ArrayVec<(Direction, Position, u32, f64), 4> = ArrayVec::new();
        for direction in Direction::iter() {
            let target = me.step(direction);
            let Some(cell) = grid.get(target) else {
                continue;
            };
            if !passable(cell) {
                continue;
            }
            let weight = state
                .danger
                .as_ref()
                .map(|danger| SafetyMap::new(danger).danger_at(target))
                .unwrap_or(u32::MAX);
            candidates.push((direction, target, weight, target.euclidean(goal)));
        }

        candidates
            .iter()
            .min_by(|a, b| {
                (a.2, a.3)
                    .partial_cmp(&(b.2, b.3))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|&(direction, target, _, _)| (direction, target))
            .ok_or(PlanError::NoMoveAvailable)
    }

    fn engage(&self, state: &MatchState, goal: Position) -> Result<Vec<TacticalStep>, PlanError> {
        let me = state.me.position.ok_or_else(|| PlanError::Fault {
            reason: "own position unknown".to_owned(),
        })?;

        let mut steps = Vec::new();
        if let Some(direction) = self.firing_solution(state, me) {
            steps.push(TacticalStep::Shoot(direction));
        }

        match self.safe_step(state, goal) {
            Ok((direction, _)) => steps.push(TacticalStep::Move(direction)),
            Err(PlanError::NoMoveAvailable) => {}
            Err(fault) => return Err(fault),
        }

        if steps.is_empty() {
            Err(PlanError::NoMoveAvailable)
        } else {
            Ok(steps)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::state::{DangerGrid, OccupancyGrid, Peer, Symbol, TeamId};

    fn open_state() -> MatchState {
        let mut state = MatchState::new("karen");
        state.me.symbol = Some(Symbol('A'));
        state.me.team = Some(TeamId("0".into()));
        let rows: Vec<Vec<char>> = [
            ".....",
            ".A...",
            ".....",
            ".....",
            ".....",
        ]
        .iter()
        .map(|row| row.chars().collect())
        .collect();
        state.occupancy = Some(OccupancyGrid::from_rows(&rows).unwrap());
        state.me.position = Some(Position::new(1, 1));
        state
    }

    #[test]
    fn steps_toward_the_goal_on_a_calm_grid() {
        let state = open_state();
        let planner = GreedyPlanner::new(5);

        let (direction, target) = planner.safe_step(&state, Position::new(4, 1)).unwrap();
        assert_eq!(direction, Direction::East);
        assert_eq!(target, Position::new(2, 1));
    }

    #[test]
    fn danger_outranks_distance() {
        let mut state = open_state();
        let mut danger = DangerGrid::uniform(5, 5, DangerGrid::SAFE);
        // The straight-line cell toward the goal is hot.
        danger.set(Position::new(2, 1), 9).unwrap();
        state.danger = Some(danger);

        let planner = GreedyPlanner::new(5);
        let (_, target) = planner.safe_step(&state, Position::new(4, 1)).unwrap();
        assert_ne!(target, Position::new(2, 1));
    }

    #[test]
    fn walls_and_occupied_cells_are_impassable() {
        let mut state = open_state();
        let rows: Vec<Vec<char>> = [
            "#####",
            "#A.b#",
            "#####",
        ]
        .iter()
        .map(|row| row.chars().collect())
        .collect();
        state.occupancy = Some(OccupancyGrid::from_rows(&rows).unwrap());
        state.me.position = Some(Position::new(1, 1));

        let planner = GreedyPlanner::new(5);
        let (_, target) = planner.safe_step(&state, Position::new(3, 1)).unwrap();
        // Only the empty cell between the wall and the other player is viable.
        assert_eq!(target, Position::new(2, 1));
    }

    #[test]
    fn engage_shoots_down_a_firing_line() {
        let mut state = open_state();
        let mut enemy = Peer::sighted(Symbol('z'), "rival", TeamId("1".into()));
        enemy.position = Some(Position::new(4, 1));
        state.observe_new_peer(enemy);

        let planner = GreedyPlanner::new(5);
        let steps = planner.engage(&state, Position::new(4, 4)).unwrap();
        assert_eq!(steps[0], TacticalStep::Shoot(Direction::East));
        assert!(matches!(steps[1], TacticalStep::Move(_)));
    }

    #[test]
    fn boxed_in_reports_no_move_available() {
        let mut state = open_state();
        let rows: Vec<Vec<char>> = ["###", "#A#", "###"]
            .iter()
            .map(|row| row.chars().collect())
            .collect();
        state.occupancy = Some(OccupancyGrid::from_rows(&rows).unwrap());
        state.me.position = Some(Position::new(1, 1));

        let planner = GreedyPlanner::new(5);
        assert_eq!(
            planner.safe_step(&state, Position::new(0, 0)).unwrap_err(),
            PlanError::NoMoveAvailable
        );
    }

    #[test]
    fn missing_position_is_a_fault_not_a_dead_end() {
        let state = MatchState::new("karen");
        let planner = GreedyPlanner::new(5);
        assert!(matches!(
            planner.safe_step(&state, Position::ORIGIN),
            Err(PlanError::Fault { .. })
        ));
    }
}
