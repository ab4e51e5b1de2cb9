//! Player analyzer: maintains per-peer suspicion scores.
//!
//! Enemies are scored on how erratic their inferred movement looks (path
//! reversals suggest evasive or deceptive play); allies are scored on how
//! far they drift from the rest of the squad, which is the observable
//! signature of a traitor working its own agenda. Both heuristics are
//! deterministic functions of the world model; this task is the sole
//! writer of the `suspicion` field.

use std::time::Duration;

use tracing::debug;

use agent_core::state::{Direction, MatchState, Position};

use crate::SharedWorld;

use super::Shutdown;

const ANALYSIS_PERIOD: Duration = Duration::from_millis(400);

/// Fraction of direction reversals in an inferred movement log.
pub fn erraticness(log: &[Direction]) -> f64 {
    if log.len() < 2 {
        return 0.0;
    }
    let reversals = log
        .windows(2)
        .filter(|pair| pair[1] == opposite(pair[0]))
        .count();
    reversals as f64 / (log.len() - 1) as f64
}

fn opposite(direction: Direction) -> Direction {
    match direction {
        Direction::North => Direction::South,
        Direction::South => Direction::North,
        Direction::East => Direction::West,
        Direction::West => Direction::East,
    }
}

/// How far a peer sits from the squad centroid, normalized by the grid
/// diagonal into `[0, 1]`.
pub fn isolation(state: &MatchState, position: Position) -> f64 {
    let Some(grid) = state.occupancy.as_ref() else {
        return 0.0;
    };

    let squad: Vec<Position> = state
        .me
        .position
        .into_iter()
        .chain(state.allies.values().filter_map(|peer| peer.position))
        .collect();
    if squad.len() < 2 {
        return 0.0;
    }

    let centroid = Position::new(
        squad.iter().map(|p| p.x).sum::<i32>() / squad.len() as i32,
        squad.iter().map(|p| p.y).sum::<i32>() / squad.len() as i32,
    );

    (position.euclidean(centroid) / grid.diagonal()).clamp(0.0, 1.0)
}

/// Rescores every peer in place.
pub fn rescore(state: &mut MatchState) {
    let ally_positions: Vec<(char, Option<Position>)> = state
        .allies
        .iter()
        .map(|(symbol, peer)| (*symbol, peer.position))
        .collect();

    for (symbol, position) in ally_positions {
        let score = position
            .map(|position| isolation(state, position))
            .unwrap_or(0.0);
        if let Some(peer) = state.allies.get_mut(&symbol) {
            peer.suspicion = score;
        }
    }

    for peer in state.enemies.values_mut() {
        peer.suspicion = erraticness(&peer.movement_log);
    }
}

/// Background task re-running the scoring on a fixed period.
pub struct PlayerAnalyzer {
    world: SharedWorld,
    shutdown: Shutdown,
}

impl PlayerAnalyzer {
    pub fn new(world: SharedWorld, shutdown: Shutdown) -> Self {
        Self { world, shutdown }
    }

    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(ANALYSIS_PERIOD);
        loop {
            tokio::select! {
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let mut world = self.world.write().await;
                    rescore(&mut world);
                }
            }
        }
        debug!("player analyzer stopped");
    }
}
