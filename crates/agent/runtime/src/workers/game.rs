//! Game analyzer: maintains the match stage and emits the final summary.
//!
//! The stage tracks how far the match has progressed, from flag progress
//! and casualties: early until first blood or a third of the flag run,
//! late once most of the distance is covered or the team has thinned out.
//! This task is the sole writer of the `stage` field.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use agent_core::state::{MatchPhase, MatchStage, MatchState};

use crate::SharedWorld;

use super::Shutdown;

const ANALYSIS_PERIOD: Duration = Duration::from_millis(750);

/// Classifies the current stage of the match.
pub fn classify_stage(state: &MatchState) -> MatchStage {
    let progress = match (state.me.position, state.flags, state.occupancy.as_ref()) {
        (Some(me), Some(flags), Some(grid)) => {
            1.0 - (me.euclidean(flags.wanted) / grid.diagonal()).clamp(0.0, 1.0)
        }
        _ => 0.0,
    };

    let anyone_down = state
        .allies
        .values()
        .chain(state.enemies.values())
        .any(|peer| !peer.is_alive());
    let team_thinned = state
        .alive_ally_ratio()
        .is_some_and(|ratio| ratio <= 0.5);

    if progress >= 0.66 || team_thinned {
        MatchStage::Late
    } else if progress >= 0.33 || anyone_down {
        MatchStage::Mid
    } else {
        MatchStage::Early
    }
}

/// End-of-match summary logged as a JSON record.
#[derive(Debug, Serialize)]
struct MatchSummary {
    game: Option<String>,
    phase: MatchPhase,
    stage: MatchStage,
    allies_alive: usize,
    enemies_alive: usize,
}

/// Background task re-classifying the stage on a fixed period.
pub struct GameAnalyzer {
    world: SharedWorld,
    shutdown: Shutdown,
}

impl GameAnalyzer {
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
                    world.stage = classify_stage(&world);
                }
            }
        }

        let world = self.world.read().await;
        let summary = MatchSummary {
            game: world.name.clone(),
            phase: world.phase,
            stage: world.stage,
            allies_alive: world.allies.values().filter(|p| p.is_alive()).count(),
            enemies_alive: world.enemies.values().filter(|p| p.is_alive()).count(),
        };
        match serde_json::to_string(&summary) {
            Ok(json) => info!(report = %json, "game analyzer final report"),
            Err(error) => debug!(%error, "summary serialization failed"),
        }
    }
}
