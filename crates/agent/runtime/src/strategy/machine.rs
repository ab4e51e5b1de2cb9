//! The strategy state machine: the agent's top-level loop.
//!
//! Lifecycle follows the match: the machine waits out the lobby, runs
//! planning cycles while the match is active and the agent alive, and
//! degrades to resync-and-vote duty once eliminated. Each cycle asks the
//! decision engine for a macro-goal, then either walks a safe window of
//! steps towards it (servicing accusations and votes on the way) or hands
//! control to the reactive planner when a threat is close, and finally
//! resynchronizes: a full status query after shooting (energy changes are
//! only visible there), the cheaper grid dump otherwise.

use tracing::{debug, info, warn};

use agent_core::FeatureSet;
use agent_core::safety::DangerModel;
use agent_core::state::{MatchPhase, Position};

use crate::SharedWorld;
use crate::client::ServerClient;
use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::planner::{PlanError, TacticalPlanner, TacticalStep};
use crate::report::MatchReport;

use super::decision::{GoalSelector, RuleSet};
use super::{Objective, StrategyKind};

/// Number of free steps granted by the distance to the nearest enemy, or
/// `None` when the enemy is too close for a safe window at all.
///
/// A window exists once `distance / 2` leaves at least three steps of
/// buffer; its length is one step less than that, keeping a margin for the
/// re-check at the end.
pub fn safe_window_length(distance: f64) -> Option<u32> {
    let half = (distance / 2.0).floor() as u32;
    (half > 2).then(|| half - 1)
}

pub struct StrategyMachine {
    client: ServerClient,
    world: SharedWorld,
    kind: StrategyKind,
    planner: Box<dyn TacticalPlanner>,
    danger: Box<dyn DangerModel>,
    config: AgentConfig,
    selector: Option<GoalSelector>,
    report: MatchReport,
    cycles: u64,
}

impl StrategyMachine {
    pub fn new(
        client: ServerClient,
        kind: StrategyKind,
        planner: Box<dyn TacticalPlanner>,
        danger: Box<dyn DangerModel>,
        config: AgentConfig,
    ) -> Self {
        let world = client.world();
        Self {
            client,
            world,
            kind,
            planner,
            danger,
            config,
            selector: None,
            report: MatchReport::default(),
            cycles: 0,
        }
    }

    /// Runs the match to completion and returns the final report.
    pub async fn run(&mut self) -> Result<MatchReport> {
        self.wait_for_start().await?;
        info!("match active");

        // First grid observation: seeds dimensions, flags, and the grid the
        // danger model needs.
        tolerate_snapshot(self.client.sync_look().await)?;
        self.rebuild_danger().await;

        let diagonal = {
            let world = self.world.read().await;
            world
                .occupancy
                .as_ref()
                .map(|grid| grid.diagonal())
                .unwrap_or(1.0)
        };
        self.selector = Some(
            GoalSelector::new(self.kind, diagonal).map_err(AgentError::Decision)?,
        );

        loop {
            let (phase, alive) = {
                let world = self.world.read().await;
                (world.phase, world.me.is_alive())
            };
            if phase != MatchPhase::Active {
                break;
            }
            if !alive {
                info!("eliminated; continuing to resynchronize and vote");
                break;
            }
            self.cycle().await?;
        }

        self.drain_votes().await?;
        self.finalize().await
    }

    /// Polls the lobby until the match starts (or resolves to anything
    /// other than an active match).
    async fn wait_for_start(&mut self) -> Result<()> {
        loop {
            tolerate_snapshot(self.client.sync_status().await)?;
            let phase = self.world.read().await.phase;
            match phase {
                MatchPhase::Lobby => {
                    tokio::time::sleep(self.config.lobby_poll_interval).await;
                }
                MatchPhase::Active => return Ok(()),
                other => return Err(AgentError::AbortedInLobby { phase: other }),
            }
        }
    }

    /// One full planning cycle.
    async fn cycle(&mut self) -> Result<()> {
        self.cycles += 1;

        let features = {
            let world = self.world.read().await;
            FeatureSet::extract(&world)
        };
        let role = if self.world.read().await.is_impostor() {
            RuleSet::Impostor
        } else {
            RuleSet::Normal
        };

        let Some(goal) = self.resolve_goal(role, &features).await else {
            // Nothing actionable is known yet (no flags observed); catch up
            // on snapshots instead of acting blind.
            debug!("no goal available; resynchronizing");
            self.resync(false).await?;
            self.rebuild_danger().await;
            return Ok(());
        };

        let window = features
            .nearest_enemy
            .map(|(distance, _)| distance)
            .and_then(safe_window_length);

        let fired = match window {
            Some(window) => {
                self.safe_window(goal, window).await?;
                false
            }
            None => self.reactive(goal).await?,
        };

        self.resync(fired).await?;
        self.rebuild_danger().await;
        Ok(())
    }

    /// Picks the macro-goal, falling back to flag-seeking whenever the
    /// engine cannot produce a valid in-bounds target.
    async fn resolve_goal(&self, role: RuleSet, features: &FeatureSet) -> Option<Position> {
        let selector = self.selector.as_ref()?;

        let objective = match selector.choose(role, features) {
            Ok(objective) => {
                let in_bounds = self.world.read().await.in_bounds(objective.target());
                if in_bounds {
                    objective
                } else {
                    debug!(?objective, "target out of bounds; falling back");
                    self.fallback_objective(role, features)?
                }
            }
            Err(error) => {
                debug!(%error, "decision unavailable; falling back");
                self.fallback_objective(role, features)?
            }
        };

        debug!(?objective, "macro-goal");
        Some(objective.target())
    }

    /// The guaranteed-valid fallback target. Normal players run for the
    /// wanted flag; impostors prefer their own side's flag until they have
    /// closed most of the distance to the enemy one.
    fn fallback_objective(&self, role: RuleSet, features: &FeatureSet) -> Option<Objective> {
        match role {
            RuleSet::Normal => features.wanted_flag.map(Objective::CaptureFlag),
            RuleSet::Impostor => {
                match (
                    features.flag_distance,
                    features.max_flag_distance,
                    features.defended_flag,
                ) {
                    (Some(distance), Some(max), Some(defended)) if distance > max / 4.0 => {
                        Some(Objective::GuardFlag(defended))
                    }
                    _ => features.wanted_flag.map(Objective::CaptureFlag),
                }
            }
        }
    }

    /// Walks up to `window` free steps towards the goal, resolving an
    /// emergency meeting or one queued vote in place of a step.
    async fn safe_window(&mut self, goal: Position, window: u32) -> Result<()> {
        for _ in 0..window {
            // (a) An active emergency meeting outranks everything; the
            // flag is consumed exactly once whether or not anyone is
            // suspicious enough to accuse.
            let accusation = {
                let mut world = self.world.write().await;
                if world.emergency_meeting {
                    world.emergency_meeting = false;
                    world
                        .most_suspect_ally()
                        .map(|peer| (peer.name.clone(), peer.suspicion))
                } else {
                    None
                }
            };
            if let Some((name, suspicion)) = accusation {
                if suspicion > self.config.accuse_threshold {
                    info!(subject = %name, suspicion, "accusing");
                    if self.client.accuse(&name).await? {
                        self.report.accusations += 1;
                    }
                }
                continue;
            }

            // (b) One queued vote.
            let vote = self.world.write().await.next_vote();
            if let Some(vote) = vote {
                if self.client.judge(&vote.subject, &vote.nature).await? {
                    self.report.votes_cast += 1;
                }
                continue;
            }

            // (c) One safe step, position updated only on acknowledgement.
            let planned = {
                let world = self.world.read().await;
                self.planner.safe_step(&world, goal)
            };
            match planned {
                Ok((direction, target)) => {
                    if self.client.step(direction).await? {
                        let mut world = self.world.write().await;
                        if let Err(error) = world.place_me(target, None) {
                            warn!(%error, "acknowledged move could not be recorded");
                        }
                    }
                }
                Err(PlanError::NoMoveAvailable) => {
                    debug!("no viable step; ending safe window early");
                    break;
                }
                Err(PlanError::Fault { reason }) => {
                    return Err(AgentError::PlannerFault { reason });
                }
            }

            if self.world.read().await.me.position == Some(goal) {
                break;
            }
        }
        Ok(())
    }

    /// Short-horizon reactive movement/combat; returns whether a shot was
    /// fired this cycle.
    async fn reactive(&mut self, goal: Position) -> Result<bool> {
        let planned = {
            let world = self.world.read().await;
            self.planner.engage(&world, goal)
        };
        let steps = match planned {
            Ok(steps) => steps,
            Err(PlanError::NoMoveAvailable) => {
                debug!("reactive planner found nothing to do");
                return Ok(false);
            }
            Err(PlanError::Fault { reason }) => {
                return Err(AgentError::PlannerFault { reason });
            }
        };

        let mut fired = false;
        for step in steps {
            match step {
                TacticalStep::Move(direction) => {
                    // Position is discovered at the next resync; a rejected
                    // move simply did not happen.
                    let _ = self.client.step(direction).await?;
                }
                TacticalStep::Shoot(direction) => {
                    let impact = self.client.shoot(direction).await?;
                    debug!(?direction, ?impact, "shot fired");
                    fired = true;
                    self.report.shots_fired += 1;
                }
            }
        }
        Ok(fired)
    }

    /// Resynchronizes the world model. Shooting forces the full status
    /// query (energy is only visible there); otherwise the cheaper grid
    /// dump suffices, with a periodic full refresh bounding how long a
    /// silent energy drain can stay invisible.
    async fn resync(&mut self, fired: bool) -> Result<()> {
        let full = fired || self.cycles % u64::from(self.config.status_refresh_interval) == 0;
        let result = if full {
            self.client.sync_status().await
        } else {
            self.client.sync_look().await
        };
        tolerate_snapshot(result)
    }

    async fn rebuild_danger(&mut self) {
        let mut world = self.world.write().await;
        let danger = self.danger.rebuild(&world);
        world.danger = Some(danger);
    }

    /// Keeps servicing votes after elimination or match end: judgements are
    /// issued until the queue is empty, and while the match is still
    /// running the agent stays synchronized (and on the wire) in between.
    async fn drain_votes(&mut self) -> Result<()> {
        loop {
            let vote = self.world.write().await.next_vote();
            if let Some(vote) = vote {
                if self.client.judge(&vote.subject, &vote.nature).await? {
                    self.report.votes_cast += 1;
                }
                continue;
            }

            if self.world.read().await.phase != MatchPhase::Active {
                return Ok(());
            }

            self.client.keepalive().await?;
            tolerate_snapshot(self.client.sync_status().await)?;
            tokio::time::sleep(self.config.lobby_poll_interval).await;
        }
    }

    /// Leaves the room after the match resolved; refusals are harmless.
    pub async fn leave_match(&mut self) -> Result<bool> {
        self.client.leave_game(None).await
    }

    async fn finalize(&mut self) -> Result<MatchReport> {
        let world = self.world.read().await;
        self.report.game = world.name.clone();
        self.report.outcome = world.phase;
        self.report.survived = world.me.is_alive();
        self.report.final_energy = world.me.energy;
        self.report.final_score = world.me.score;
        self.report.cycles = self.cycles;
        Ok(self.report.clone())
    }
}

/// Snapshot failures are tolerated: the update is skipped and the stale
/// world model retained. Everything else propagates.
fn tolerate_snapshot(result: Result<()>) -> Result<()> {
    match result {
        Err(AgentError::Snapshot(error)) => {
            warn!(%error, "snapshot rejected; keeping stale world model");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_window_lengths_match_the_distance_arithmetic() {
        // Ten cells of distance buy four free steps.
        assert_eq!(safe_window_length(10.0), Some(4));
        // Four cells leave no window at all.
        assert_eq!(safe_window_length(4.0), None);
        assert_eq!(safe_window_length(5.0), None);
        assert_eq!(safe_window_length(6.0), Some(2));
        assert_eq!(safe_window_length(7.0), Some(2));
        assert_eq!(safe_window_length(0.0), None);
    }
}
