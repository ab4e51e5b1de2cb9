//! Macro-goal selection: feature set in, objective out.

use thiserror::Error;
use tracing::debug;

use agent_core::FeatureSet;
use agent_core::state::Position;
use fuzzy_control::{ControlSystem, FuzzyError, Sample};

use super::rules::{category, input, impostor_system, normal_system};
use super::{Objective, StrategyKind};

/// Which rule table to evaluate; decided by the loyalty revealed at join.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleSet {
    Normal,
    Impostor,
}

/// Why no goal could be produced this cycle.
///
/// Never fatal: the caller substitutes the wanted-flag fallback target.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DecisionError {
    #[error("decision input unavailable: {missing}")]
    Unavailable { missing: &'static str },

    #[error(transparent)]
    Fuzzy(#[from] FuzzyError),
}

/// Evaluates the fuzzy systems and resolves the winning band to a goal
/// coordinate cached in the feature set.
pub struct GoalSelector {
    kind: StrategyKind,
    normal: ControlSystem,
    impostor: ControlSystem,
}

impl GoalSelector {
    /// Builds both rule tables; `max_flag_distance` is the grid diagonal.
    pub fn new(kind: StrategyKind, max_flag_distance: f64) -> Result<Self, DecisionError> {
        Ok(Self {
            kind,
            normal: normal_system(max_flag_distance)?,
            impostor: impostor_system()?,
        })
    }

    /// Chooses the macro-goal for this cycle.
    pub fn choose(&self, role: RuleSet, features: &FeatureSet) -> Result<Objective, DecisionError> {
        if self.kind == StrategyKind::Rush {
            let wanted = features.wanted_flag.ok_or(DecisionError::Unavailable {
                missing: "wanted flag",
            })?;
            return Ok(Objective::CaptureFlag(wanted));
        }

        match role {
            RuleSet::Normal => self.choose_normal(features),
            RuleSet::Impostor => self.choose_impostor(features),
        }
    }

    fn choose_normal(&self, features: &FeatureSet) -> Result<Objective, DecisionError> {
        let flag_distance = features.flag_distance.ok_or(DecisionError::Unavailable {
            missing: "flag distance",
        })?;
        let (enemy_distance, enemy_position) = required(features.nearest_enemy, "nearest enemy")?;
        let (recharge_distance, recharge_position) =
            required(features.nearest_recharge, "nearest recharge")?;

        let sample = Sample::new()
            .with(input::FLAG_DISTANCE, flag_distance)
            .with(input::ENEMY_DISTANCE, enemy_distance)
            .with(input::SAFE_ZONE, f64::from(features.safe_cell.distance_class()))
            .with(input::ENERGY, features.energy as f64)
            .with(input::RECHARGE_DISTANCE, recharge_distance)
            .with(input::STAGE, features.stage.as_level());

        let verdict = self.normal.evaluate(&sample)?;
        debug!(crisp = verdict.crisp, band = verdict.band, "normal rule set");

        match verdict.band {
            category::KILL => Ok(Objective::Hunt(enemy_position)),
            category::RECHARGE => Ok(Objective::Recharge(recharge_position)),
            category::SAFE => self.take_cover(features),
            _ => {
                let wanted = features.wanted_flag.ok_or(DecisionError::Unavailable {
                    missing: "wanted flag",
                })?;
                Ok(Objective::CaptureFlag(wanted))
            }
        }
    }

    fn choose_impostor(&self, features: &FeatureSet) -> Result<Objective, DecisionError> {
        let (ally_distance, ally_position) = required(features.nearest_ally, "nearest ally")?;
        let (enemy_distance, _) = required(features.nearest_enemy, "nearest enemy")?;
        let (recharge_distance, recharge_position) =
            required(features.nearest_recharge, "nearest recharge")?;
        let alive_allies = features
            .alive_ally_ratio
            .ok_or(DecisionError::Unavailable {
                missing: "ally survival ratio",
            })?;

        let sample = Sample::new()
            .with(input::ALLY_DISTANCE, ally_distance)
            .with(input::ENEMY_DISTANCE, enemy_distance)
            .with(input::SAFE_ZONE, f64::from(features.safe_cell.distance_class()))
            .with(input::ENERGY, features.energy as f64)
            .with(input::RECHARGE_DISTANCE, recharge_distance)
            .with(input::STAGE, features.stage.as_level())
            .with(input::ALIVE_ALLIES, alive_allies);

        let verdict = self.impostor.evaluate(&sample)?;
        debug!(crisp = verdict.crisp, band = verdict.band, "impostor rule set");

        match verdict.band {
            category::KILL => Ok(Objective::Hunt(ally_position)),
            category::RECHARGE => Ok(Objective::Recharge(recharge_position)),
            _ => self.take_cover(features),
        }
    }

    fn take_cover(&self, features: &FeatureSet) -> Result<Objective, DecisionError> {
        features
            .safe_cell
            .position()
            .map(Objective::TakeCover)
            .ok_or(DecisionError::Unavailable {
                missing: "safe cell within reach",
            })
    }
}

fn required(
    feature: Option<(f64, Position)>,
    missing: &'static str,
) -> Result<(f64, Position), DecisionError> {
    feature.ok_or(DecisionError::Unavailable { missing })
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::safety::NearestSafe;
    use agent_core::state::MatchStage;

    fn features() -> FeatureSet {
        FeatureSet {
            flag_distance: Some(19.0),
            max_flag_distance: Some(20.0),
            nearest_enemy: Some((10.0, Position::new(9, 9))),
            nearest_ally: Some((4.0, Position::new(2, 2))),
            nearest_recharge: Some((1.0, Position::new(1, 0))),
            safe_cell: NearestSafe::Here(Position::new(0, 0)),
            energy: 5,
            stage: MatchStage::Early,
            alive_ally_ratio: Some(1.0),
            wanted_flag: Some(Position::new(9, 0)),
            defended_flag: Some(Position::new(0, 9)),
        }
    }

    #[test]
    fn drained_battery_beside_a_recharge_selects_recharge() {
        let selector = GoalSelector::new(StrategyKind::Fuzzy, 20.0).unwrap();
        let objective = selector.choose(RuleSet::Normal, &features()).unwrap();
        assert_eq!(objective, Objective::Recharge(Position::new(1, 0)));
    }

    #[test]
    fn selection_is_deterministic() {
        let selector = GoalSelector::new(StrategyKind::Fuzzy, 20.0).unwrap();
        let first = selector.choose(RuleSet::Normal, &features()).unwrap();
        let second = selector.choose(RuleSet::Normal, &features()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_enemy_degrades_instead_of_crashing() {
        let selector = GoalSelector::new(StrategyKind::Fuzzy, 20.0).unwrap();
        let mut features = features();
        features.nearest_enemy = None;

        let error = selector.choose(RuleSet::Normal, &features).unwrap_err();
        assert_eq!(
            error,
            DecisionError::Unavailable {
                missing: "nearest enemy"
            }
        );
    }

    #[test]
    fn rush_strategy_always_goes_for_the_flag() {
        let selector = GoalSelector::new(StrategyKind::Rush, 20.0).unwrap();
        let objective = selector.choose(RuleSet::Normal, &features()).unwrap();
        assert_eq!(objective, Objective::CaptureFlag(Position::new(9, 0)));

        // Same contract for the impostor role.
        let objective = selector.choose(RuleSet::Impostor, &features()).unwrap();
        assert_eq!(objective, Objective::CaptureFlag(Position::new(9, 0)));
    }

    #[test]
    fn impostor_turns_on_its_team_late() {
        let selector = GoalSelector::new(StrategyKind::Fuzzy, 20.0).unwrap();
        let mut features = features();
        features.energy = 200;
        features.stage = MatchStage::Late;
        features.alive_ally_ratio = Some(0.1);
        features.safe_cell = NearestSafe::Unreachable;

        let objective = selector.choose(RuleSet::Impostor, &features).unwrap();
        assert_eq!(objective, Objective::Hunt(Position::new(2, 2)));
    }
}
