//! Goal selection and the strategy state machine.
//!
//! [`rules`] declares the two fuzzy rule tables as data, [`decision`] turns
//! a feature set into a macro-goal through them, and [`machine`] drives the
//! per-cycle loop that alternates between safe traversal and reactive
//! combat while servicing voting obligations.

pub mod decision;
pub mod machine;
pub mod rules;

use agent_core::state::Position;

pub use decision::{DecisionError, GoalSelector, RuleSet};
pub use machine::{StrategyMachine, safe_window_length};

/// Closed set of strategy variants, chosen at construction time.
///
/// Every variant implements the same goal-selection contract; there is no
/// string-typed dispatch anywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Fuzzy-inference goal selection (normal or impostor rule set,
    /// depending on the loyalty revealed at join time).
    #[default]
    Fuzzy,
    /// Straight rush to the wanted flag; the minimal baseline strategy.
    Rush,
}

/// The macro-goal of one planning cycle: what to do and where.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Objective {
    /// Close in on a target for the kill.
    Hunt(Position),
    /// Advance on the flag this side must capture.
    CaptureFlag(Position),
    /// Fall back towards the flag this side must protect.
    GuardFlag(Position),
    /// Head for an energy recharge cell.
    Recharge(Position),
    /// Reach the nearest safe cell and sit tight.
    TakeCover(Position),
}

impl Objective {
    /// The coordinate this objective drives towards.
    pub fn target(&self) -> Position {
        match *self {
            Objective::Hunt(position)
            | Objective::CaptureFlag(position)
            | Objective::GuardFlag(position)
            | Objective::Recharge(position)
            | Objective::TakeCover(position) => position,
        }
    }
}
