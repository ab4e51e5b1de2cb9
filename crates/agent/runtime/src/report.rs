//! Final match report returned by the runtime.

use serde::Serialize;

use agent_core::state::MatchPhase;

/// Outcome and activity counters for one played match.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MatchReport {
    pub game: Option<String>,
    pub outcome: MatchPhase,
    pub survived: bool,
    pub final_energy: i64,
    pub final_score: i64,
    pub cycles: u64,
    pub shots_fired: u64,
    pub votes_cast: u64,
    pub accusations: u64,
}
