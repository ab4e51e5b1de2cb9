use super::common::{Direction, PlayerStatus, Position, Symbol, TeamId};

/// Another player in the match, ally or enemy.
///
/// Peers are created lazily the first time an unknown symbol shows up in a
/// status listing or grid dump, and are never removed; elimination is
/// recorded in place. The movement log accumulates the unit steps inferred
/// from coordinate deltas between snapshots and feeds the player analyzer's
/// suspicion scoring.
#[derive(Clone, Debug, PartialEq)]
pub struct Peer {
    pub symbol: Symbol,
    pub name: String,
    pub team: TeamId,
    pub position: Option<Position>,
    pub status: PlayerStatus,
    /// Accusation-ranking score in `[0, 1]`, written by the player analyzer.
    pub suspicion: f64,
    /// Inferred unit steps since the last full resync, oldest first.
    pub movement_log: Vec<Direction>,
}

impl Peer {
    /// A freshly sighted peer with no position history.
    pub fn sighted(symbol: Symbol, name: impl Into<String>, team: TeamId) -> Self {
        Self {
            symbol,
            name: name.into(),
            team,
            position: None,
            status: PlayerStatus::Active,
            suspicion: 0.0,
            movement_log: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status.is_alive()
    }

    /// Appends inferred steps to the movement log.
    pub fn log_movement(&mut self, steps: impl IntoIterator<Item = Direction>) {
        self.movement_log.extend(steps);
    }
}
