use std::collections::{BTreeMap, VecDeque};

use super::common::{
    MatchPhase, MatchStage, PlayerStatus, Position, Symbol, TeamId, VoteRequest,
};
use super::error::StateError;
use super::flags::FlagPair;
use super::grid::{DangerGrid, OccupancyGrid};
use super::peer::Peer;

/// The agent's own player record.
///
/// Most fields start unknown and are filled in by the join handshake and the
/// first status listing.
#[derive(Clone, Debug, Default)]
pub struct SelfState {
    pub name: String,
    pub symbol: Option<Symbol>,
    pub team: Option<TeamId>,
    pub loyalty: Option<TeamId>,
    pub nature: Option<String>,
    pub role: Option<String>,
    pub energy: i64,
    pub score: i64,
    pub status: PlayerStatus,
    pub position: Option<Position>,
}

impl SelfState {
    pub fn is_alive(&self) -> bool {
        self.status.is_alive()
    }
}

/// Which tracked entity a grid character belongs to.
///
/// Resolution priority is fixed: self first, then allies, then enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolOwner {
    Me,
    Ally,
    Enemy,
    Unknown,
}

/// The whole local model of one match.
#[derive(Clone, Debug, Default)]
pub struct MatchState {
    pub name: Option<String>,
    pub phase: MatchPhase,
    /// Raw size token from the game status line; the authoritative grid
    /// dimensions come from the first grid dump.
    pub declared_size: Option<String>,
    pub stage: MatchStage,
    pub emergency_meeting: bool,
    pub pending_votes: VecDeque<VoteRequest>,
    pub me: SelfState,
    pub allies: BTreeMap<char, Peer>,
    pub enemies: BTreeMap<char, Peer>,
    pub occupancy: Option<OccupancyGrid>,
    pub danger: Option<DangerGrid>,
    pub flags: Option<FlagPair>,
}

impl MatchState {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            me: SelfState {
                name: agent_name.into(),
                ..SelfState::default()
            },
            ..Self::default()
        }
    }

    /// True once the join handshake revealed a loyalty differing from the
    /// nominal team.
    pub fn is_impostor(&self) -> bool {
        match (&self.me.team, &self.me.loyalty) {
            (Some(team), Some(loyalty)) => team != loyalty,
            _ => false,
        }
    }

    /// Resolves a grid character against self, allies, then enemies.
    pub fn resolve(&self, ch: char) -> SymbolOwner {
        if self.me.symbol == Some(Symbol(ch)) {
            SymbolOwner::Me
        } else if self.allies.contains_key(&ch) {
            SymbolOwner::Ally
        } else if self.enemies.contains_key(&ch) {
            SymbolOwner::Enemy
        } else {
            SymbolOwner::Unknown
        }
    }

    pub fn grid_size(&self) -> Option<(u32, u32)> {
        self.occupancy
            .as_ref()
            .map(|grid| (grid.width(), grid.height()))
    }

    /// True if the position lies on the observed grid. Without a grid
    /// observation nothing can be validated, so nothing qualifies.
    pub fn in_bounds(&self, position: Position) -> bool {
        self.occupancy
            .as_ref()
            .is_some_and(|grid| grid.contains(position))
    }

    /// Moves the agent itself, keeping coordinates and occupancy in step.
    pub fn place_me(&mut self, to: Position, status: Option<PlayerStatus>) -> Result<(), StateError> {
        if let (Some(symbol), Some(grid)) = (self.me.symbol, self.occupancy.as_mut()) {
            grid.relocate(symbol, self.me.position, to)?;
        }
        self.me.position = Some(to);
        if let Some(status) = status {
            self.me.status = status;
        }
        Ok(())
    }

    /// Moves a known ally, keeping coordinates and occupancy in step.
    /// Unknown symbols are ignored.
    pub fn place_ally(
        &mut self,
        ch: char,
        to: Position,
        status: Option<PlayerStatus>,
    ) -> Result<(), StateError> {
        let Self {
            occupancy, allies, ..
        } = self;
        if let Some(peer) = allies.get_mut(&ch) {
            if let Some(grid) = occupancy.as_mut() {
                grid.relocate(peer.symbol, peer.position, to)?;
            }
            peer.position = Some(to);
            if let Some(status) = status {
                peer.status = status;
            }
        }
        Ok(())
    }

    /// Moves a known enemy, keeping coordinates and occupancy in step.
    ///
    /// Callers wanting movement inference must read the previous position
    /// and extend the movement log *before* calling this.
    pub fn place_enemy(
        &mut self,
        ch: char,
        to: Position,
        status: Option<PlayerStatus>,
    ) -> Result<(), StateError> {
        let Self {
            occupancy, enemies, ..
        } = self;
        if let Some(peer) = enemies.get_mut(&ch) {
            if let Some(grid) = occupancy.as_mut() {
                grid.relocate(peer.symbol, peer.position, to)?;
            }
            peer.position = Some(to);
            if let Some(status) = status {
                peer.status = status;
            }
        }
        Ok(())
    }

    /// Files a first-sighted peer under allies or enemies by comparing its
    /// team with ours. With our own team still unknown the peer is filed as
    /// an enemy; classification happens once, at first observation.
    pub fn observe_new_peer(&mut self, peer: Peer) {
        let allied = self.me.team.as_ref() == Some(&peer.team);
        let key = peer.symbol.0;
        if allied {
            self.allies.insert(key, peer);
        } else {
            self.enemies.insert(key, peer);
        }
    }

    /// Fraction of allies still alive; `None` before any ally was sighted.
    pub fn alive_ally_ratio(&self) -> Option<f64> {
        if self.allies.is_empty() {
            return None;
        }
        let alive = self.allies.values().filter(|peer| peer.is_alive()).count();
        Some(alive as f64 / self.allies.len() as f64)
    }

    /// The ally with the highest suspicion score, for accusation ranking.
    pub fn most_suspect_ally(&self) -> Option<&Peer> {
        self.allies
            .values()
            .max_by(|a, b| {
                a.suspicion
                    .partial_cmp(&b.suspicion)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Queues a voting obligation (fed by the chat listener).
    pub fn push_vote(&mut self, vote: VoteRequest) {
        self.pending_votes.push_back(vote);
    }

    /// Takes the next queued voting obligation, oldest first.
    pub fn next_vote(&mut self) -> Option<VoteRequest> {
        self.pending_votes.pop_front()
    }
}
