//! The authoritative local world model.
//!
//! Everything the agent knows about the match lives here: its own player
//! record, the ally and enemy maps, the occupancy and danger grids, the flag
//! pair, and the voting obligations fed in by the background analyzers.
//! Mutators preserve the single invariant that matters for planning: a
//! tracked entity's recorded coordinates always match its symbol's cell in
//! the occupancy grid, with relocation performed as one atomic
//! vacate-then-claim step.

mod common;
mod error;
mod flags;
mod grid;
mod match_state;
mod peer;

pub use common::{
    Direction, MatchPhase, MatchStage, PlayerStatus, Position, Symbol, TeamId, VoteRequest,
};
pub use error::StateError;
pub use flags::FlagPair;
pub use grid::{DangerGrid, OccupancyGrid, glyph};
pub use match_state::{MatchState, SelfState, SymbolOwner};
pub use peer::Peer;
