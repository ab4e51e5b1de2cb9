//! Domain core for an autonomous agent playing a grid-based
//! social-deduction match over a text protocol.
//!
//! This crate is the pure layer: the world model kept in sync with server
//! snapshots, the snapshot decoder, the safety-map queries, the derived
//! feature set consumed by the decision engine, and the wire-command
//! rendering. No I/O and no async live here; the runtime crate drives
//! everything through explicit calls.

pub mod features;
pub mod protocol;
pub mod safety;
pub mod state;

pub use features::FeatureSet;
pub use protocol::{Command, DecodeError, decoder};
pub use safety::{DangerModel, NearestSafe, SafetyMap};
pub use state::{
    Direction, MatchPhase, MatchState, MatchStage, Peer, PlayerStatus, Position, SelfState,
    StateError, Symbol, TeamId, VoteRequest,
};
