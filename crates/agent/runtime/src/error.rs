//! Unified error type surfaced by the agent runtime.
//!
//! Only [`AgentError::Transport`] is fatal: it tears down the match and the
//! background workers. Snapshot failures are tolerated at the call site
//! (the stale world model is retained), and command rejections on action
//! commands are reported as "the action did not happen" rather than as
//! errors.

use thiserror::Error;

use agent_core::protocol::DecodeError;
use agent_core::state::MatchPhase;

use crate::strategy::DecisionError;
use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, AgentError>;

#[derive(Debug, Error)]
pub enum AgentError {
    /// Connection drop or response timeout: fatal, triggers orderly shutdown.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A snapshot response could not be decoded; the update was skipped.
    #[error(transparent)]
    Snapshot(#[from] DecodeError),

    /// A setup command (create/join/start) was refused by the server.
    #[error("command rejected: '{command}' -> '{response}'")]
    CommandRejected { command: String, response: String },

    /// The lobby resolved into something other than an active match.
    #[error("match left the lobby into {phase:?} instead of becoming active")]
    AbortedInLobby { phase: MatchPhase },

    /// An in-match command was issued before any game was joined.
    #[error("no game joined")]
    NotInGame,

    /// The tactical planner hit an unexpected fault (not a mere
    /// "no move available", which callers handle locally).
    #[error("tactical planner fault: {reason}")]
    PlannerFault { reason: String },

    /// The decision engine's rule tables failed validation at build time.
    /// Per-cycle decision failures never surface here; they degrade to the
    /// flag fallback instead.
    #[error("decision engine construction failed")]
    Decision(#[source] DecisionError),
}
