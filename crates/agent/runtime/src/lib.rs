//! Live agent runtime: transport, server command API, the fuzzy strategies,
//! the strategy state machine, and the background analyzer workers.
//!
//! One primary task drives the [`strategy::StrategyMachine`] loop; the
//! analyzers run as independent tokio tasks against the shared world model
//! and are joined when the match finishes. The [`runtime::AgentRuntime`]
//! builder wires everything together for the client binary.

pub mod client;
pub mod config;
pub mod danger;
pub mod error;
pub mod planner;
pub mod report;
pub mod runtime;
pub mod strategy;
pub mod transport;
pub mod workers;

use std::sync::Arc;

use agent_core::MatchState;
use tokio::sync::RwLock;

/// Shared handle to the world model.
///
/// The primary loop is the sole writer of positions, occupancy, and the
/// danger grid; analyzer workers restrict their writes to suspicion scores,
/// the match stage, the vote queue, and the emergency flag.
pub type SharedWorld = Arc<RwLock<MatchState>>;

pub use client::ServerClient;
pub use config::AgentConfig;
pub use error::{AgentError, Result};
pub use report::MatchReport;
pub use runtime::{AgentRuntime, AgentRuntimeBuilder};
pub use strategy::StrategyKind;
pub use transport::{TcpTransport, Transport, TransportError};
