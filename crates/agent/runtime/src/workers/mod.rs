//! Background analyzer workers.
//!
//! Three independent tasks run for the lifetime of the match and observe
//! the shared world model as an eventually-consistent snapshot. Write
//! discipline is single-writer-per-field: the chat listener owns the vote
//! queue and the emergency flag, the player analyzer owns suspicion
//! scores, the game analyzer owns the match stage. Positions, occupancy,
//! and the danger grid belong to the primary loop alone.
//!
//! All workers stop when the shutdown watch flips (the match reached
//! `Finished`) and are joined by the runtime.

pub mod chat;
pub mod game;
pub mod players;

pub use chat::{ChatFeed, ChatListener};
pub use game::GameAnalyzer;
pub use players::PlayerAnalyzer;

/// Shutdown signal handed to every worker; flips to `true` exactly once.
pub type Shutdown = tokio::sync::watch::Receiver<bool>;
