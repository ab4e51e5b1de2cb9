//! Per-match session settings loaded from the environment.

use std::env;

use agent_runtime::StrategyKind;

/// What to play and as whom.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub game: String,
    pub agent_name: String,
    pub nature: String,
    pub role: String,
    /// Create (and later start) the room instead of joining an existing one.
    pub create: bool,
    /// Room creation flags (training, map shape/size).
    pub map_flags: Option<String>,
    pub strategy: StrategyKind,
}

impl SessionConfig {
    /// Construct session settings from process environment variables.
    ///
    /// Environment variables:
    /// - `GAME_NAME` - Room to create or join (default: room1)
    /// - `AGENT_NAME` - Display name (default: saboteur)
    /// - `NATURE` - Player nature token (default: AI)
    /// - `ROLE` - Requested role token (default: 0)
    /// - `CREATE_GAME` - Create and start the room (default: false)
    /// - `MAP_FLAGS` - Flags passed to room creation (optional)
    /// - `STRATEGY` - `fuzzy` or `rush` (default: fuzzy)
    pub fn from_env() -> Self {
        Self {
            game: env::var("GAME_NAME").unwrap_or_else(|_| "room1".to_owned()),
            agent_name: env::var("AGENT_NAME").unwrap_or_else(|_| "saboteur".to_owned()),
            nature: env::var("NATURE").unwrap_or_else(|_| "AI".to_owned()),
            role: env::var("ROLE").unwrap_or_else(|_| "0".to_owned()),
            create: env::var("CREATE_GAME")
                .map(|value| value == "true" || value == "1")
                .unwrap_or(false),
            map_flags: env::var("MAP_FLAGS").ok(),
            strategy: match env::var("STRATEGY").as_deref() {
                Ok("rush") => StrategyKind::Rush,
                _ => StrategyKind::Fuzzy,
            },
        }
    }
}
