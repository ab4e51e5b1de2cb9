//! Runtime configuration structures and env-based loaders.

use std::env;
use std::time::Duration;

/// Configuration for one agent process.
#[derive(Clone, Debug)]
pub struct AgentConfig {
    pub host: String,
    pub port: u16,
    /// Per-request response deadline; exceeding it is a fatal
    /// transport failure rather than an indefinite stall.
    pub response_timeout: Duration,
    /// Delay between status polls while the match sits in the lobby.
    pub lobby_poll_interval: Duration,
    /// Ceiling weight handed to the danger-map generator.
    pub max_weight: u32,
    /// Straight-line range within which an opponent can land a shot.
    pub attack_range: u32,
    /// Minimum suspicion score before an emergency accusation is issued.
    pub accuse_threshold: f64,
    /// Force a full status query every N cycles even without shooting, so
    /// energy lost to being hit is discovered within a bounded window.
    pub status_refresh_interval: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8421,
            response_timeout: Duration::from_secs(10),
            lobby_poll_interval: Duration::from_millis(500),
            max_weight: 10,
            attack_range: 5,
            accuse_threshold: 0.5,
            status_refresh_interval: 8,
        }
    }
}

impl AgentConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SERVER_HOST` - Game server host (default: 127.0.0.1)
    /// - `SERVER_PORT` - Game server port (default: 8421)
    /// - `RESPONSE_TIMEOUT_MS` - Per-request deadline (default: 10000)
    /// - `LOBBY_POLL_MS` - Lobby polling delay (default: 500)
    /// - `MAX_WEIGHT` - Danger-map ceiling weight (default: 10)
    /// - `ATTACK_RANGE` - Opponent shot range in cells (default: 5)
    /// - `ACCUSE_THRESHOLD` - Suspicion needed to accuse (default: 0.5)
    /// - `STATUS_REFRESH_INTERVAL` - Cycles between forced full status
    ///   queries (default: 8)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("SERVER_HOST") {
            config.host = host;
        }
        if let Some(port) = read_env::<u16>("SERVER_PORT") {
            config.port = port;
        }
        if let Some(ms) = read_env::<u64>("RESPONSE_TIMEOUT_MS") {
            config.response_timeout = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64>("LOBBY_POLL_MS") {
            config.lobby_poll_interval = Duration::from_millis(ms);
        }
        if let Some(weight) = read_env::<u32>("MAX_WEIGHT") {
            config.max_weight = weight.max(2);
        }
        if let Some(range) = read_env::<u32>("ATTACK_RANGE") {
            config.attack_range = range.max(1);
        }
        if let Some(threshold) = read_env::<f64>("ACCUSE_THRESHOLD") {
            config.accuse_threshold = threshold.clamp(0.0, 1.0);
        }
        if let Some(interval) = read_env::<u32>("STATUS_REFRESH_INTERVAL") {
            config.status_refresh_interval = interval.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
