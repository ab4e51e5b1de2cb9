//! Saboteur agent binary.
//!
//! Composition root: loads configuration from the environment, connects to
//! the game server, optionally creates and starts a room, and plays the
//! match to completion with the selected strategy. The final report is
//! printed as JSON.
//!
//! # Examples
//!
//! ```bash
//! # Join an existing room
//! GAME_NAME=room1 AGENT_NAME=karen cargo run -p saboteur-client
//!
//! # Create, start, and play a training match
//! GAME_NAME=room1 CREATE_GAME=true MAP_FLAGS=T cargo run -p saboteur-client
//! ```

use anyhow::Result;

use agent_runtime::{AgentConfig, AgentRuntime};

mod logging;
mod session;

use session::SessionConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::setup()?;

    let config = AgentConfig::from_env();
    let session = SessionConfig::from_env();

    tracing::info!(
        server = %format!("{}:{}", config.host, config.port),
        game = %session.game,
        agent = %session.agent_name,
        strategy = ?session.strategy,
        "starting saboteur agent"
    );

    let mut runtime = AgentRuntime::builder()
        .agent_name(&session.agent_name)
        .config(config)
        .strategy(session.strategy)
        .build()
        .await?;

    if session.create {
        runtime
            .create_game(&session.game, session.map_flags.as_deref())
            .await?;
        tracing::info!(game = %session.game, "room created");
    }

    runtime
        .join_game(&session.game, &session.nature, &session.role, None)
        .await?;
    tracing::info!(game = %session.game, "joined");

    if session.create {
        runtime.start_game().await?;
        tracing::info!(game = %session.game, "match started");
    }

    let report = runtime.play().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
