//! High-level runtime orchestrator.
//!
//! The runtime owns the server client and the background analyzers, wires
//! up the shared world model and the shutdown signal, and exposes a
//! builder-based API for the binary to assemble an agent.

use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tracing::warn;

use agent_core::MatchState;
use agent_core::safety::DangerModel;

use crate::SharedWorld;
use crate::client::ServerClient;
use crate::config::AgentConfig;
use crate::danger::LineOfFireModel;
use crate::error::Result;
use crate::planner::{GreedyPlanner, TacticalPlanner};
use crate::report::MatchReport;
use crate::strategy::{StrategyKind, StrategyMachine};
use crate::transport::{TcpTransport, Transport};
use crate::workers::{ChatFeed, ChatListener, GameAnalyzer, PlayerAnalyzer};

/// An assembled agent, ready to create/join a match and play it out.
pub struct AgentRuntime {
    client: ServerClient,
    world: SharedWorld,
    kind: StrategyKind,
    planner: Box<dyn TacticalPlanner>,
    danger: Box<dyn DangerModel>,
    chat: Option<Box<dyn ChatFeed>>,
    config: AgentConfig,
}

impl AgentRuntime {
    /// Create a new runtime builder.
    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    /// Shared handle to the world model (read-mostly for callers).
    pub fn world(&self) -> SharedWorld {
        self.world.clone()
    }

    /// Creates a game room on the server.
    pub async fn create_game(&mut self, game: &str, flags: Option<&str>) -> Result<()> {
        self.client.create_game(game, flags).await
    }

    /// Joins a game; the reply decides team and loyalty (and with them the
    /// rule set the strategy will run).
    pub async fn join_game(
        &mut self,
        game: &str,
        nature: &str,
        role: &str,
        info: Option<&str>,
    ) -> Result<()> {
        self.client.join_game(game, nature, role, info).await
    }

    /// Starts the match (creator only).
    pub async fn start_game(&mut self) -> Result<()> {
        self.client.start_game().await
    }

    /// Plays the match to completion.
    ///
    /// Spawns the background analyzers, runs the strategy machine on the
    /// current task, then flips the shutdown signal and joins every worker
    /// before returning the report.
    pub async fn play(mut self) -> Result<MatchReport> {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut workers: Vec<JoinHandle<()>> = Vec::new();

        if let Some(feed) = self.chat.take() {
            let listener = ChatListener::new(feed, self.world.clone(), shutdown_rx.clone());
            workers.push(tokio::spawn(listener.run()));
        }
        workers.push(tokio::spawn(
            PlayerAnalyzer::new(self.world.clone(), shutdown_rx.clone()).run(),
        ));
        workers.push(tokio::spawn(
            GameAnalyzer::new(self.world.clone(), shutdown_rx.clone()).run(),
        ));

        let mut machine = StrategyMachine::new(
            self.client,
            self.kind,
            self.planner,
            self.danger,
            self.config,
        );
        let result = machine.run().await;

        // Leave the room on a clean exit; the server may refuse after a
        // finished match, which is fine.
        if result.is_ok() {
            if let Err(error) = machine.leave_match().await {
                warn!(%error, "leaving the room failed");
            }
        }

        let _ = shutdown_tx.send(true);
        for worker in workers {
            if let Err(error) = worker.await {
                warn!(%error, "analyzer worker did not shut down cleanly");
            }
        }

        result
    }
}

/// Builder for [`AgentRuntime`] with flexible configuration.
pub struct AgentRuntimeBuilder {
    agent_name: String,
    config: AgentConfig,
    kind: StrategyKind,
    transport: Option<Box<dyn Transport>>,
    chat: Option<Box<dyn ChatFeed>>,
    planner: Option<Box<dyn TacticalPlanner>>,
    danger: Option<Box<dyn DangerModel>>,
}

impl AgentRuntimeBuilder {
    fn new() -> Self {
        Self {
            agent_name: "saboteur".to_owned(),
            config: AgentConfig::default(),
            kind: StrategyKind::default(),
            transport: None,
            chat: None,
            planner: None,
            danger: None,
        }
    }

    /// The display name this agent joins matches under.
    pub fn agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    /// Override runtime configuration.
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Select the strategy variant (defaults to the fuzzy engine).
    pub fn strategy(mut self, kind: StrategyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Inject a transport (tests use a scripted one); defaults to TCP.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Attach a chat feed; without one the chat listener is not spawned.
    pub fn chat_feed(mut self, feed: impl ChatFeed + 'static) -> Self {
        self.chat = Some(Box::new(feed));
        self
    }

    /// Override the tactical planner (defaults to the greedy one).
    pub fn planner(mut self, planner: impl TacticalPlanner + 'static) -> Self {
        self.planner = Some(Box::new(planner));
        self
    }

    /// Override the danger-map generator (defaults to line-of-fire).
    pub fn danger_model(mut self, model: impl DangerModel + 'static) -> Self {
        self.danger = Some(Box::new(model));
        self
    }

    /// Build the runtime, connecting over TCP unless a transport was
    /// injected.
    pub async fn build(self) -> Result<AgentRuntime> {
        let config = self.config;

        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Box::new(
                TcpTransport::connect(&config.host, config.port, config.response_timeout).await?,
            ),
        };

        let world: SharedWorld = Arc::new(RwLock::new(MatchState::new(self.agent_name)));
        let client = ServerClient::new(transport, world.clone());

        let planner = self
            .planner
            .unwrap_or_else(|| Box::new(GreedyPlanner::new(config.attack_range)));
        let danger = self
            .danger
            .unwrap_or_else(|| Box::new(LineOfFireModel::new(config.max_weight, config.attack_range)));

        Ok(AgentRuntime {
            client,
            world,
            kind: self.kind,
            planner,
            danger,
            chat: self.chat,
            config,
        })
    }
}
