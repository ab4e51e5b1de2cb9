//! Server command API over the transport.
//!
//! One method per protocol command. Setup commands (create/join/start)
//! treat a refusal as [`AgentError::CommandRejected`]; in-match action
//! commands return whether the action was acknowledged, so a rejected move
//! or vote is "the action did not happen" and never optimistically applied
//! to the world model.

use tracing::{debug, warn};

use agent_core::protocol::{Command, decoder, tokens};
use agent_core::state::{Direction, Position, TeamId};

use crate::error::{AgentError, Result};
use crate::transport::Transport;
use crate::SharedWorld;

pub struct ServerClient {
    transport: Box<dyn Transport>,
    world: SharedWorld,
    game: Option<String>,
}

impl ServerClient {
    pub fn new(transport: Box<dyn Transport>, world: SharedWorld) -> Self {
        Self {
            transport,
            world,
            game: None,
        }
    }

    pub fn world(&self) -> SharedWorld {
        self.world.clone()
    }

    fn game(&self) -> Result<String> {
        self.game.clone().ok_or(AgentError::NotInGame)
    }

    async fn exchange(&mut self, command: Command<'_>) -> Result<Vec<String>> {
        let request = command.render();
        let response = self.transport.exchange(&request).await?;
        debug!(
            request = %request,
            reply = response.first().map(String::as_str).unwrap_or(""),
            "exchange"
        );
        Ok(response)
    }

    /// Creates a new game room and remembers it as the current game.
    pub async fn create_game(&mut self, game: &str, flags: Option<&str>) -> Result<()> {
        let response = self.exchange(Command::Create { game, flags }).await?;
        let first = response.first().map(String::as_str).unwrap_or("");
        if first != tokens::CREATED {
            return Err(AgentError::CommandRejected {
                command: Command::Create { game, flags }.render(),
                response: first.to_owned(),
            });
        }

        self.game = Some(game.to_owned());
        self.world.write().await.name = Some(game.to_owned());
        Ok(())
    }

    /// Joins a game; the reply's `team=` and `loyalty=` tokens land in the
    /// world model and decide the strategy's rule set.
    pub async fn join_game(
        &mut self,
        game: &str,
        nature: &str,
        role: &str,
        info: Option<&str>,
    ) -> Result<()> {
        let name = self.world.read().await.me.name.clone();
        let command = Command::Join {
            game,
            name: &name,
            nature,
            role,
            info,
        };
        let request = command.render();
        let response = self.exchange(command).await?;
        let first = response.first().map(String::as_str).unwrap_or("");

        if !first.starts_with(tokens::OK) {
            return Err(AgentError::CommandRejected {
                command: request,
                response: first.to_owned(),
            });
        }

        // Reply layout: OK team=<t> loyalty=<l>
        let fields = decoder::split_fields(first);
        let mut world = self.world.write().await;
        world.name = Some(game.to_owned());
        world.me.nature = Some(nature.to_owned());
        world.me.role = Some(role.to_owned());
        world.me.team = fields.get(2).map(|token| TeamId((*token).to_owned()));
        world.me.loyalty = fields.get(4).map(|token| TeamId((*token).to_owned()));
        drop(world);

        self.game = Some(game.to_owned());
        Ok(())
    }

    /// Starts the match; only the creator of the room may do this.
    pub async fn start_game(&mut self) -> Result<()> {
        let game = self.game()?;
        let response = self.exchange(Command::Start { game: &game }).await?;
        let first = response.first().map(String::as_str).unwrap_or("");
        if first != tokens::STARTED {
            return Err(AgentError::CommandRejected {
                command: Command::Start { game: &game }.render(),
                response: first.to_owned(),
            });
        }
        Ok(())
    }

    /// Leaves the current game; true if the server acknowledged.
    pub async fn leave_game(&mut self, reason: Option<&str>) -> Result<bool> {
        let game = self.game()?;
        let response = self.exchange(Command::Leave { game: &game, reason }).await?;
        let accepted = response
            .first()
            .is_some_and(|line| line.starts_with(tokens::OK));
        if accepted {
            self.game = None;
        } else {
            warn!(reply = ?response.first(), "leave rejected");
        }
        Ok(accepted)
    }

    /// Full status query; decodes the listing into the world model.
    pub async fn sync_status(&mut self) -> Result<()> {
        let game = self.game()?;
        let response = self.exchange(Command::Status { game: &game }).await?;
        let mut world = self.world.write().await;
        decoder::apply_status(&mut world, &response)?;
        Ok(())
    }

    /// Grid dump query; cheaper than status but reveals no energy/score.
    pub async fn sync_look(&mut self) -> Result<()> {
        let game = self.game()?;
        let response = self.exchange(Command::Look { game: &game }).await?;
        let mut world = self.world.write().await;
        decoder::apply_look(&mut world, &response)?;
        Ok(())
    }

    /// One movement step; true if the server acknowledged the move.
    pub async fn step(&mut self, direction: Direction) -> Result<bool> {
        let game = self.game()?;
        let response = self
            .exchange(Command::Move {
                game: &game,
                direction,
            })
            .await?;
        Ok(response.first().is_some_and(|line| line == tokens::MOVED))
    }

    /// Fires in the given direction; returns the impact coordinates when
    /// the reply carries them.
    pub async fn shoot(&mut self, direction: Direction) -> Result<Option<Position>> {
        let game = self.game()?;
        let response = self
            .exchange(Command::Shoot {
                game: &game,
                direction,
            })
            .await?;
        let first = response.first().map(String::as_str).unwrap_or("");
        if !first.starts_with(tokens::OK) {
            return Ok(None);
        }

        // The reply's trailing pair of integers is the impact cell.
        let fields = decoder::split_fields(first);
        let numbers: Vec<i32> = fields
            .iter()
            .filter_map(|token| token.parse().ok())
            .collect();
        Ok(match numbers[..] {
            [.., x, y] => Some(Position::new(x, y)),
            _ => None,
        })
    }

    /// Accuses a player during an emergency meeting.
    pub async fn accuse(&mut self, subject: &str) -> Result<bool> {
        let game = self.game()?;
        let response = self
            .exchange(Command::Accuse {
                game: &game,
                subject,
            })
            .await?;
        Ok(response.first().is_some_and(|line| line == tokens::OK))
    }

    /// Issues a judgement for a queued vote.
    pub async fn judge(&mut self, subject: &str, nature: &str) -> Result<bool> {
        let game = self.game()?;
        let response = self
            .exchange(Command::Judge {
                game: &game,
                subject,
                nature,
            })
            .await?;
        Ok(response.first().is_some_and(|line| line == tokens::OK))
    }

    /// Keep-alive; the reply is irrelevant.
    pub async fn keepalive(&mut self) -> Result<()> {
        let game = self.game()?;
        self.exchange(Command::Keepalive { game: &game }).await?;
        Ok(())
    }
}
