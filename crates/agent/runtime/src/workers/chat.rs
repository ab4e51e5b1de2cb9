//! Chat listener: turns chat traffic into voting obligations.
//!
//! The chat subsystem itself is an external collaborator; it is consumed
//! here as a plain line stream. Two message shapes matter to the agent:
//! `EMERGENCY` raises the emergency-meeting flag, and `JUDGE <name>
//! <nature>` queues a judgement obligation. Everything else is chatter.

use async_trait::async_trait;
use tracing::debug;

use agent_core::state::VoteRequest;

use crate::SharedWorld;

use super::Shutdown;

/// Line stream from the chat subsystem.
#[async_trait]
pub trait ChatFeed: Send {
    /// Next chat line, or `None` once the feed is closed.
    async fn next_line(&mut self) -> Option<String>;
}

/// Background task feeding chat-driven obligations into the world model.
pub struct ChatListener {
    feed: Box<dyn ChatFeed>,
    world: SharedWorld,
    shutdown: Shutdown,
}

impl ChatListener {
    pub fn new(feed: Box<dyn ChatFeed>, world: SharedWorld, shutdown: Shutdown) -> Self {
        Self {
            feed,
            world,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
                line = self.feed.next_line() => {
                    match line {
                        Some(line) => self.ingest(&line).await,
                        None => break,
                    }
                }
            }
        }
        debug!("chat listener stopped");
    }

    async fn ingest(&mut self, line: &str) {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("EMERGENCY") => {
                debug!("emergency meeting called");
                self.world.write().await.emergency_meeting = true;
            }
            Some("JUDGE") => {
                if let (Some(subject), Some(nature)) = (tokens.next(), tokens.next()) {
                    debug!(subject, nature, "judgement requested");
                    self.world
                        .write()
                        .await
                        .push_vote(VoteRequest::new(subject, nature));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;

    use agent_core::MatchState;
    use tokio::sync::{RwLock, watch};

    struct ScriptedFeed {
        lines: VecDeque<String>,
    }

    #[async_trait]
    impl ChatFeed for ScriptedFeed {
        async fn next_line(&mut self) -> Option<String> {
            self.lines.pop_front()
        }
    }

    fn listener_over(
        lines: &[&str],
    ) -> (ChatListener, SharedWorld, watch::Sender<bool>) {
        let world = Arc::new(RwLock::new(MatchState::new("karen")));
        // The sender stays alive for the whole test; dropping it would read
        // as a shutdown.
        let (tx, rx) = watch::channel(false);
        let feed = ScriptedFeed {
            lines: lines.iter().map(|line| line.to_string()).collect(),
        };
        (
            ChatListener::new(Box::new(feed), world.clone(), rx),
            world,
            tx,
        )
    }

    #[tokio::test]
    async fn emergency_and_judgements_reach_the_world_model() {
        let (listener, world, _tx) = listener_over(&[
            "EMERGENCY",
            "JUDGE mallory AI",
            "hello everyone",
            "JUDGE trent H",
        ]);
        listener.run().await;

        let world = world.read().await;
        assert!(world.emergency_meeting);
        assert_eq!(world.pending_votes.len(), 2);
        assert_eq!(world.pending_votes[0].subject, "mallory");
        assert_eq!(world.pending_votes[1].nature, "H");
    }

    #[tokio::test]
    async fn malformed_judgements_are_ignored() {
        let (listener, world, _tx) = listener_over(&["JUDGE", "JUDGE lonely"]);
        listener.run().await;

        assert!(world.read().await.pending_votes.is_empty());
    }
}
