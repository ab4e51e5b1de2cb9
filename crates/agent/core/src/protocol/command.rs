//! Request rendering for the server's line-oriented command grammar.

use crate::state::Direction;

/// Leading response tokens the server answers with on success.
pub mod tokens {
    /// Room creation acknowledged.
    pub const CREATED: &str = "OK Created";
    /// Match start acknowledged.
    pub const STARTED: &str = "OK Game started";
    /// Multi-line response follows (status listings and grid dumps).
    pub const LONG: &str = "OK LONG";
    /// Move acknowledged.
    pub const MOVED: &str = "OK moved";
    /// Generic acknowledgement prefix.
    pub const OK: &str = "OK";
}

/// One request to the game server.
///
/// `render` produces the exact wire line; the formats are load-bearing for
/// interoperability and covered by tests, including the missing space in
/// the LEAVE command that the server grammar expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Create {
        game: &'a str,
        flags: Option<&'a str>,
    },
    Join {
        game: &'a str,
        name: &'a str,
        nature: &'a str,
        role: &'a str,
        info: Option<&'a str>,
    },
    Start {
        game: &'a str,
    },
    Status {
        game: &'a str,
    },
    Look {
        game: &'a str,
    },
    Move {
        game: &'a str,
        direction: Direction,
    },
    Shoot {
        game: &'a str,
        direction: Direction,
    },
    Accuse {
        game: &'a str,
        subject: &'a str,
    },
    Judge {
        game: &'a str,
        subject: &'a str,
        nature: &'a str,
    },
    Leave {
        game: &'a str,
        reason: Option<&'a str>,
    },
    Keepalive {
        game: &'a str,
    },
}

impl Command<'_> {
    /// Renders the request line exactly as the server expects it.
    pub fn render(&self) -> String {
        match self {
            Command::Create { game, flags } => match flags {
                Some(flags) => format!("NEW {game} {flags}"),
                None => format!("NEW {game}"),
            },
            Command::Join {
                game,
                name,
                nature,
                role,
                info,
            } => {
                let mut line = format!("{game} JOIN {name} {nature} {role}");
                if let Some(info) = info {
                    line.push(' ');
                    line.push_str(info);
                }
                line
            }
            Command::Start { game } => format!("{game} START"),
            Command::Status { game } => format!("{game} STATUS"),
            Command::Look { game } => format!("{game} LOOK"),
            Command::Move { game, direction } => format!("{game} MOVE {}", direction.wire()),
            Command::Shoot { game, direction } => format!("{game} SHOOT {}", direction.wire()),
            Command::Accuse { game, subject } => format!("{game} ACCUSE {subject}"),
            Command::Judge {
                game,
                subject,
                nature,
            } => format!("{game} JUDGE {subject} {nature}"),
            Command::Leave { game, reason } => match reason {
                Some(reason) => format!("{game}LEAVE {reason}"),
                None => format!("{game}LEAVE"),
            },
            Command::Keepalive { game } => format!("{game} NOP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_lines_match_the_wire_grammar() {
        assert_eq!(
            Command::Create {
                game: "room1",
                flags: Some("T2")
            }
            .render(),
            "NEW room1 T2"
        );
        assert_eq!(
            Command::Join {
                game: "room1",
                name: "karen",
                nature: "AI",
                role: "0",
                info: None
            }
            .render(),
            "room1 JOIN karen AI 0"
        );
        assert_eq!(Command::Start { game: "room1" }.render(), "room1 START");
        assert_eq!(Command::Status { game: "room1" }.render(), "room1 STATUS");
        assert_eq!(Command::Look { game: "room1" }.render(), "room1 LOOK");
        assert_eq!(
            Command::Move {
                game: "room1",
                direction: Direction::North
            }
            .render(),
            "room1 MOVE N"
        );
        assert_eq!(
            Command::Shoot {
                game: "room1",
                direction: Direction::West
            }
            .render(),
            "room1 SHOOT W"
        );
        assert_eq!(
            Command::Accuse {
                game: "room1",
                subject: "mallory"
            }
            .render(),
            "room1 ACCUSE mallory"
        );
        assert_eq!(
            Command::Judge {
                game: "room1",
                subject: "mallory",
                nature: "AI"
            }
            .render(),
            "room1 JUDGE mallory AI"
        );
        assert_eq!(Command::Keepalive { game: "room1" }.render(), "room1 NOP");
    }

    #[test]
    fn leave_has_no_separator_before_the_verb() {
        assert_eq!(
            Command::Leave {
                game: "room1",
                reason: None
            }
            .render(),
            "room1LEAVE"
        );
        assert_eq!(
            Command::Leave {
                game: "room1",
                reason: Some("done")
            }
            .render(),
            "room1LEAVE done"
        );
    }
}
