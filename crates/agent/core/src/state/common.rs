use std::fmt;

use serde::Serialize;
use strum::EnumIter;

/// Single-character map symbol identifying a player on the grid.
///
/// The character's case encodes the faction: both flags and player symbols
/// come in an uppercase and a lowercase variant, and the agent's own case
/// decides which flag glyph is the one to capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(pub char);

impl Symbol {
    /// Returns true if this symbol belongs to the uppercase faction.
    pub fn is_upper_faction(self) -> bool {
        self.0.is_ascii_uppercase()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discrete grid position in cell coordinates; `y` grows downward, matching
/// the row order of the server's grid dump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent cell in the given direction.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Straight-line distance, used for flag progress and threat ranges.
    pub fn euclidean(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Cardinal movement direction as accepted by the MOVE and SHOOT commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Cell delta for one step; north is up (towards row zero).
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    /// The single-letter wire token.
    pub const fn wire(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East => "E",
            Direction::West => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire())
    }
}

/// Server-assigned team identifier; loyalty uses the same token space.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TeamId(pub String);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Liveness of a player as reported by status listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum PlayerStatus {
    #[default]
    Active,
    Killed,
}

impl PlayerStatus {
    pub fn from_wire(token: &str) -> Option<Self> {
        match token {
            "ACTIVE" => Some(Self::Active),
            "KILLED" => Some(Self::Killed),
            _ => None,
        }
    }

    pub fn is_alive(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Match lifecycle as reported by the game status line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum MatchPhase {
    #[default]
    Lobby,
    Active,
    Finished,
}

impl MatchPhase {
    pub fn from_wire(token: &str) -> Option<Self> {
        match token {
            "LOBBY" => Some(Self::Lobby),
            "ACTIVE" => Some(Self::Active),
            "FINISHED" => Some(Self::Finished),
            _ => None,
        }
    }
}

/// Coarse progress indicator maintained by the game analyzer and consumed
/// as a fuzzy input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum MatchStage {
    #[default]
    Early,
    Mid,
    Late,
}

impl MatchStage {
    /// Numeric level on the stage fuzzification domain.
    pub const fn as_level(self) -> f64 {
        match self {
            MatchStage::Early => 0.0,
            MatchStage::Mid => 1.0,
            MatchStage::Late => 2.0,
        }
    }
}

/// A queued voting obligation: judge `subject` as being of `nature`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteRequest {
    pub subject: String,
    pub nature: String,
}

impl VoteRequest {
    pub fn new(subject: impl Into<String>, nature: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            nature: nature.into(),
        }
    }
}
