use super::common::{Position, Symbol};

/// The two flag cells, oriented from this agent's perspective.
///
/// Resolved exactly once, from the first full grid observation: the agent's
/// faction is read off the case of its own symbol, and the flag glyph of the
/// matching case is the one to capture while the opposite-case glyph is the
/// one to protect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlagPair {
    /// The flag this agent's side must reach.
    pub wanted: Position,
    /// The flag this agent's side must protect.
    pub defended: Position,
}

impl FlagPair {
    /// Orients the flag pair for an agent with the given symbol.
    pub fn resolve(own: Symbol, lower_flag: Position, upper_flag: Position) -> Self {
        if own.is_upper_faction() {
            Self {
                wanted: upper_flag,
                defended: lower_flag,
            }
        } else {
            Self {
                wanted: lower_flag,
                defended: upper_flag,
            }
        }
    }
}
