use thiserror::Error;

use crate::state::StateError;

/// Errors raised while decoding a server response into the world model.
///
/// None of these are fatal: the caller logs the failure, keeps the stale
/// world model, and retries on the next synchronization cycle.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The leading status line did not carry the expected acknowledgement.
    #[error("snapshot not acknowledged: expected '{expected}', got '{got}'")]
    MalformedSnapshot { expected: &'static str, got: String },

    #[error("empty server response")]
    EmptyResponse,

    /// A tagged line ended before a fixed positional field.
    #[error("truncated tagged line: '{line}'")]
    TruncatedLine { line: String },

    /// A symbol field did not hold exactly one character.
    #[error("invalid symbol token '{value}'")]
    InvalidSymbol { value: String },

    /// An enumerated field held a token outside its vocabulary.
    #[error("unknown {field} token '{value}'")]
    UnknownToken { field: &'static str, value: String },

    #[error("field '{field}' does not parse as a number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error(transparent)]
    State(#[from] StateError),
}
