use thiserror::Error;

/// Errors raised by invariant-preserving world-model mutators.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("position ({x},{y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("grid rows have inconsistent lengths")]
    RaggedGrid,

    #[error("grid dump contained no rows")]
    EmptyGrid,
}
