//! Wire protocol: command rendering and snapshot decoding.
//!
//! The command grammar and the response layouts are fixed by the game
//! server; both sides of the conversation are reproduced here byte for
//! byte. [`decoder`] turns the two long-response shapes (status listings
//! and grid dumps) into world-model updates.

pub mod command;
pub mod decoder;
mod error;

pub use command::{Command, tokens};
pub use error::DecodeError;
