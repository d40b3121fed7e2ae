use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid maze layout: {0}")]
    InvalidLayout(&'static str),
}

/// Failures reported by a [`crate::HighScoreStore`]. The engine logs these and
/// carries on with a default instead of propagating them into the tick loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("High score store unavailable: {0}")]
    Unavailable(String),
    #[error("Stored high score could not be decoded: {0}")]
    Corrupt(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
