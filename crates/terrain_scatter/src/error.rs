//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Generation itself never fails; errors cover configuration validation, tile
//! catalog construction, and spawning or joining background generation tasks.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid tile set: {0}")]
    InvalidTileSet(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("generation worker panicked")]
    WorkerPanicked,

    #[error("generation worker disconnected before sending a result")]
    Disconnected,
}
