//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Only
//! fatal conditions are represented here: invalid parameters and broken split-tree
//! invariants. Recoverable placement failures (no facing walls for a corridor, no
//! matching room type, missing prefab) are reported through
//! [`crate::generator::events::GenerationEvent::Warning`] instead.
use thiserror::Error;

use crate::layout::split::AreaId;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("split areas {a} and {b} are not disjoint on either axis")]
    MalformedAdjacency { a: AreaId, b: AreaId },

    #[error("generation produced no rooms")]
    NoRooms,

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
