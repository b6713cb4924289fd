//! Error types for treereduce

use thiserror::Error;

/// Result type for partitioning and reduction.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid group, rank or job parameters. Raised before any work starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A derived peer does not exist in the group. Indicates a bug in role
    /// derivation, never a runtime condition.
    #[error("protocol violation: rank {rank} in round {round} derived peer {peer}")]
    ProtocolViolation {
        rank: usize,
        round: u32,
        peer: usize,
    },

    /// A send or receive failed at the transport boundary.
    #[error("transport failure between rank {rank} and rank {peer}: {reason}")]
    Transport {
        rank: usize,
        peer: usize,
        reason: String,
    },
}

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}
