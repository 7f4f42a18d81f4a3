//! Main Crate Error

use crate::common::Id;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
/// Kadnode crate error enum.
pub enum Error {
    /// Id bytes were not exactly [ID_SIZE](crate::common::ID_SIZE) long.
    #[error("Invalid Id size, expected 20, got {0}")]
    InvalidIdSize(usize),

    /// Id string was not 40 hex characters.
    #[error("Invalid Id encoding: {0}")]
    InvalidIdEncoding(String),

    /// Routing table slot index past the last bucket.
    #[error("Routing table slot {0} is out of range")]
    SlotOutOfRange(usize),

    /// Tried to hand a node a routing table built for a different owner.
    #[error("Routing table belongs to {found}, not {expected}")]
    RoutingTableMismatch { expected: Id, found: Id },

    /// The node's routing table was already wired.
    #[error("Node {0} is already wired")]
    AlreadyWired(Id),

    #[error("Testnet needs at least one node")]
    EmptyTestnet,
}

/// Alias for `Result<T, Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;
