//! A single node of a Kademlia style distributed hash table.
//!
//! Each [Node] owns a 160 bit [Id], a fixed [RoutingTable] of 160 neighbor
//! slots wired once by whoever builds the network, and a [LocalStore].
//! Nodes talk to each other through in-process calls:
//!
//! - [Node::store] accepts a key only if the node's Id is exactly the SHA-1
//!   of the key, then forwards it to a run of routing table slots.
//! - [Node::retrieve] looks locally, then into the local stores of the two
//!   neighbors closest to the key's SHA-1.
//!
//! [Testnet] builds and randomly wires a whole network for experiments.

mod common;
mod error;
mod node;
mod testnet;

pub use crate::common::{
    validate_value, ClosestNodes, Id, RoutingTable, RoutingTableIterator, DEFAULT_CLOSEST_COUNT,
    ID_BITS, ID_SIZE,
};
pub use crate::node::{Config, LocalStore, Node, DEFAULT_MAX_STORE_DEPTH, DEFAULT_STORE_FAN_OUT};
pub use crate::testnet::{Testnet, TestnetBuilder};
pub use bytes::Bytes;

pub use error::{Error, Result};
