//! Kademlia node: store and retrieve protocols.

mod config;
mod store;

use std::{
    collections::HashSet,
    fmt::{self, Debug, Formatter},
    sync::{Arc, OnceLock, Weak},
};

use bytes::Bytes;
use tracing::{debug, trace};

use crate::common::{validate_value, ClosestNodes, Id, RoutingTable, ID_BITS};
use crate::{Error, Result};

pub use config::{Config, DEFAULT_MAX_STORE_DEPTH, DEFAULT_STORE_FAN_OUT};
pub use store::LocalStore;

#[derive(Clone)]
/// Shared handle to a node.
///
/// Cloning is cheap and yields another handle to the same node.
pub struct Node(Arc<NodeInner>);

struct NodeInner {
    id: Id,
    config: Config,
    routing_table: OnceLock<RoutingTable>,
    store: LocalStore,
}

#[derive(Clone)]
pub(crate) struct WeakNode(Weak<NodeInner>);

impl WeakNode {
    pub(crate) fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }
}

impl Node {
    /// Creates a new unwired Node with default [Config].
    pub fn new(id: Id) -> Node {
        Node::with_config(id, Config::default())
    }

    pub fn with_config(id: Id, config: Config) -> Node {
        Node(Arc::new(NodeInner {
            id,
            config,
            routing_table: OnceLock::new(),
            store: LocalStore::new(),
        }))
    }

    // === Getters ===

    pub fn id(&self) -> &Id {
        &self.0.id
    }

    pub fn config(&self) -> &Config {
        &self.0.config
    }

    /// Returns the routing table, or `None` if the node was never wired.
    pub fn routing_table(&self) -> Option<&RoutingTable> {
        self.0.routing_table.get()
    }

    pub fn local_store(&self) -> &LocalStore {
        &self.0.store
    }

    /// Returns `true` if both handles point to the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    // === Public Methods ===

    /// Hand this node its routing table. Can only happen once, after which
    /// the table is read only.
    pub fn wire(&self, routing_table: RoutingTable) -> Result<()> {
        if routing_table.id() != self.id() {
            return Err(Error::RoutingTableMismatch {
                expected: *self.id(),
                found: *routing_table.id(),
            });
        }

        self.0
            .routing_table
            .set(routing_table)
            .map_err(|_| Error::AlreadyWired(*self.id()))
    }

    /// Non empty routing table slots in ascending slot order.
    pub fn neighbors(&self) -> Vec<Node> {
        self.routing_table()
            .map(|table| table.nodes().collect())
            .unwrap_or_default()
    }

    /// Store `value` under `key`.
    ///
    /// Returns `false` if this node's Id is not exactly the SHA-1 of `key`,
    /// in which case nothing is stored or forwarded. Otherwise the value is
    /// stored (unless the key is already present, which is a no-op) and
    /// forwarded to the neighbors in [Config::store_fan_out] consecutive
    /// slots starting at the key's bucket, and `true` is returned.
    pub fn store(&self, key: &[u8], value: &[u8]) -> bool {
        let target = Id::from_key(key);
        let key = Bytes::copy_from_slice(key);
        let value = Bytes::copy_from_slice(value);

        let mut visited = HashSet::new();

        self.store_inner(&key, &value, &target, 0, &mut visited)
    }

    /// Look up `key`, first locally then in the local stores of the closest
    /// neighbors to its SHA-1.
    ///
    /// A neighbor's value is only accepted if the SHA-1 of the value equals
    /// the SHA-1 of the key. Returns `None` when nothing acceptable is found.
    pub fn retrieve(&self, key: &[u8]) -> Option<Bytes> {
        if let Some(value) = self.local_store().get(key) {
            return Some(value);
        }

        let target = Id::from_key(key);

        let closest = ClosestNodes::select(
            target,
            self.config().retrieve_candidates,
            self.neighbors(),
        );

        for candidate in &closest {
            if let Some(value) = candidate.local_store().get(key) {
                if validate_value(&value, &target) {
                    return Some(value);
                }

                debug!(
                    id = ?self.id(),
                    ?target,
                    from = ?candidate.id(),
                    "Value doesn't hash to the key's target."
                );
            }
        }

        debug!(id = ?self.id(), ?target, candidates = closest.len(), "Value not found");

        None
    }

    // === Private Methods ===

    pub(crate) fn downgrade(&self) -> WeakNode {
        WeakNode(Arc::downgrade(&self.0))
    }

    fn address(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    fn store_inner(
        &self,
        key: &Bytes,
        value: &Bytes,
        target: &Id,
        depth: usize,
        visited: &mut HashSet<usize>,
    ) -> bool {
        trace!(id = ?self.id(), ?target, depth, key_len = key.len(), "Store");

        if target != self.id() {
            debug!(id = ?self.id(), ?target, "Not the owner of target, declining store");
            return false;
        }

        // Nodes may share an Id, so visits are tracked per node, not per Id.
        visited.insert(self.address());

        if !self.local_store().insert_if_absent(key, value) {
            trace!(id = ?self.id(), ?target, "Key already stored");
            return true;
        }

        debug!(id = ?self.id(), ?target, value_len = value.len(), "Stored value");

        if depth >= self.config().max_store_depth {
            debug!(id = ?self.id(), ?target, depth, "Store depth limit reached");
            return true;
        }

        let table = match self.routing_table() {
            Some(table) => table,
            None => return true,
        };

        let start = self.id().bucket_index(target);

        for i in 0..self.config().store_fan_out {
            let slot = (start + i) % ID_BITS;

            if let Some(neighbor) = table.get(slot) {
                if visited.contains(&neighbor.address()) {
                    continue;
                }

                trace!(id = ?self.id(), to = ?neighbor.id(), slot, "Forwarding store");

                neighbor.store_inner(key, value, target, depth + 1, visited);
            }
        }

        true
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", self.id())
            .field("stored", &self.local_store().len())
            .finish()
    }
}
