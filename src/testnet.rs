//! In-process network of randomly wired nodes.

use rand::Rng;
use tracing::debug;

use crate::common::{Id, RoutingTable, ID_BITS};
use crate::node::{Config, Node};
use crate::{Error, Result};

#[derive(Debug)]
/// Create a testnet of in-process nodes, every routing table slot pointing
/// to a uniformly random member (possibly the node itself).
///
/// The testnet owns its nodes; routing tables only hold weak references,
/// so neighbors stay reachable as long as the testnet is alive.
pub struct Testnet {
    nodes: Vec<Node>,
}

impl Testnet {
    /// Build a fully wired testnet of `count` nodes with random Ids.
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Testnet> {
        Testnet::builder(count).build(rng)
    }

    pub fn builder(count: usize) -> TestnetBuilder {
        TestnetBuilder {
            count,
            fill_probability: 1.0,
            config: Config::default(),
            ids: vec![],
        }
    }

    // === Getters ===

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`, an empty testnet can't be built.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Public Methods ===

    /// A uniformly random member of this testnet.
    pub fn random_node<R: Rng + ?Sized>(&self, rng: &mut R) -> &Node {
        &self.nodes[rng.gen_range(0..self.nodes.len())]
    }

    /// All members whose Id is the SHA-1 of `key`, i.e. those that accept storing it.
    pub fn owners(&self, key: &[u8]) -> Vec<&Node> {
        let target = Id::from_key(key);

        self.nodes.iter().filter(|n| n.id() == &target).collect()
    }
}

#[derive(Debug)]
pub struct TestnetBuilder {
    count: usize,
    fill_probability: f64,
    config: Config,
    ids: Vec<Id>,
}

impl TestnetBuilder {
    /// Probability that any single routing table slot gets wired.
    ///
    /// Clamped to `0.0..=1.0`, defaults to `1.0`.
    pub fn fill_probability(mut self, probability: f64) -> Self {
        self.fill_probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    /// [Config] shared by every node.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use these Ids for the first nodes, random ones for the rest.
    ///
    /// Extra Ids grow the testnet past `count`.
    pub fn ids<I: IntoIterator<Item = Id>>(mut self, ids: I) -> Self {
        self.ids.extend(ids);
        self
    }

    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Testnet> {
        let count = self.count.max(self.ids.len());

        if count == 0 {
            return Err(Error::EmptyTestnet);
        }

        let config = self.config;
        let mut ids = self.ids;
        while ids.len() < count {
            ids.push(Id::random(rng));
        }

        let nodes: Vec<Node> = ids
            .into_iter()
            .map(|id| Node::with_config(id, config))
            .collect();

        for node in &nodes {
            let mut table = RoutingTable::new(*node.id());

            for slot in 0..ID_BITS {
                if rng.gen_bool(self.fill_probability) {
                    table.set(slot, &nodes[rng.gen_range(0..count)])?;
                }
            }

            node.wire(table)?;
        }

        debug!(count, fill_probability = self.fill_probability, "Testnet wired");

        Ok(Testnet { nodes })
    }
}
