use std::vec::IntoIter;

use crate::{Id, Node};

/// Default number of closest nodes a retrieval inspects.
pub const DEFAULT_CLOSEST_COUNT: usize = 2;

#[derive(Debug, Clone)]
/// Bounded set of the nodes closest to a target, sorted by increasing XOR distance.
pub struct ClosestNodes {
    target: Id,
    limit: usize,
    nodes: Vec<Node>,
}

impl ClosestNodes {
    pub fn new(target: Id, limit: usize) -> Self {
        Self {
            target,
            limit,
            nodes: Vec::with_capacity(limit),
        }
    }

    /// Select up to `limit` nodes closest to `target` out of `pool`.
    pub fn select<I>(target: Id, limit: usize, pool: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        let mut closest = Self::new(target, limit);

        for node in pool {
            closest.add(node);
        }

        closest
    }

    // === Getters ===

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Public Methods ===

    /// Add a candidate, keeping only the `limit` closest.
    ///
    /// On equal distance the node seen first keeps its place, and a node
    /// already present is never added twice.
    pub fn add(&mut self, node: Node) {
        if self.nodes.iter().any(|n| n.ptr_eq(&node)) {
            return;
        }

        let seek = node.id().xor(&self.target);
        let pos = self
            .nodes
            .partition_point(|probe| probe.id().xor(&self.target) <= seek);

        if pos >= self.limit {
            return;
        }

        self.nodes.insert(pos, node);
        self.nodes.truncate(self.limit);
    }
}

impl IntoIterator for ClosestNodes {
    type Item = Node;
    type IntoIter = IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ClosestNodes {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
