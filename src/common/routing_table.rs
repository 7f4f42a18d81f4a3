//! Fixed slot Kademlia routing table

use std::fmt::{self, Debug, Formatter};

use crate::common::{ClosestNodes, Id, ID_BITS};
use crate::node::{Node, WeakNode};
use crate::{Error, Result};

#[derive(Clone)]
/// One neighbor slot per bucket index.
///
/// Slots hold weak references: the table never keeps a neighbor alive, and a
/// dropped neighbor reads as an empty slot.
pub struct RoutingTable {
    id: Id,
    slots: Box<[Option<WeakNode>]>,
}

impl RoutingTable {
    /// Create a new, empty [RoutingTable] owned by `id`.
    pub fn new(id: Id) -> Self {
        RoutingTable {
            id,
            slots: vec![None; ID_BITS].into_boxed_slice(),
        }
    }

    /// Returns the [Id] of the owning node, where the distance is measured from.
    pub fn id(&self) -> &Id {
        &self.id
    }

    // === Public Methods ===

    /// Point `slot` at `node`, replacing whatever was there.
    pub fn set(&mut self, slot: usize, node: &Node) -> Result<()> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(Error::SlotOutOfRange(slot))?;

        *entry = Some(node.downgrade());

        Ok(())
    }

    /// Returns the live neighbor at `slot`, if any.
    pub fn get(&self, slot: usize) -> Option<Node> {
        self.slots.get(slot)?.as_ref()?.upgrade()
    }

    /// Put `node` into its own bucket slot if that slot is free, and return `true` if it did.
    pub fn add(&mut self, node: &Node) -> bool {
        if node.id() == &self.id {
            // Do not add self to the routing_table
            return false;
        }

        let slot = self.id.bucket_index(node.id());

        if self.get(slot).is_some() {
            return false;
        }

        self.slots[slot] = Some(node.downgrade());

        true
    }

    /// Returns `true` if no slot holds a live neighbor.
    pub fn is_empty(&self) -> bool {
        self.nodes().next().is_none()
    }

    /// Number of non empty slots.
    pub fn size(&self) -> usize {
        self.nodes().count()
    }

    /// Iterates live neighbors by ascending slot index, skipping empty slots.
    ///
    /// The same neighbor appears once per slot it occupies.
    pub fn nodes(&self) -> RoutingTableIterator<'_> {
        RoutingTableIterator {
            slot: 0,
            table: self,
        }
    }

    /// Return up to `count` neighbors closest to `target`, nearest first.
    pub fn closest(&self, target: Id, count: usize) -> ClosestNodes {
        ClosestNodes::select(target, count, self.nodes())
    }
}

impl Debug for RoutingTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingTable")
            .field("id", &self.id)
            .field("size", &self.size())
            .finish()
    }
}

pub struct RoutingTableIterator<'a> {
    slot: usize,
    table: &'a RoutingTable,
}

impl Iterator for RoutingTableIterator<'_> {
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        while self.slot < self.table.slots.len() {
            let current = self.table.get(self.slot);
            self.slot += 1;

            if current.is_some() {
                return current;
            }
        }

        None
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn table_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut table = RoutingTable::new(Id::random(&mut rng));
        assert!(table.is_empty());

        let node = Node::new(Id::random(&mut rng));
        table.add(&node);
        assert!(!table.is_empty());
        assert_eq!(table.size(), 1);
    }

    #[test]
    fn set_out_of_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut table = RoutingTable::new(Id::random(&mut rng));
        let node = Node::new(Id::random(&mut rng));

        assert_eq!(table.set(ID_BITS, &node), Err(Error::SlotOutOfRange(ID_BITS)));
        assert!(table.set(ID_BITS - 1, &node).is_ok());
        assert!(table.get(ID_BITS - 1).is_some());
        assert!(table.get(ID_BITS).is_none());
    }

    #[test]
    fn nodes_follow_slot_order() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut table = RoutingTable::new(Id::random(&mut rng));

        let a = Node::new(Id::random(&mut rng));
        let b = Node::new(Id::random(&mut rng));

        table.set(100, &a).unwrap();
        table.set(3, &b).unwrap();
        table.set(40, &a).unwrap();

        let ids: Vec<Id> = table.nodes().map(|n| *n.id()).collect();

        assert_eq!(ids, vec![*b.id(), *a.id(), *a.id()]);
    }

    #[test]
    fn dropped_neighbor_reads_as_empty() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut table = RoutingTable::new(Id::random(&mut rng));

        {
            let node = Node::new(Id::random(&mut rng));
            table.set(7, &node).unwrap();
            assert_eq!(table.size(), 1);
        }

        assert!(table.get(7).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn add_uses_bucket_index() {
        let owner = Id::from_str("0000000000000000000000000000000000000000").unwrap();
        let mut table = RoutingTable::new(owner);

        let far = Node::new(Id::from_str("8000000000000000000000000000000000000000").unwrap());
        let also_far = Node::new(Id::from_str("c000000000000000000000000000000000000000").unwrap());
        let near = Node::new(Id::from_str("0000000000000000000000000000000000000001").unwrap());

        assert!(table.add(&far));
        assert!(!table.add(&also_far));
        assert!(table.add(&near));

        assert!(table.get(0).unwrap().ptr_eq(&far));
        assert!(table.get(159).unwrap().ptr_eq(&near));
    }

    #[test]
    fn should_not_add_self() {
        let mut rng = StdRng::seed_from_u64(5);
        let id = Id::random(&mut rng);
        let mut table = RoutingTable::new(id);

        assert!(!table.add(&Node::new(id)));
        assert!(table.is_empty());
    }

    #[test]
    fn closest() {
        let ids = [
            "fb449c17f6c34fadea26a5a83e1952e815e001ea",
            "e63b72f95aacee40ad087f83afb475645739f669",
            "58c65677e3833cb0f15733a6363cc4cb1352f90a",
            "fd042ff1404b495720ad8345404ff5f25acd02a8",
            "dbed34a2c8db568fe59c10adcca9e81825b3dcfd",
            "079d40b746b5721f59972ebde423429739844914",
            "094f1d2fb4b95ba2c3250b014a9f06d13cd9eb9a",
            "98805a55523458c56d59339266bdcecc82370ecd",
            "0a1d6cce47c60f2c7357e9fec2910192de6eb336",
            "fb689ce0e18c2c22f316976d3ae524aed4137773",
        ];

        let nodes: Vec<Node> = ids
            .iter()
            .map(|str| Node::new(Id::from_str(str).unwrap()))
            .collect();

        let local_id = Id::from_str("ba3042eb2d373b19e7c411ce6826e31b37be0b2e").unwrap();
        let mut table = RoutingTable::new(local_id);

        for (slot, node) in nodes.iter().enumerate() {
            table.set(slot * 16, node).unwrap();
        }

        let target = Id::from_str("fb00000000000000000000000000000000000000").unwrap();
        let closest = table.closest(target, 2);

        let closest_ids: Vec<String> = closest.nodes().iter().map(|n| n.id().to_string()).collect();

        assert_eq!(
            closest_ids,
            vec![
                "fb449c17f6c34fadea26a5a83e1952e815e001ea".to_string(),
                "fb689ce0e18c2c22f316976d3ae524aed4137773".to_string(),
            ]
        );
    }
}
