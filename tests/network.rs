//! Store and retrieve across a wired testnet.

use kadnode::{Bytes, Id, Node, RoutingTable, Testnet};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

#[test]
fn random_keys_are_declined_everywhere() {
    let mut rng = StdRng::seed_from_u64(42);
    let testnet = Testnet::new(50, &mut rng).unwrap();

    for _ in 0..100 {
        let key: [u8; 16] = rng.gen();
        let node = testnet.random_node(&mut rng);

        assert!(!node.store(&key, b"value"));
        assert_eq!(node.retrieve(&key), None);
    }

    assert!(testnet.nodes().iter().all(|n| n.local_store().is_empty()));
}

#[test]
fn owners_propagate_to_each_other() {
    let target = Id::from_key(b"foo");

    let a = Node::new(target);
    let b = Node::new(target);

    // An owner's own bucket for its target is the last slot, the first one forwarded to.
    let mut a_table = RoutingTable::new(target);
    a_table.set(159, &b).unwrap();
    a.wire(a_table).unwrap();

    let mut b_table = RoutingTable::new(target);
    b_table.set(0, &a).unwrap();
    b.wire(b_table).unwrap();

    assert!(a.store(b"foo", b"bar"));
    assert!(a.store(b"foo", b"baz"));
    assert!(b.store(b"foo", b"qux"));

    assert_eq!(a.retrieve(b"foo"), Some(Bytes::from_static(b"bar")));
    assert_eq!(b.retrieve(b"foo"), Some(Bytes::from_static(b"bar")));
}

#[test]
fn retrieve_is_single_hop() {
    let mut rng = StdRng::seed_from_u64(9);

    let c = Node::new(Id::random(&mut rng));
    let d = Node::new(Id::random(&mut rng));
    let e = Node::new(Id::random(&mut rng));

    e.local_store().put(b"foo", b"foo");

    let mut d_table = RoutingTable::new(*d.id());
    d_table.set(0, &e).unwrap();
    d.wire(d_table).unwrap();

    let mut c_table = RoutingTable::new(*c.id());
    c_table.set(0, &d).unwrap();
    c.wire(c_table).unwrap();

    assert_eq!(d.retrieve(b"foo"), Some(Bytes::from_static(b"foo")));
    assert_eq!(c.retrieve(b"foo"), None);
}

#[test]
fn concurrent_stores_first_writer_wins() {
    let mut rng = StdRng::seed_from_u64(11);
    let target = Id::from_key(b"foo");

    let testnet = Testnet::builder(8)
        .ids(vec![target; 8])
        .build(&mut rng)
        .unwrap();

    let values: Vec<Vec<u8>> = (0..64_u8).map(|i| vec![i]).collect();

    let results: Vec<bool> = values
        .par_iter()
        .enumerate()
        .map(|(i, value)| {
            let node = testnet.node(i % testnet.len()).unwrap();
            node.store(b"foo", value)
        })
        .collect();

    assert!(results.iter().all(|stored| *stored));

    for node in testnet.nodes() {
        let stored = node.local_store().get(b"foo").unwrap();
        assert!(values.iter().any(|v| v.as_slice() == stored.as_ref()));
        assert_eq!(node.local_store().len(), 1);
    }
}

#[test]
fn concurrent_retrieves() {
    let mut rng = StdRng::seed_from_u64(13);
    let testnet = Testnet::new(30, &mut rng).unwrap();

    for node in testnet.nodes() {
        node.local_store().put(b"self-addressed", b"self-addressed");
    }

    let found = testnet
        .nodes()
        .par_iter()
        .filter(|node| node.retrieve(b"self-addressed").is_some())
        .count();

    assert_eq!(found, testnet.len());
}
