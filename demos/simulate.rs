//! Build a randomly wired testnet, store random keys on random nodes, then
//! retrieve a sample of them from random nodes.
//!
//! Run: `cargo run --example simulate -- --peers 100 --keys 200`

use clap::Parser;
use kadnode::{Id, Testnet};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of nodes in the testnet
    #[arg(long, default_value_t = 100)]
    peers: usize,
    /// Number of random keys to store
    #[arg(long, default_value_t = 200)]
    keys: usize,
    /// Also add one owner node per stored key, so stores can succeed
    #[arg(long)]
    owners: bool,
    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Log every store and retrieve step
    #[arg(short, long)]
    verbose: bool,
}

fn random_bytes<R: Rng>(rng: &mut R) -> Vec<u8> {
    let len = rng.gen_range(1..=100);
    (0..len).map(|_| rng.gen()).collect()
}

fn main() -> kadnode::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::TRACE } else { Level::INFO })
        .init();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let pairs: Vec<(Vec<u8>, Vec<u8>)> = (0..cli.keys)
        .map(|_| (random_bytes(&mut rng), random_bytes(&mut rng)))
        .collect();

    let owners: Vec<Id> = if cli.owners {
        pairs.iter().map(|(key, _)| Id::from_key(key)).collect()
    } else {
        vec![]
    };

    let testnet = Testnet::builder(cli.peers).ids(owners).build(&mut rng)?;

    let mut stored = 0;
    for (key, value) in &pairs {
        if testnet.random_node(&mut rng).store(key, value) {
            stored += 1;
        }
    }

    info!(stored, declined = pairs.len() - stored, "Stores done");

    let mut found = 0;
    let lookups = cli.keys / 2;
    for _ in 0..lookups {
        let (key, _) = &pairs[rng.gen_range(0..pairs.len())];
        let node = testnet.random_node(&mut rng);

        match node.retrieve(key) {
            Some(value) => {
                found += 1;
                info!(node = %node.id(), key = %Id::from_key(key), len = value.len(), "Found value");
            }
            None => info!(node = %node.id(), key = %Id::from_key(key), "Can't find value"),
        }
    }

    info!(lookups, found, "Retrieves done");

    Ok(())
}
