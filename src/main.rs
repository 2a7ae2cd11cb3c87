use std::collections::BTreeSet;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

use btree::BTree;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Workload knobs, read from the environment.
struct Config {
    min_degree: usize,
    operations: usize,
    // i64 so every drawn key fits the tree's key type
    key_space: i64,
    seed: u64,
}

impl Config {
    fn from_env() -> Self {
        let time_seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Config {
            min_degree: env_or("BTREE_MIN_DEGREE", 3),
            operations: env_or("BTREE_OPERATIONS", 10_000),
            key_space: env_or::<i64>("BTREE_KEY_SPACE", 1_000).max(1),
            seed: env_or("BTREE_SEED", time_seed.wrapping_mul(31)),
        }
    }
}

fn env_or<T: FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("ignoring {}={:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let config = Config::from_env();
    log::info!(
        "t={} operations={} key_space={} seed={} (set BTREE_SEED to reproduce)",
        config.min_degree,
        config.operations,
        config.key_space,
        config.seed
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut tree = BTree::new(config.min_degree);
    let mut model = BTreeSet::new();
    let start = Instant::now();

    for step in 0..config.operations {
        let key = rng.gen_range(0..config.key_space);
        let (op, ours, expected) = if rng.gen_bool(0.6) {
            ("insert", tree.insert(key), model.insert(key))
        } else {
            ("remove", tree.remove(&key), model.remove(&key))
        };

        if ours != expected {
            log::error!("step {}: {} {} returned {}, expected {}", step, op, key, ours, expected);
            return ExitCode::FAILURE;
        }
        if let Err(e) = tree.check() {
            log::error!("step {}: {} {} broke the tree: {}", step, op, key, e);
            log::error!("tree structure:\n{}", tree);
            return ExitCode::FAILURE;
        }
    }

    if !tree.iter().eq(model.iter()) {
        log::error!("final key sequence differs from the model");
        return ExitCode::FAILURE;
    }

    log::info!(
        "done in {:?}: {} keys, height {:?}, {} nodes, min {:?}, max {:?}",
        start.elapsed(),
        tree.len(),
        tree.height(),
        tree.node_count(),
        tree.min(),
        tree.max()
    );
    if tree.len() <= 32 {
        println!("{}", tree);
    }
    ExitCode::SUCCESS
}
