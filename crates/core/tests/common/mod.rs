//! # Test Helpers
//!
//! Builders for the configurations used throughout the suite.

use cachesim_core::config::{Associativity, ReplacementPolicy};
use cachesim_core::{CacheConfig, CacheSim, Outcome};

pub use Associativity::{Direct, FullyAssociative, SetAssociative};
pub use ReplacementPolicy::{Fifo, Lru};

/// Builds a validated configuration; panics on invalid sizes.
pub fn config(
    cache_size: usize,
    block_size: u64,
    associativity: Associativity,
    policy: ReplacementPolicy,
) -> CacheConfig {
    CacheConfig::new(cache_size, block_size, associativity, policy).unwrap()
}

/// Builds an empty cache with one byte per block, so addresses are block numbers.
pub fn cache(cache_size: usize, associativity: Associativity, policy: ReplacementPolicy) -> CacheSim {
    CacheSim::new(&config(cache_size, 1, associativity, policy))
}

/// Feeds `trace` to `cache` and collects the outcomes.
pub fn run(cache: &mut CacheSim, trace: &[u64]) -> Vec<Outcome> {
    trace.iter().map(|&addr| cache.access(addr)).collect()
}

/// Resident block numbers in snapshot order.
pub fn blocks(cache: &CacheSim) -> Vec<u64> {
    cache.snapshot().iter().map(|e| e.block.val()).collect()
}

/// Resident block numbers, sorted, for order-insensitive checks.
pub fn block_set(cache: &CacheSim) -> Vec<u64> {
    let mut blocks = blocks(cache);
    blocks.sort_unstable();
    blocks
}

/// Shorthand for outcome sequences: `'H'` is a hit, anything else a miss.
pub fn outcomes(pattern: &str) -> Vec<Outcome> {
    pattern
        .chars()
        .map(|c| if c == 'H' { Outcome::Hit } else { Outcome::Miss })
        .collect()
}

/// Routes library logs to the test harness; set `RUST_LOG` to see them.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
