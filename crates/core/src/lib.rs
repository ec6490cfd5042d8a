//! Single-level cache simulator library.
//!
//! This crate simulates which memory references hit a cache, given its
//! organization and replacement policy:
//! 1. **Configuration:** Cache size, block size, associativity and policy, validated at the boundary.
//! 2. **Cache:** A deterministic engine for direct-mapped, 2-way set-associative and fully-associative caches with LRU or FIFO replacement.
//! 3. **Simulation:** Trace parsing, preset patterns, whole-trace runs and reports.
//! 4. **Advisory:** The boundary to an optional external configuration advisor.
//!
//! ```
//! use cachesim_core::{CacheConfig, Simulator};
//! use cachesim_core::config::{Associativity, ReplacementPolicy};
//!
//! let config = CacheConfig::new(2, 1, Associativity::FullyAssociative, ReplacementPolicy::Lru)?;
//! let report = Simulator::new(&config).run_text("1 2 1 3")?;
//! assert_eq!((report.hits, report.misses), (1, 3));
//! # Ok::<(), cachesim_core::Error>(())
//! ```

/// External configuration advisor boundary.
pub mod advisory;
/// Cache engine, layout and replacement policies.
pub mod cache;
/// Shared types (block numbers, errors).
pub mod common;
/// Configuration types, defaults and validation.
pub mod config;
/// Trace parsing, presets and the whole-trace simulator.
pub mod sim;
/// Hit/miss counters.
pub mod stats;

/// The cache engine; construct with `CacheSim::new`.
pub use crate::cache::{CacheSim, Outcome, SnapshotEntry};
/// Error types.
pub use crate::common::{Error, ParseError, ValidationError};
/// Validated configuration and its raw form.
pub use crate::config::{CacheConfig, RawConfig, validate};
/// Whole-trace driver.
pub use crate::sim::{SimReport, Simulator};
