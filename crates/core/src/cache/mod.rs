//! Single-Level Cache Simulator.
//!
//! This module implements the cache engine: a deterministic state machine that
//! consumes byte addresses one at a time and reports whether each one hit. It
//! supports direct-mapped, 2-way set-associative and fully-associative
//! placement with LRU or FIFO replacement. Only block identity is modeled;
//! there is no data, no dirty state and no timing.

/// Block-to-line and block-to-scope mapping.
pub mod layout;

/// Cache replacement policy implementations (FIFO, LRU).
pub mod policies;

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace, warn};

use self::layout::SetLayout;
use self::policies::ReplacementPolicy;
use crate::common::BlockNumber;
use crate::config::{Associativity, CacheConfig};
use crate::stats::CacheStats;

/// Result of a single access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    /// The block was resident.
    Hit,
    /// The block had to be placed.
    Miss,
}

impl Outcome {
    /// True for [`Outcome::Hit`].
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hit => "Hit",
            Self::Miss => "Miss",
        })
    }
}

/// One occupied line in a [`CacheSim::snapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SnapshotEntry {
    /// Line index in `[0, cache_size)`.
    pub slot: usize,
    /// Block held by the line.
    pub block: BlockNumber,
}

impl fmt::Display for SnapshotEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {:>3}: Block {}", self.slot, self.block)
    }
}

/// A cache line; `None` when unoccupied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct CacheLine {
    block: Option<BlockNumber>,
}

/// Cache engine for one configuration.
///
/// Owns all simulation state. The only mutators are [`CacheSim::access`] and
/// [`CacheSim::reset`]; everything else is a read-only view.
#[derive(Debug)]
pub struct CacheSim {
    config: CacheConfig,
    layout: SetLayout,
    lines: Vec<CacheLine>,
    policy: Box<dyn ReplacementPolicy>,
    stats: CacheStats,
}

impl CacheSim {
    /// Creates an empty cache for `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration; its sizes are non-zero by construction.
    pub fn new(config: &CacheConfig) -> Self {
        let layout = SetLayout::new(config);
        if layout.unused_lines() > 0 {
            warn!(
                cache_size = layout.lines(),
                sets = layout.sets(),
                unused = layout.unused_lines(),
                "cache size is not a multiple of the set width; trailing lines stay empty"
            );
        }
        debug!(%config, sets = layout.sets(), ways = layout.ways(), "cache created");

        Self {
            config: *config,
            lines: vec![CacheLine::default(); layout.lines()],
            policy: policies::build(config.replacement_policy, layout.scopes()),
            layout,
            stats: CacheStats::default(),
        }
    }

    /// The configuration this cache was built with.
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The block-to-line mapping in use.
    pub const fn layout(&self) -> &SetLayout {
        &self.layout
    }

    /// Running counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Accesses so far that hit.
    pub const fn hits(&self) -> u64 {
        self.stats.hits
    }

    /// Accesses so far that missed.
    pub const fn misses(&self) -> u64 {
        self.stats.misses
    }

    /// `hits / (hits + misses)`, or `0.0` before the first access.
    pub fn hit_rate(&self) -> f64 {
        self.stats.hit_rate()
    }

    /// Clears every line, ordering and counter.
    ///
    /// Idempotent; afterwards the cache is indistinguishable from a new one.
    pub fn reset(&mut self) {
        self.lines.fill(CacheLine::default());
        self.policy.reset();
        self.stats = CacheStats::default();
        debug!("cache reset");
    }

    /// Block held by line `slot`, or `None` if it is empty or out of range.
    pub fn resident(&self, slot: usize) -> Option<BlockNumber> {
        self.lines.get(slot).and_then(|line| line.block)
    }

    /// Checks whether the block containing `addr` is resident, without touching any state.
    pub fn contains(&self, addr: u64) -> bool {
        let block = BlockNumber::of(addr, self.config.block_size);
        self.find(block).is_some()
    }

    /// Number of occupied lines.
    pub fn occupancy(&self) -> usize {
        self.lines.iter().filter(|line| line.block.is_some()).count()
    }

    /// Occupied lines, scope by scope, oldest to newest within each scope.
    ///
    /// For LRU the order within a scope is least to most recently used; for
    /// FIFO it is arrival order.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        (0..self.layout.scopes())
            .flat_map(|scope| self.policy.order(scope).iter().copied())
            .filter_map(|slot| {
                self.resident(slot)
                    .map(|block| SnapshotEntry { slot, block })
            })
            .collect()
    }

    /// Finds the line holding `block` among its candidate lines.
    fn find(&self, block: BlockNumber) -> Option<usize> {
        self.layout
            .candidates(block)
            .find(|&slot| self.lines[slot].block == Some(block))
    }

    /// Processes one reference.
    ///
    /// On a hit the policy is told (LRU refreshes the line). On a miss the
    /// block is placed: direct-mapped overwrites its only line; otherwise the
    /// lowest free candidate line is used, or the oldest line of the block's
    /// scope is evicted.
    ///
    /// # Arguments
    ///
    /// * `addr` - The byte address referenced.
    ///
    /// # Returns
    ///
    /// Whether the block was already resident.
    pub fn access(&mut self, addr: u64) -> Outcome {
        let block = BlockNumber::of(addr, self.config.block_size);
        let scope = self.layout.scope_of(block);

        if let Some(slot) = self.find(block) {
            self.stats.hits += 1;
            self.policy.on_hit(scope, slot);
            trace!(addr, %block, slot, "hit");
            return Outcome::Hit;
        }

        self.stats.misses += 1;
        let slot = self.place(scope, block);
        self.lines[slot].block = Some(block);
        self.policy.on_fill(scope, slot);
        trace!(addr, %block, slot, "miss");
        Outcome::Miss
    }

    /// Chooses the line a missing `block` goes into, evicting if needed.
    fn place(&mut self, scope: usize, block: BlockNumber) -> usize {
        let candidates = self.layout.candidates(block);

        let slot = match self.config.associativity {
            Associativity::Direct => {
                let slot = candidates.start;
                if self.lines[slot].block.is_some() {
                    self.policy.forget(scope, slot);
                }
                slot
            }
            Associativity::SetAssociative | Associativity::FullyAssociative => {
                match candidates
                    .clone()
                    .find(|&slot| self.lines[slot].block.is_none())
                {
                    Some(free) => free,
                    // A full scope has every candidate line in its ordering.
                    None => self.policy.evict(scope).unwrap_or(candidates.start),
                }
            }
        };

        if let Some(victim) = self.lines[slot].block {
            self.stats.evictions += 1;
            trace!(%victim, slot, scope, policy = %self.policy.kind(), "evict");
        }
        slot
    }
}

impl fmt::Display for CacheSim {
    /// Renders the occupied lines, one per row, in snapshot order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        if snapshot.is_empty() {
            return f.write_str("(empty)");
        }
        for (i, entry) in snapshot.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
