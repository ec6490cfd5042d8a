//! Simulator: drives a cache over a whole trace and reports on it.
//!
//! The cache engine processes one address at a time; the simulator feeds it
//! traces, remembers the outcome of every access since the last reset, and
//! assembles a [`SimReport`].

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::trace;
use crate::cache::{CacheSim, Outcome, SnapshotEntry};
use crate::common::ParseError;
use crate::config::CacheConfig;
use crate::stats::CacheStats;

/// Top-level simulator: one cache plus its access history.
#[derive(Debug)]
pub struct Simulator {
    cache: CacheSim,
    outcomes: Vec<Outcome>,
}

impl Simulator {
    /// Creates a simulator with an empty cache.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            cache: CacheSim::new(config),
            outcomes: Vec::new(),
        }
    }

    /// The configuration in use.
    pub const fn config(&self) -> &CacheConfig {
        self.cache.config()
    }

    /// Read-only view of the cache.
    pub const fn cache(&self) -> &CacheSim {
        &self.cache
    }

    /// Outcomes of every access since the last reset, in order.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Clears the cache and the access history.
    pub fn reset(&mut self) {
        self.cache.reset();
        self.outcomes.clear();
    }

    /// Continues the current run with `trace`, without resetting.
    ///
    /// # Returns
    ///
    /// The outcomes of this batch only.
    pub fn feed(&mut self, trace: &[u64]) -> &[Outcome] {
        let start = self.outcomes.len();
        self.outcomes.reserve(trace.len());
        for &addr in trace {
            let outcome = self.cache.access(addr);
            self.outcomes.push(outcome);
        }
        &self.outcomes[start..]
    }

    /// Runs `trace` from an empty cache and reports on it.
    pub fn run(&mut self, trace: &[u64]) -> SimReport {
        debug!(accesses = trace.len(), config = %self.config(), "run started");
        self.reset();
        let _ = self.feed(trace);
        let report = self.report();
        debug!(hits = report.hits, misses = report.misses, "run finished");
        report
    }

    /// Parses `text` and runs it from an empty cache.
    ///
    /// # Errors
    ///
    /// The [`ParseError`] for the first malformed token. Parsing happens
    /// before anything else, so on error the simulator is left untouched.
    pub fn run_text(&mut self, text: &str) -> Result<SimReport, ParseError> {
        let trace = trace::parse(text)?;
        Ok(self.run(&trace))
    }

    /// Reports on the state reached so far.
    pub fn report(&self) -> SimReport {
        let stats = self.cache.stats();
        SimReport {
            config: *self.config(),
            outcomes: self.outcomes.clone(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            hit_rate: stats.hit_rate(),
            snapshot: self.cache.snapshot(),
        }
    }
}

/// Runs `trace` on a fresh cache built from `config`.
pub fn simulate(config: &CacheConfig, trace: &[u64]) -> SimReport {
    Simulator::new(config).run(trace)
}

/// Result of a run, sufficient to render a textual or graphical report.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimReport {
    /// Configuration simulated.
    pub config: CacheConfig,
    /// Per-access outcomes, in trace order.
    pub outcomes: Vec<Outcome>,
    /// Number of hits.
    pub hits: u64,
    /// Number of misses.
    pub misses: u64,
    /// Number of resident blocks displaced.
    pub evictions: u64,
    /// `hits / (hits + misses)`; `0.0` for an empty trace.
    pub hit_rate: f64,
    /// Final occupied lines, oldest first within each scope.
    pub snapshot: Vec<SnapshotEntry>,
}

impl SimReport {
    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Only if serialization itself fails, which the report's types rule out in practice.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The resident block numbers, in snapshot order.
    pub fn blocks(&self) -> Vec<u64> {
        self.snapshot.iter().map(|e| e.block.val()).collect()
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===== Cache configuration =====")?;
        writeln!(f, "  cache size:          {} lines", self.config.cache_size)?;
        writeln!(f, "  block size:          {} B", self.config.block_size)?;
        writeln!(f, "  associativity:       {}", self.config.associativity)?;
        writeln!(f, "  replacement policy:  {}", self.config.replacement_policy)?;
        writeln!(f, "===== Cache state =====")?;
        if self.snapshot.is_empty() {
            writeln!(f, "  (empty)")?;
        }
        for entry in &self.snapshot {
            writeln!(f, "  {entry}")?;
        }
        writeln!(f, "===== Statistics =====")?;
        let stats = CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
        };
        write!(f, "{stats}")
    }
}
