//! Hit/miss statistics.
//!
//! This module tracks the running counters of one cache over one run:
//! 1. **Counters:** hits, misses, and evictions.
//! 2. **Derived rates:** hit rate and miss rate over all accesses.

use std::fmt;

use serde::Serialize;

/// Running counters for a single cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Accesses whose block was already resident.
    pub hits: u64,
    /// Accesses whose block had to be placed.
    pub misses: u64,
    /// Misses that displaced a resident block.
    pub evictions: u64,
}

impl CacheStats {
    /// Total accesses recorded (`hits + misses`).
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of accesses that hit, in `[0, 1]`.
    ///
    /// Returns `0.0` when nothing has been accessed yet. That is a reporting
    /// convention for an empty run, not the limit of the ratio.
    pub fn hit_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    /// Fraction of accesses that missed, in `[0, 1]`; `0.0` for an empty run.
    pub fn miss_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            total => self.misses as f64 / total as f64,
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  accesses:   {}", self.accesses())?;
        writeln!(f, "  hits:       {}", self.hits)?;
        writeln!(f, "  misses:     {}", self.misses)?;
        writeln!(f, "  evictions:  {}", self.evictions)?;
        write!(f, "  hit rate:   {:.2}%", self.hit_rate() * 100.0)
    }
}
