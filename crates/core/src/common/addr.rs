//! Byte address and block number types.
//!
//! Trace entries are plain byte addresses. The cache never stores addresses,
//! only the block that contains them, so the two are kept as distinct types:
//! 1. **Byte addresses:** raw `u64` values as they appear in a trace.
//! 2. **Block numbers:** `address / block_size`, the identity a cache line holds.

use std::fmt;
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

/// A memory block number: the unit a cache line holds.
///
/// Two addresses hit the same line exactly when they share a block number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockNumber(pub u64);

impl BlockNumber {
    /// Returns the block containing byte address `addr`.
    ///
    /// # Arguments
    ///
    /// * `addr` - The byte address.
    /// * `block_size` - Bytes per block; non-zero by construction.
    #[inline(always)]
    pub const fn of(addr: u64, block_size: NonZeroU64) -> Self {
        Self(addr / block_size.get())
    }

    /// Returns the raw block number.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Returns `self mod n`, the index used for line and set selection.
    ///
    /// `n` is a line or set count, so the result always fits in `usize`.
    #[inline(always)]
    pub const fn index_in(self, n: usize) -> usize {
        (self.0 % n as u64) as usize
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BlockNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
