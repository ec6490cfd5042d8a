//! Preset access patterns.
//!
//! Five small demonstration traces, each exercising a different locality
//! shape. They are handy for comparing organizations side by side.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A named demonstration trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Ten distinct consecutive addresses; no reuse.
    Sequential,
    /// Scattered addresses with a few repeats.
    Random,
    /// A four-address loop run two and a half times.
    Loop,
    /// Each address issued three times in a row.
    Repeated,
    /// One hot address interleaved with a stream of cold ones.
    Mixed,
}

/// The name did not match any preset.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown pattern '{0}' (expected one of: sequential, random, loop, repeated, mixed)")]
pub struct UnknownPattern(pub String);

impl Pattern {
    /// Every preset, in presentation order.
    pub const ALL: [Self; 5] = [
        Self::Sequential,
        Self::Random,
        Self::Loop,
        Self::Repeated,
        Self::Mixed,
    ];

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sequential => "Sequential",
            Self::Random => "Random",
            Self::Loop => "Loop",
            Self::Repeated => "Repeated",
            Self::Mixed => "Mixed",
        }
    }

    /// The trace as addresses.
    pub const fn addresses(self) -> &'static [u64] {
        match self {
            Self::Sequential => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
            Self::Random => &[3, 1, 4, 1, 5, 9, 2, 6, 5, 3],
            Self::Loop => &[0, 1, 2, 3, 0, 1, 2, 3, 0, 1],
            Self::Repeated => &[1, 1, 1, 2, 2, 2, 3, 3, 3, 4],
            Self::Mixed => &[0, 1, 0, 2, 0, 3, 0, 4, 0, 5],
        }
    }

    /// The trace as text, in the same format [`parse`](super::trace::parse) reads.
    pub fn text(self) -> String {
        self.addresses()
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = UnknownPattern;

    /// Case-insensitive lookup by name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPattern(s.to_string()))
    }
}
