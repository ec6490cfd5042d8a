//! Mapping of blocks to lines and ordering scopes.
//!
//! | Organization      | Scopes                  | Lines a block may use          |
//! |-------------------|-------------------------|--------------------------------|
//! | Direct            | 1 (whole cache)         | `block % cache_size` only      |
//! | Set-Associative   | `cache_size / 2` sets   | the 2 lines of `block % sets`  |
//! | Fully-Associative | 1 (whole cache)         | all                            |
//!
//! Set `s` owns lines `[2s, 2s + 2)`. When `cache_size` is odd the last line
//! belongs to no set and is never used. A 1-line set-associative cache is
//! treated as a single one-way set.

use std::ops::Range;

use crate::common::BlockNumber;
use crate::config::{Associativity, CacheConfig, SET_ASSOCIATIVE_WAYS};

/// Geometry of one cache: how many scopes, and which lines each block may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetLayout {
    associativity: Associativity,
    lines: usize,
    sets: usize,
    ways: usize,
}

impl SetLayout {
    /// Derives the layout of `config`.
    pub fn new(config: &CacheConfig) -> Self {
        let lines = config.cache_size.get();
        let (sets, ways) = match config.associativity {
            Associativity::Direct => (1, 1),
            Associativity::FullyAssociative => (1, lines),
            Associativity::SetAssociative if lines < SET_ASSOCIATIVE_WAYS => (1, lines),
            Associativity::SetAssociative => {
                (lines / SET_ASSOCIATIVE_WAYS, SET_ASSOCIATIVE_WAYS)
            }
        };
        Self {
            associativity: config.associativity,
            lines,
            sets,
            ways,
        }
    }

    /// Total number of lines.
    pub const fn lines(&self) -> usize {
        self.lines
    }

    /// Number of sets (1 unless set-associative).
    pub const fn sets(&self) -> usize {
        self.sets
    }

    /// Lines a single block may choose from.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Number of independent replacement orderings.
    pub const fn scopes(&self) -> usize {
        self.sets
    }

    /// Lines that belong to no set and are never filled.
    pub const fn unused_lines(&self) -> usize {
        match self.associativity {
            Associativity::SetAssociative => self.lines - self.sets * self.ways,
            Associativity::Direct | Associativity::FullyAssociative => 0,
        }
    }

    /// The ordering scope `block` belongs to.
    pub const fn scope_of(&self, block: BlockNumber) -> usize {
        match self.associativity {
            Associativity::SetAssociative => block.index_in(self.sets),
            Associativity::Direct | Associativity::FullyAssociative => 0,
        }
    }

    /// The lines `block` may occupy.
    pub const fn candidates(&self, block: BlockNumber) -> Range<usize> {
        match self.associativity {
            Associativity::Direct => {
                let line = block.index_in(self.lines);
                line..line + 1
            }
            Associativity::SetAssociative => {
                let base = block.index_in(self.sets) * self.ways;
                base..base + self.ways
            }
            Associativity::FullyAssociative => 0..self.lines,
        }
    }
}
