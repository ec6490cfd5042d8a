//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the line that has gone longest without being touched.
//! Each scope keeps its occupied slots ordered from least to most recently
//! used; a hit moves the slot to the most-recent end, so the front is always
//! the victim.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_hit()`: O(W) where W is the number of slots in the scope
//!   - `evict()`: O(1)
//! - **Best Case:** Working sets that fit, with strong temporal locality
//! - **Worst Case:** Cyclic scans one block larger than the scope (every access misses)

use std::collections::VecDeque;

use super::{ReplacementPolicy, ScopeOrder};
use crate::config::ReplacementPolicy as PolicyKind;

/// LRU Policy state.
#[derive(Clone, Debug, Default)]
pub struct LruPolicy {
    /// Front is LRU, back is MRU.
    order: ScopeOrder,
}

impl LruPolicy {
    /// Creates an LRU policy with `scopes` empty orderings.
    pub fn new(scopes: usize) -> Self {
        Self {
            order: ScopeOrder::new(scopes),
        }
    }
}

impl ReplacementPolicy for LruPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Lru
    }

    /// Moves the slot to the MRU end of its scope.
    fn on_hit(&mut self, scope: usize, slot: usize) {
        self.order.promote(scope, slot);
    }

    fn on_fill(&mut self, scope: usize, slot: usize) {
        self.order.push_newest(scope, slot);
    }

    /// Pops the LRU slot.
    fn evict(&mut self, scope: usize) -> Option<usize> {
        self.order.pop_oldest(scope)
    }

    fn forget(&mut self, scope: usize, slot: usize) {
        let _ = self.order.remove(scope, slot);
    }

    fn order(&self, scope: usize) -> &VecDeque<usize> {
        self.order.get(scope)
    }

    fn reset(&mut self) {
        self.order.clear();
    }
}
