//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the line that was filled earliest in its scope,
//! regardless of how recently it was accessed. Hits never reorder anything,
//! so the ordering is pure arrival order.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `on_hit()`: O(1)
//!   - `evict()`: O(1)
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** A hot block that keeps getting evicted because it arrived first

use std::collections::VecDeque;

use super::{ReplacementPolicy, ScopeOrder};
use crate::config::ReplacementPolicy as PolicyKind;

/// FIFO Policy state.
#[derive(Clone, Debug, Default)]
pub struct FifoPolicy {
    /// Front is the earliest fill.
    order: ScopeOrder,
}

impl FifoPolicy {
    /// Creates a FIFO policy with `scopes` empty orderings.
    pub fn new(scopes: usize) -> Self {
        Self {
            order: ScopeOrder::new(scopes),
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Fifo
    }

    /// Hits do not change arrival order.
    fn on_hit(&mut self, _scope: usize, _slot: usize) {}

    fn on_fill(&mut self, scope: usize, slot: usize) {
        self.order.push_newest(scope, slot);
    }

    /// Pops the earliest-filled slot.
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
