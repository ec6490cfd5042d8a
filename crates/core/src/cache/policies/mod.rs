//! Cache Replacement Policies.
//!
//! Both policies keep, for every ordering scope, an explicit list of the
//! occupied slots ordered oldest to newest. Insertions append at the newest
//! end and evictions pop the oldest end; the policies differ only in what a
//! hit does to the list.
//!
//! # Policies
//!
//! - `Lru`: a hit moves the slot to the newest end.
//! - `Fifo`: a hit leaves the order untouched.
//!
//! A scope is the whole cache for direct-mapped and fully-associative caches,
//! and one set for set-associative caches.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

use std::collections::VecDeque;
use std::fmt;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;

use crate::config::ReplacementPolicy as PolicyKind;

/// Trait for cache replacement policies.
///
/// Defines how a scope's ordering reacts to hits, fills and evictions.
pub trait ReplacementPolicy: fmt::Debug + Send + Sync {
    /// Which policy this is.
    fn kind(&self) -> PolicyKind;

    /// Records a hit on `slot`.
    ///
    /// # Arguments
    ///
    /// * `scope` - The ordering scope (set index, or 0).
    /// * `slot` - The line that hit.
    fn on_hit(&mut self, scope: usize, slot: usize);

    /// Records that `slot` was just filled; it becomes the newest entry.
    fn on_fill(&mut self, scope: usize, slot: usize);

    /// Removes and returns the oldest slot of `scope`, if any.
    fn evict(&mut self, scope: usize) -> Option<usize>;

    /// Drops `slot` from the ordering without regard to its position.
    ///
    /// Used when a direct-mapped line is overwritten in place.
    fn forget(&mut self, scope: usize, slot: usize);

    /// The slots of `scope`, oldest first.
    fn order(&self, scope: usize) -> &VecDeque<usize>;

    /// Empties every scope.
    fn reset(&mut self);
}

/// Builds the policy object for `kind` over `scopes` ordering scopes.
pub fn build(kind: PolicyKind, scopes: usize) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyKind::Lru => Box::new(LruPolicy::new(scopes)),
        PolicyKind::Fifo => Box::new(FifoPolicy::new(scopes)),
    }
}

/// Per-scope oldest-to-newest slot lists shared by both policies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeOrder {
    scopes: Vec<VecDeque<usize>>,
}

impl ScopeOrder {
    /// Creates `scopes` empty orderings.
    pub fn new(scopes: usize) -> Self {
        Self {
            scopes: vec![VecDeque::new(); scopes],
        }
    }

    /// Appends `slot` at the newest end of `scope`.
    pub fn push_newest(&mut self, scope: usize, slot: usize) {
        self.scopes[scope].push_back(slot);
    }

    /// Removes the oldest slot of `scope`.
    pub fn pop_oldest(&mut self, scope: usize) -> Option<usize> {
        self.scopes[scope].pop_front()
    }

    /// Removes `slot` from `scope`; returns whether it was present.
    pub fn remove(&mut self, scope: usize, slot: usize) -> bool {
        let list = &mut self.scopes[scope];
        list.iter()
            .position(|&s| s == slot)
            .and_then(|pos| list.remove(pos))
            .is_some()
    }

    /// Moves `slot` to the newest end of `scope`.
    pub fn promote(&mut self, scope: usize, slot: usize) {
        if self.remove(scope, slot) {
            self.push_newest(scope, slot);
        }
    }

    /// The slots of `scope`, oldest first.
    pub fn get(&self, scope: usize) -> &VecDeque<usize> {
        &self.scopes[scope]
    }

    /// Empties every scope, keeping the scope count.
    pub fn clear(&mut self) {
        self.scopes.iter_mut().for_each(VecDeque::clear);
    }
}
