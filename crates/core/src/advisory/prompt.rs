//! Advisor request text.

use std::collections::HashSet;

use crate::config::{Associativity, CacheConfig, ReplacementPolicy};

use super::REQUIRED_KEYS;

/// Token counts of a raw access pattern.
///
/// Computed over whitespace-separated tokens as written, without parsing, so
/// it can describe a pattern that would not parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternSummary {
    /// Number of tokens.
    pub total: usize,
    /// Number of distinct tokens.
    pub unique: usize,
}

impl PatternSummary {
    /// Summarizes `pattern`.
    pub fn from_text(pattern: &str) -> Self {
        let tokens: Vec<&str> = pattern.split_whitespace().collect();
        let unique = tokens.iter().collect::<HashSet<_>>().len();
        Self {
            total: tokens.len(),
            unique,
        }
    }
}

/// Builds the request sent to an advisor.
///
/// The text states the pattern, its summary and the current configuration,
/// lists the accepted values for every field, and asks for a JSON object with
/// exactly the [`REQUIRED_KEYS`].
pub fn build_prompt(pattern: &str, current: &CacheConfig) -> String {
    let summary = PatternSummary::from_text(pattern);
    let associativities: Vec<&str> = Associativity::ALL.iter().map(|a| a.as_str()).collect();
    let policies: Vec<&str> = ReplacementPolicy::ALL.iter().map(|p| p.as_str()).collect();

    format!(
        "Recommend a cache configuration that maximizes the hit rate for this memory access pattern.\n\
         \n\
         Access pattern: {pattern}\n\
         - total addresses: {total}\n\
         - unique addresses: {unique}\n\
         \n\
         Current configuration:\n\
         - cache_size: {cache_size}\n\
         - block_size: {block_size}\n\
         - associativity: {associativity}\n\
         - replacement_policy: {policy}\n\
         \n\
         Allowed values:\n\
         - cache_size: positive integer (number of lines)\n\
         - block_size: positive integer (bytes)\n\
         - associativity: {associativities}\n\
         - replacement_policy: {policies}\n\
         \n\
         Reply with a JSON object with exactly these keys: {keys}. \
         Optionally add a \"rationale\" object with one short explanation per key.",
        pattern = pattern.trim(),
        total = summary.total,
        unique = summary.unique,
        cache_size = current.cache_size,
        block_size = current.block_size,
        associativity = current.associativity,
        policy = current.replacement_policy,
        associativities = associativities.join(", "),
        policies = policies.join(", "),
        keys = REQUIRED_KEYS.map(|f| f.key()).join(", "),
    )
}
