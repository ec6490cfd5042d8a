//! # Simulator Tests
//!
//! Whole-trace runs, incremental feeding, reports, and the preset patterns.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use cachesim_core::Outcome::{Hit, Miss};
use cachesim_core::config::{Associativity, ReplacementPolicy};
use cachesim_core::sim::{Pattern, simulate};
use cachesim_core::{CacheConfig, Simulator};

use crate::common::{Direct, Fifo, FullyAssociative, Lru, config, outcomes};

fn fa_lru_two() -> CacheConfig {
    config(2, 1, FullyAssociative, Lru)
}

// ══════════════════════════════════════════════════════════
// 1. Runs and reports
// ══════════════════════════════════════════════════════════

#[test]
fn test_run_report() {
    let report = Simulator::new(&fa_lru_two()).run(&[1, 2, 1, 3]);
    assert_eq!(report.outcomes, vec![Miss, Miss, Hit, Miss]);
    assert_eq!((report.hits, report.misses, report.evictions), (1, 3, 1));
    assert!((report.hit_rate - 0.25).abs() < f64::EPSILON);
    assert_eq!(report.blocks(), vec![1, 3]);
    assert_eq!(report.config, fa_lru_two());
}

#[test]
fn test_empty_trace_report() {
    let report = simulate(&CacheConfig::default(), &[]);
    assert_eq!((report.hits, report.misses), (0, 0));
    assert_eq!(report.hit_rate, 0.0);
    assert!(report.outcomes.is_empty());
    assert!(report.snapshot.is_empty());
}

/// `run` always starts from an empty cache.
#[test]
fn test_run_resets_first() {
    let mut sim = Simulator::new(&fa_lru_two());
    let first = sim.run(&[1, 2, 1, 3]);
    let second = sim.run(&[1, 2, 1, 3]);
    assert_eq!(first, second);
}

/// `feed` continues where the last batch left off.
#[test]
fn test_feed_accumulates() {
    let mut sim = Simulator::new(&fa_lru_two());
    assert_eq!(sim.feed(&[1, 2]), &[Miss, Miss]);
    assert_eq!(sim.feed(&[1]), &[Hit]);
    assert_eq!(sim.outcomes(), &[Miss, Miss, Hit]);
    assert_eq!(sim.report().hits, 1);

    sim.reset();
    assert!(sim.outcomes().is_empty());
    assert_eq!(sim.cache().occupancy(), 0);
}

#[test]
fn test_run_text() {
    let report = Simulator::new(&fa_lru_two()).run_text(" 1 2\n1 3 ").unwrap();
    assert_eq!(report.outcomes, outcomes("MMHM"));
}

/// A malformed trace is rejected before any access is simulated.
#[test]
fn test_run_text_error_leaves_state_untouched() {
    let mut sim = Simulator::new(&fa_lru_two());
    let _ = sim.feed(&[1, 2]);
    let before = sim.report();

    let err = sim.run_text("1 2 nope").unwrap_err();
    assert_eq!(err.position, 2);
    assert_eq!(sim.report(), before);
}

#[test]
fn test_report_json() {
    let report = simulate(&fa_lru_two(), &[1, 2, 1, 3]);
    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(value["config"]["associativity"], json!("Fully-Associative"));
    assert_eq!(value["config"]["replacement_policy"], json!("LRU"));
    assert_eq!(value["outcomes"], json!(["Miss", "Miss", "Hit", "Miss"]));
    assert_eq!(value["hits"], json!(1));
    assert_eq!(value["misses"], json!(3));
    assert_eq!(
        value["snapshot"],
        json!([{"slot": 0, "block": 1}, {"slot": 1, "block": 3}])
    );
}

#[test]
fn test_report_display() {
    let report = simulate(&fa_lru_two(), &[1, 2, 1, 3]);
    let text = report.to_string();
    assert!(text.contains("Fully-Associative"), "{text}");
    assert!(text.contains("Block 3"), "{text}");
    assert!(text.contains("hit rate:   25.00%"), "{text}");

    let empty = simulate(&fa_lru_two(), &[]).to_string();
    assert!(empty.contains("(empty)"), "{empty}");
}

// ══════════════════════════════════════════════════════════
// 2. Preset patterns
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("sequential", Pattern::Sequential)]
#[case("Random", Pattern::Random)]
#[case("LOOP", Pattern::Loop)]
#[case(" repeated ", Pattern::Repeated)]
#[case("mixed", Pattern::Mixed)]
fn test_pattern_lookup(#[case] name: &str, #[case] expected: Pattern) {
    assert_eq!(name.parse::<Pattern>().unwrap(), expected);
}

#[test]
fn test_unknown_pattern() {
    let err = "strided".parse::<Pattern>().unwrap_err();
    assert_eq!(err.0, "strided");
}

#[test]
fn test_pattern_text_parses_back() {
    for pattern in Pattern::ALL {
        let addresses = cachesim_core::sim::parse(&pattern.text()).unwrap();
        assert_eq!(addresses, pattern.addresses(), "{pattern}");
        assert_eq!(addresses.len(), 10);
    }
}

/// With 16-byte blocks, addresses 0..9 all fall in block 0.
#[test]
fn test_sequential_on_default_config() {
    let report = simulate(&CacheConfig::default(), Pattern::Sequential.addresses());
    assert_eq!((report.hits, report.misses), (9, 1));
}

#[rstest]
#[case(Pattern::Loop, FullyAssociative, Lru, 6)]
#[case(Pattern::Repeated, Direct, Lru, 6)]
#[case(Pattern::Mixed, FullyAssociative, Lru, 4)]
#[case(Pattern::Mixed, FullyAssociative, Fifo, 2)]
fn test_pattern_hits(
    #[case] pattern: Pattern,
    #[case] associativity: Associativity,
    #[case] policy: ReplacementPolicy,
    #[case] hits: u64,
) {
    let lines = if pattern == Pattern::Mixed { 2 } else { 4 };
    let report = simulate(&config(lines, 1, associativity, policy), pattern.addresses());
    assert_eq!(report.hits, hits);
    assert_eq!(report.hits + report.misses, 10);
}
