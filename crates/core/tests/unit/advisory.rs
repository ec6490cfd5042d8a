//! # Advisory Tests
//!
//! Reply parsing, request text, and validation of recommendations before use.

use pretty_assertions::assert_eq;
use rstest::rstest;

use cachesim_core::advisory::{
    Advisor, PatternSummary, Recommendation, build_prompt, parse_recommendation, request_config,
};
use cachesim_core::common::{AdvisoryError, ConfigField};
use cachesim_core::config::{Associativity, ReplacementPolicy};
use cachesim_core::{CacheConfig, RawConfig, ValidationError};

/// Advisor driven by a closure, so tests can inspect the request.
struct FnAdvisor<F>(F);

impl<F> Advisor for FnAdvisor<F>
where
    F: Fn(&str, &CacheConfig) -> Result<Recommendation, AdvisoryError>,
{
    fn recommend(
        &self,
        pattern: &str,
        current: &CacheConfig,
    ) -> Result<Recommendation, AdvisoryError> {
        (self.0)(pattern, current)
    }
}

fn advisor<F>(f: F) -> FnAdvisor<F>
where
    F: Fn(&str, &CacheConfig) -> Result<Recommendation, AdvisoryError>,
{
    FnAdvisor(f)
}

/// Advisor that always answers with the same reply text.
fn replying(reply: &'static str) -> impl Advisor {
    advisor(move |_, _| parse_recommendation(reply))
}

const GOOD_REPLY: &str = r#"Here you go:
{"cache_size": 8, "block_size": "32", "associativity": "Fully-Associative",
 "replacement_policy": "LRU",
 "rationale": {"cache_size": "eight distinct blocks", "bogus": "ignored"}}
Hope this helps."#;

// ══════════════════════════════════════════════════════════
// 1. Reply parsing
// ══════════════════════════════════════════════════════════

#[test]
fn test_parse_embedded_object() {
    let rec = parse_recommendation(GOOD_REPLY).unwrap();
    assert_eq!(rec.raw, RawConfig::new("8", "32", "Fully-Associative", "LRU"));
    assert_eq!(rec.rationale.len(), 1);
    assert_eq!(
        rec.rationale.get(&ConfigField::CacheSize).map(String::as_str),
        Some("eight distinct blocks")
    );
}

#[test]
fn test_parse_without_rationale() {
    let rec = parse_recommendation(
        r#"{"cache_size": "4", "block_size": 16, "associativity": "Direct", "replacement_policy": "FIFO"}"#,
    )
    .unwrap();
    assert!(rec.rationale.is_empty());
    assert_eq!(
        rec.to_config().unwrap(),
        CacheConfig::new(4, 16, Associativity::Direct, ReplacementPolicy::Fifo).unwrap()
    );
}

#[rstest]
#[case("I cannot help with that.")]
#[case("")]
#[case("} {")]
fn test_parse_no_object(#[case] reply: &str) {
    assert_eq!(parse_recommendation(reply).unwrap_err(), AdvisoryError::NoJsonObject);
}

#[rstest]
#[case("{cache_size: 8}")]
#[case("{\"cache_size\": 8,}")]
#[case(r#"{"cache_size": [8], "block_size": 1, "associativity": "Direct", "replacement_policy": "LRU"}"#)]
fn test_parse_malformed(#[case] reply: &str) {
    assert!(matches!(
        parse_recommendation(reply),
        Err(AdvisoryError::MalformedJson(_))
    ));
}

#[rstest]
#[case(r#"{"block_size": 1, "associativity": "Direct", "replacement_policy": "LRU"}"#, ConfigField::CacheSize)]
#[case(r#"{"cache_size": 1, "associativity": "Direct", "replacement_policy": "LRU"}"#, ConfigField::BlockSize)]
#[case(r#"{"cache_size": 1, "block_size": 1, "replacement_policy": "LRU"}"#, ConfigField::Associativity)]
#[case(r#"{"cache_size": 1, "block_size": 1, "associativity": "Direct"}"#, ConfigField::ReplacementPolicy)]
fn test_parse_missing_key(#[case] reply: &str, #[case] missing: ConfigField) {
    assert_eq!(
        parse_recommendation(reply).unwrap_err(),
        AdvisoryError::MissingKey(missing)
    );
}

#[test]
fn test_to_config_rejects_invalid_values() {
    let rec = parse_recommendation(
        r#"{"cache_size": 0, "block_size": 16, "associativity": "Direct", "replacement_policy": "LRU"}"#,
    )
    .unwrap();
    assert!(matches!(
        rec.to_config(),
        Err(AdvisoryError::Rejected(ValidationError::NotPositive {
            field: ConfigField::CacheSize,
            ..
        }))
    ));
}

// ══════════════════════════════════════════════════════════
// 2. Request flow
// ══════════════════════════════════════════════════════════

#[test]
fn test_request_config_accepts_valid_advice() {
    let (config, rec) =
        request_config(&replying(GOOD_REPLY), "1 2 3", &CacheConfig::default()).unwrap();
    assert_eq!(config.cache_size.get(), 8);
    assert_eq!(config.associativity, Associativity::FullyAssociative);
    assert_eq!(rec.raw.block_size, "32");
}

#[test]
fn test_request_config_passes_pattern_and_current() {
    let current = CacheConfig::new(2, 4, Associativity::SetAssociative, ReplacementPolicy::Fifo)
        .unwrap();
    let fake = advisor(|pattern, seen| {
        assert_eq!(pattern, "0 1 0");
        Ok(Recommendation {
            raw: RawConfig::from(seen),
            ..Recommendation::default()
        })
    });
    let (config, _) = request_config(&fake, "0 1 0", &current).unwrap();
    assert_eq!(config, current);
}

#[test]
fn test_request_config_unavailable() {
    let fake = advisor(|_, _| Err(AdvisoryError::Unavailable("no API key".into())));
    let err = request_config(&fake, "1", &CacheConfig::default()).unwrap_err();
    assert_eq!(err, AdvisoryError::Unavailable("no API key".into()));
}

#[test]
fn test_request_config_rejects_unknown_policy() {
    let fake = replying(
        r#"{"cache_size": 4, "block_size": 16, "associativity": "Direct", "replacement_policy": "MRU"}"#,
    );
    let err = request_config(&fake, "1", &CacheConfig::default()).unwrap_err();
    assert_eq!(
        err,
        AdvisoryError::Rejected(ValidationError::UnknownPolicy("MRU".into()))
    );
}

// ══════════════════════════════════════════════════════════
// 3. Prompt
// ══════════════════════════════════════════════════════════

#[test]
fn test_summary() {
    assert_eq!(
        PatternSummary::from_text("0 1 0 2 0"),
        PatternSummary { total: 5, unique: 3 }
    );
}

#[test]
fn test_prompt_contents() {
    let prompt = build_prompt("0 1 0 2 0", &CacheConfig::default());
    for needle in [
        "Access pattern: 0 1 0 2 0",
        "total addresses: 5",
        "unique addresses: 3",
        "- cache_size: 4",
        "- block_size: 16",
        "Direct, Set-Associative, Fully-Associative",
        "LRU, FIFO",
        "cache_size, block_size, associativity, replacement_policy",
        "rationale",
    ] {
        assert!(prompt.contains(needle), "missing {needle:?} in:\n{prompt}");
    }
}
