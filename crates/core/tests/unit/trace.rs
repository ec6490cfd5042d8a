//! # Trace Tests
//!
//! Parsing of whitespace-separated address text and loading from files.

use std::io::Write;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::NamedTempFile;

use cachesim_core::common::{ParseErrorKind, TraceError};
use cachesim_core::sim::{load_trace_file, parse};

fn temp_trace(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_parse_simple() {
    assert_eq!(parse("0 4 8 0").unwrap(), vec![0, 4, 8, 0]);
}

#[test]
fn test_parse_any_whitespace() {
    assert_eq!(parse("  1\t2\n\n3\r\n 4  ").unwrap(), vec![1, 2, 3, 4]);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\t\n")]
fn test_parse_blank_is_empty_trace(#[case] text: &str) {
    assert!(parse(text).unwrap().is_empty());
}

#[test]
fn test_parse_full_u64_range() {
    assert_eq!(parse("18446744073709551615").unwrap(), vec![u64::MAX]);
}

#[test]
fn test_parse_negative_zero_is_zero() {
    assert_eq!(parse("-0 -000 1").unwrap(), vec![0, 0, 1]);
}

#[rstest]
#[case("1 2 abc 4", "abc", 2, ParseErrorKind::NotAnInteger)]
#[case("-1", "-1", 0, ParseErrorKind::Negative)]
#[case("5 -12", "-12", 1, ParseErrorKind::Negative)]
#[case("1 2.5", "2.5", 1, ParseErrorKind::NotAnInteger)]
#[case("0x10", "0x10", 0, ParseErrorKind::NotAnInteger)]
#[case("1 18446744073709551616", "18446744073709551616", 1, ParseErrorKind::OutOfRange)]
#[case("1,2", "1,2", 0, ParseErrorKind::NotAnInteger)]
fn test_parse_rejects(
    #[case] text: &str,
    #[case] token: &str,
    #[case] position: usize,
    #[case] kind: ParseErrorKind,
) {
    let err = parse(text).unwrap_err();
    assert_eq!(err.token, token);
    assert_eq!(err.position, position);
    assert_eq!(err.kind, kind);
}

/// The first bad token is reported even when later ones are also bad.
#[test]
fn test_parse_reports_first_bad_token() {
    let err = parse("1 x -2 y").unwrap_err();
    assert_eq!((err.token.as_str(), err.position), ("x", 1));
}

#[test]
fn test_parse_error_message() {
    let err = parse("7 -3").unwrap_err();
    assert_eq!(err.to_string(), "trace token 1 ('-3'): negative address");
}

#[test]
fn test_load_trace_file() {
    let file = temp_trace("1 2\n3\n");
    assert_eq!(load_trace_file(file.path()).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_load_trace_file_bad_token() {
    let file = temp_trace("1 two 3");
    let err = load_trace_file(file.path()).unwrap_err();
    match err {
        TraceError::Parse(e) => assert_eq!(e.position, 1),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_load_trace_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_trace_file(dir.path().join("none.txt")).unwrap_err();
    assert!(matches!(err, TraceError::Io { .. }));
}
