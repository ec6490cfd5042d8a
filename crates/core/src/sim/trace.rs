//! Trace parsing and loading.
//!
//! A trace is free-form text holding whitespace-separated non-negative
//! integers, one per memory reference, in the order they are issued. This
//! module provides:
//! 1. **Parsing:** [`parse`] turns trace text into addresses, rejecting the first bad token.
//! 2. **Loading:** [`load_trace_file`] reads a trace from disk and parses it.
//!
//! Tokens are never skipped: a trace either parses completely or not at all,
//! so no simulation ever starts on a partial trace.

use std::fs;
use std::num::IntErrorKind;
use std::path::Path;

use tracing::debug;

use crate::common::{ParseError, ParseErrorKind, TraceError};
use crate::config::is_negative_integer;

/// Parses trace text into byte addresses.
///
/// Blank input yields an empty trace, which is a valid zero-access run.
///
/// # Arguments
///
/// * `text` - Whitespace-separated decimal integers.
///
/// # Errors
///
/// A [`ParseError`] naming the first token that is not a non-negative 64-bit
/// integer and its zero-based position.
pub fn parse(text: &str) -> Result<Vec<u64>, ParseError> {
    text.split_whitespace()
        .enumerate()
        .map(|(position, token)| parse_token(position, token))
        .collect()
}

/// Parses one token.
fn parse_token(position: usize, token: &str) -> Result<u64, ParseError> {
    // "-0" is zero, not a negative address.
    if is_negative_integer(token) && token[1..].bytes().all(|b| b == b'0') {
        return Ok(0);
    }
    token.parse::<u64>().map_err(|e| {
        let kind = if is_negative_integer(token) {
            ParseErrorKind::Negative
        } else if *e.kind() == IntErrorKind::PosOverflow {
            ParseErrorKind::OutOfRange
        } else {
            ParseErrorKind::NotAnInteger
        };
        ParseError {
            token: token.to_string(),
            position,
            kind,
        }
    })
}

/// Reads and parses a trace file.
///
/// # Arguments
///
/// * `path` - Path to a text file in trace format.
///
/// # Errors
///
/// [`TraceError::Io`] if the file cannot be read, [`TraceError::Parse`] if a
/// token is malformed.
pub fn load_trace_file(path: impl AsRef<Path>) -> Result<Vec<u64>, TraceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let trace = parse(&text)?;
    debug!(path = %path.display(), accesses = trace.len(), "trace loaded");
    Ok(trace)
}
