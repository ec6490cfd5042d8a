//! Error types for configuration, traces, and the advisory boundary.
//!
//! Every failure the simulator can report is detected before a run mutates any
//! cache state. The taxonomy is:
//! 1. **Validation:** a configuration field is missing, non-numeric, non-positive, or unknown.
//! 2. **Parse:** a trace token is not a non-negative integer.
//! 3. **Trace loading:** a trace file could not be read.
//! 4. **Advisory:** an external recommendation was unavailable or unusable. Never blocks a run.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Names one of the four configuration fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    /// Number of cache lines.
    CacheSize,
    /// Bytes per block.
    BlockSize,
    /// Placement organization.
    Associativity,
    /// Eviction policy.
    ReplacementPolicy,
}

impl ConfigField {
    /// All fields, in the order they are validated.
    pub const ALL: [Self; 4] = [
        Self::CacheSize,
        Self::BlockSize,
        Self::Associativity,
        Self::ReplacementPolicy,
    ];

    /// The key used for this field in JSON documents and advisor replies.
    pub const fn key(self) -> &'static str {
        match self {
            Self::CacheSize => "cache_size",
            Self::BlockSize => "block_size",
            Self::Associativity => "associativity",
            Self::ReplacementPolicy => "replacement_policy",
        }
    }

    /// Looks a field up by its [`key`](Self::key).
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A configuration field was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The value is not an integer at all.
    #[error("{field}: '{value}' is not an integer")]
    NotNumeric {
        /// Offending field.
        field: ConfigField,
        /// Value as supplied.
        value: String,
    },

    /// The value is an integer but zero or negative.
    #[error("{field}: {value} must be strictly positive")]
    NotPositive {
        /// Offending field.
        field: ConfigField,
        /// Value as supplied.
        value: String,
    },

    /// The value is a positive integer too large to represent.
    #[error("{field}: {value} is too large")]
    OutOfRange {
        /// Offending field.
        field: ConfigField,
        /// Value as supplied.
        value: String,
    },

    /// The associativity token is not one of the canonical spellings.
    #[error(
        "associativity: unknown value '{0}' (expected Direct, Set-Associative or Fully-Associative)"
    )]
    UnknownAssociativity(String),

    /// The replacement policy token is not one of the canonical spellings.
    #[error("replacement_policy: unknown value '{0}' (expected LRU or FIFO)")]
    UnknownPolicy(String),
}

impl ValidationError {
    /// Returns the field that failed validation.
    pub const fn field(&self) -> ConfigField {
        match self {
            Self::NotNumeric { field, .. }
            | Self::NotPositive { field, .. }
            | Self::OutOfRange { field, .. } => *field,
            Self::UnknownAssociativity(_) => ConfigField::Associativity,
            Self::UnknownPolicy(_) => ConfigField::ReplacementPolicy,
        }
    }
}

/// Why a trace token was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Not an integer.
    NotAnInteger,
    /// An integer below zero.
    Negative,
    /// A non-negative integer wider than 64 bits.
    OutOfRange,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotAnInteger => "not an integer",
            Self::Negative => "negative address",
            Self::OutOfRange => "address exceeds 64 bits",
        })
    }
}

/// A trace token could not be read as a byte address.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("trace token {position} ('{token}'): {kind}")]
pub struct ParseError {
    /// The offending token, verbatim.
    pub token: String,
    /// Zero-based index of the token in the trace.
    pub position: usize,
    /// Reason for rejection.
    pub kind: ParseErrorKind,
}

/// A trace file could not be turned into an address sequence.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The file could not be read.
    #[error("could not read trace file '{}': {source}", path.display())]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The file was read but holds a malformed token.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A configuration file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("could not read config file '{}': {source}", path.display())]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON object with the expected keys.
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),

    /// The document decoded but a field failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// The advisory collaborator could not supply a usable configuration.
///
/// Purely informational: the simulator runs with or without advice.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AdvisoryError {
    /// The advisor could not be reached or is not set up (e.g. no credentials).
    #[error("advisor unavailable: {0}")]
    Unavailable(String),

    /// The reply holds no `{ ... }` object.
    #[error("advisor reply contains no JSON object")]
    NoJsonObject,

    /// The reply's object is not valid JSON, or a value has the wrong shape.
    #[error("advisor reply is not valid JSON: {0}")]
    MalformedJson(String),

    /// A required configuration key is absent.
    #[error("advisor reply is missing the '{0}' key")]
    MissingKey(ConfigField),

    /// The recommended configuration fails validation.
    #[error("recommended configuration rejected: {0}")]
    Rejected(#[from] ValidationError),
}

/// Any error surfaced by the simulator library.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad configuration field.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Bad trace token.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Trace file problem.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Config file problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Advisory problem.
    #[error(transparent)]
    Advisory(#[from] AdvisoryError),
}
