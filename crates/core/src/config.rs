//! Cache configuration and validation.
//!
//! This module defines the four tunables of a simulation run and the boundary
//! that turns untrusted input into them. It provides:
//! 1. **Defaults:** Baseline values matching the interactive front end (4 lines, 16-byte blocks, direct-mapped, LRU).
//! 2. **Enums:** Closed sets of associativity and replacement policy, with canonical spellings.
//! 3. **Raw input:** [`RawConfig`], a stringly view of the fields as a form, file, or advisor supplies them.
//! 4. **Validation:** [`validate`], which produces a [`CacheConfig`] or a field-specific [`ValidationError`].
//!
//! A [`CacheConfig`] cannot hold a zero cache size or block size, so an engine
//! built from one never divides by zero.

use std::fmt;
use std::fs;
use std::num::{IntErrorKind, NonZeroU64, NonZeroUsize};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::common::{ConfigError, ConfigField, ValidationError};

/// Default configuration constants.
mod defaults {
    /// Default number of cache lines.
    pub const CACHE_SIZE: usize = 4;

    /// Default block size in bytes.
    pub const BLOCK_SIZE: u64 = 16;

    /// Lines per set in set-associative mode.
    pub const SET_WAYS: usize = 2;

    /// Upper bound on the number of simulated lines (1 Mi).
    ///
    /// Each line is allocated up front, so this caps memory use.
    pub const MAX_CACHE_LINES: usize = 1 << 20;
}

/// Number of ways per set in set-associative mode.
pub const SET_ASSOCIATIVE_WAYS: usize = defaults::SET_WAYS;

/// Largest accepted `cache_size`.
pub const MAX_CACHE_LINES: usize = defaults::MAX_CACHE_LINES;

/// Cache placement organization.
///
/// Determines which lines a block may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Associativity {
    /// Each block maps to exactly one line (`block % cache_size`).
    #[default]
    #[serde(rename = "Direct")]
    Direct,
    /// Lines are grouped in sets of [`SET_ASSOCIATIVE_WAYS`]; a block may use any line of its set.
    #[serde(rename = "Set-Associative")]
    SetAssociative,
    /// A block may use any line.
    #[serde(rename = "Fully-Associative")]
    FullyAssociative,
}

impl Associativity {
    /// Every associativity, in presentation order.
    pub const ALL: [Self; 3] = [Self::Direct, Self::SetAssociative, Self::FullyAssociative];

    /// Canonical spelling accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "Direct",
            Self::SetAssociative => "Set-Associative",
            Self::FullyAssociative => "Fully-Associative",
        }
    }
}

impl fmt::Display for Associativity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Associativity {
    type Err = ValidationError;

    /// Case-sensitive match against the canonical spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownAssociativity(s.to_string()))
    }
}

/// Cache replacement policy.
///
/// Selects the line evicted when a block must be placed into a full scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReplacementPolicy {
    /// Least Recently Used: hits refresh a line's position.
    #[default]
    #[serde(rename = "LRU")]
    Lru,
    /// First In First Out: evicts the earliest-inserted line; hits are ignored.
    #[serde(rename = "FIFO")]
    Fifo,
}

impl ReplacementPolicy {
    /// Every policy, in presentation order.
    pub const ALL: [Self; 2] = [Self::Lru, Self::Fifo];

    /// Canonical spelling accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lru => "LRU",
            Self::Fifo => "FIFO",
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplacementPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownPolicy(s.to_string()))
    }
}

/// A validated cache configuration.
///
/// Immutable for the duration of a run; build one with [`validate`],
/// [`CacheConfig::new`], or [`CacheConfig::from_json_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct CacheConfig {
    /// Number of cache lines.
    pub cache_size: NonZeroUsize,
    /// Bytes per block.
    pub block_size: NonZeroU64,
    /// Placement organization.
    pub associativity: Associativity,
    /// Eviction policy.
    pub replacement_policy: ReplacementPolicy,
}

impl CacheConfig {
    /// Builds a configuration from numeric sizes, checking them like [`validate`] does.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NotPositive`] for a zero size,
    /// [`ValidationError::OutOfRange`] for a `cache_size` above [`MAX_CACHE_LINES`].
    pub fn new(
        cache_size: usize,
        block_size: u64,
        associativity: Associativity,
        replacement_policy: ReplacementPolicy,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            cache_size: checked_cache_size(cache_size, &cache_size.to_string())?,
            block_size: NonZeroU64::new(block_size).ok_or_else(|| {
                ValidationError::NotPositive {
                    field: ConfigField::BlockSize,
                    value: block_size.to_string(),
                }
            })?,
            associativity,
            replacement_policy,
        })
    }

    /// Decodes and validates a JSON configuration document.
    ///
    /// Sizes may be JSON numbers or strings; absent keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] for a malformed document,
    /// [`ConfigError::Invalid`] when a field fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(RawConfig::from_json_str(json)?.validate()?)
    }

    /// Reads and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`CacheConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(RawConfig::from_json_file(path)?.validate()?)
    }
}

impl Default for CacheConfig {
    /// 4 lines of 16 bytes, direct-mapped, LRU.
    fn default() -> Self {
        Self {
            cache_size: NonZeroUsize::MIN.saturating_add(defaults::CACHE_SIZE - 1),
            block_size: NonZeroU64::MIN.saturating_add(defaults::BLOCK_SIZE - 1),
            associativity: Associativity::default(),
            replacement_policy: ReplacementPolicy::default(),
        }
    }
}

impl fmt::Display for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines x {} B, {}, {}",
            self.cache_size, self.block_size, self.associativity, self.replacement_policy
        )
    }
}

impl TryFrom<RawConfig> for CacheConfig {
    type Error = ValidationError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        raw.validate()
    }
}

/// Unvalidated configuration, one string per field.
///
/// This is what a form, command line, config file, or advisor reply supplies.
/// When deserialized, numeric fields accept JSON numbers as well as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawConfig {
    /// Number of cache lines, as text.
    #[serde(default = "RawConfig::default_cache_size", deserialize_with = "scalar_as_string")]
    pub cache_size: String,

    /// Bytes per block, as text.
    #[serde(default = "RawConfig::default_block_size", deserialize_with = "scalar_as_string")]
    pub block_size: String,

    /// Associativity token.
    #[serde(default = "RawConfig::default_associativity", deserialize_with = "scalar_as_string")]
    pub associativity: String,

    /// Replacement policy token.
    #[serde(default = "RawConfig::default_policy", deserialize_with = "scalar_as_string")]
    pub replacement_policy: String,
}

impl RawConfig {
    /// Builds a raw configuration from four field strings.
    pub fn new(
        cache_size: impl Into<String>,
        block_size: impl Into<String>,
        associativity: impl Into<String>,
        replacement_policy: impl Into<String>,
    ) -> Self {
        Self {
            cache_size: cache_size.into(),
            block_size: block_size.into(),
            associativity: associativity.into(),
            replacement_policy: replacement_policy.into(),
        }
    }

    /// Decodes a JSON configuration document without validating it.
    ///
    /// Absent keys take their defaults, so the result can be patched field by
    /// field before [`validate`](Self::validate) runs once.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] if the document is not an object of scalars.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file without validating it.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`RawConfig::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config file read");
        Self::from_json_str(&json)
    }

    /// Returns the default cache size as text.
    fn default_cache_size() -> String {
        defaults::CACHE_SIZE.to_string()
    }

    /// Returns the default block size as text.
    fn default_block_size() -> String {
        defaults::BLOCK_SIZE.to_string()
    }

    /// Returns the default associativity token.
    fn default_associativity() -> String {
        Associativity::default().as_str().to_string()
    }

    /// Returns the default policy token.
    fn default_policy() -> String {
        ReplacementPolicy::default().as_str().to_string()
    }

    /// Returns the raw text of `field`.
    pub fn get(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::CacheSize => &self.cache_size,
            ConfigField::BlockSize => &self.block_size,
            ConfigField::Associativity => &self.associativity,
            ConfigField::ReplacementPolicy => &self.replacement_policy,
        }
    }

    /// Validates every field, stopping at the first failure.
    ///
    /// Fields are checked in [`ConfigField::ALL`] order. Numeric fields may be
    /// padded with whitespace; enum tokens must match exactly.
    ///
    /// # Errors
    ///
    /// The [`ValidationError`] for the first rejected field.
    pub fn validate(&self) -> Result<CacheConfig, ValidationError> {
        let cache_size = parse_positive(ConfigField::CacheSize, &self.cache_size)?;
        let cache_size = usize::try_from(cache_size.get())
            .map_err(|_| ValidationError::OutOfRange {
                field: ConfigField::CacheSize,
                value: self.cache_size.clone(),
            })
            .and_then(|lines| checked_cache_size(lines, &self.cache_size))?;
        let block_size = parse_positive(ConfigField::BlockSize, &self.block_size)?;
        let associativity = self.associativity.parse()?;
        let replacement_policy = self.replacement_policy.parse()?;

        Ok(CacheConfig {
            cache_size,
            block_size,
            associativity,
            replacement_policy,
        })
    }
}

impl Default for RawConfig {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for RawConfig {
    fn from(config: &CacheConfig) -> Self {
        Self::new(
            config.cache_size.to_string(),
            config.block_size.to_string(),
            config.associativity.as_str(),
            config.replacement_policy.as_str(),
        )
    }
}

/// Validates raw configuration input.
///
/// # Errors
///
/// See [`RawConfig::validate`].
pub fn validate(raw: &RawConfig) -> Result<CacheConfig, ValidationError> {
    raw.validate()
}

/// Parses a strictly positive integer field.
fn parse_positive(field: ConfigField, value: &str) -> Result<NonZeroU64, ValidationError> {
    let trimmed = value.trim();
    match trimmed.parse::<u64>() {
        Ok(n) => NonZeroU64::new(n).ok_or_else(|| ValidationError::NotPositive {
            field,
            value: value.to_string(),
        }),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(ValidationError::OutOfRange {
            field,
            value: value.to_string(),
        }),
        Err(_) if is_negative_integer(trimmed) => Err(ValidationError::NotPositive {
            field,
            value: value.to_string(),
        }),
        Err(_) => Err(ValidationError::NotNumeric {
            field,
            value: value.to_string(),
        }),
    }
}

/// Applies the line-count ceiling to a positive cache size.
fn checked_cache_size(lines: usize, value: &str) -> Result<NonZeroUsize, ValidationError> {
    if lines > defaults::MAX_CACHE_LINES {
        return Err(ValidationError::OutOfRange {
            field: ConfigField::CacheSize,
            value: value.to_string(),
        });
    }
    NonZeroUsize::new(lines).ok_or_else(|| ValidationError::NotPositive {
        field: ConfigField::CacheSize,
        value: value.to_string(),
    })
}

/// True for `-` followed by at least one digit and nothing else.
pub(crate) fn is_negative_integer(s: &str) -> bool {
    s.strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// A JSON scalar in any of the shapes a size field may arrive in.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

/// Deserializes a number or string field into its textual form.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Unsigned(v) => v.to_string(),
        Scalar::Signed(v) => v.to_string(),
        Scalar::Float(v) => v.to_string(),
        Scalar::Text(s) => s,
    })
}
