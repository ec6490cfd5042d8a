//! Types shared across the simulator.
//!
//! 1. **Addresses:** the block number type every cache line is keyed on.
//! 2. **Errors:** validation, parse, trace, config, and advisory failures.

/// Block number type.
pub mod addr;

/// Error taxonomy.
pub mod error;

pub use addr::BlockNumber;
pub use error::{
    AdvisoryError, ConfigError, ConfigField, Error, ParseError, ParseErrorKind, TraceError,
    ValidationError,
};
