//! Running traces through a cache.
//!
//! Provides the trace parser, the preset demonstration traces, and the
//! simulator that turns a configuration and a trace into a report.

/// Preset demonstration traces.
pub mod patterns;
/// Whole-trace driver and report.
pub mod simulator;
/// Trace parsing and file loading.
pub mod trace;

pub use patterns::Pattern;
pub use simulator::{SimReport, Simulator, simulate};
pub use trace::{load_trace_file, parse};
