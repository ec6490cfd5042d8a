//! Boundary to an external configuration advisor.
//!
//! An advisor looks at a trace and the current configuration and proposes a
//! new configuration. The transport is entirely the advisor's business; this
//! module only defines:
//! 1. **The collaborator:** the [`Advisor`] trait.
//! 2. **The request:** [`build_prompt`] and [`PatternSummary`].
//! 3. **The reply:** [`parse_recommendation`] and [`Recommendation`].
//!
//! Advice is a separate phase that runs before a simulation, never during
//! one. A failed or rejected recommendation is reported and nothing else
//! changes.

/// Request text construction.
pub mod prompt;
/// Reply interpretation.
pub mod response;

use std::collections::BTreeMap;

use tracing::{debug, info};

pub use prompt::{PatternSummary, build_prompt};
pub use response::{REQUIRED_KEYS, parse_recommendation};

use crate::common::{AdvisoryError, ConfigField};
use crate::config::{CacheConfig, RawConfig};

/// A proposed configuration, not yet validated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recommendation {
    /// The four fields as the advisor gave them.
    pub raw: RawConfig,
    /// Optional per-field explanation, keyed by field.
    pub rationale: BTreeMap<ConfigField, String>,
}

impl Recommendation {
    /// Validates the proposed configuration.
    ///
    /// # Errors
    ///
    /// [`AdvisoryError::Rejected`] carrying the validation failure.
    pub fn to_config(&self) -> Result<CacheConfig, AdvisoryError> {
        Ok(self.raw.validate()?)
    }
}

/// An external source of configuration advice.
pub trait Advisor {
    /// Proposes a configuration for `pattern`, given the one currently in use.
    ///
    /// # Arguments
    ///
    /// * `pattern` - The raw trace text.
    /// * `current` - The configuration currently selected.
    ///
    /// # Errors
    ///
    /// Any [`AdvisoryError`]; callers treat all of them as "no advice".
    fn recommend(
        &self,
        pattern: &str,
        current: &CacheConfig,
    ) -> Result<Recommendation, AdvisoryError>;
}

/// Asks `advisor` for a configuration and validates it.
///
/// # Errors
///
/// The advisor's own error, or [`AdvisoryError::Rejected`] if the proposal
/// fails validation.
pub fn request_config(
    advisor: &dyn Advisor,
    pattern: &str,
    current: &CacheConfig,
) -> Result<(CacheConfig, Recommendation), AdvisoryError> {
    let recommendation = advisor.recommend(pattern, current).inspect_err(|e| {
        info!(error = %e, "no recommendation available");
    })?;
    let config = recommendation.to_config()?;
    debug!(%config, "recommendation accepted");
    Ok((config, recommendation))
}
