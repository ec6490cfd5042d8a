//! Advisor reply interpretation.
//!
//! Advisors answer in free text that is expected to embed one JSON object:
//!
//! ```text
//! Sure! {"cache_size": 8, "block_size": "16", "associativity": "Fully-Associative",
//!        "replacement_policy": "LRU", "rationale": {"cache_size": "8 distinct blocks"}}
//! ```
//!
//! The object spans from the first `{` to the last `}` of the reply. Sizes may
//! be numbers or digit strings. Unknown keys are ignored.

use serde_json::{Map, Value};
use tracing::trace;

use super::Recommendation;
use crate::common::{AdvisoryError, ConfigField};
use crate::config::RawConfig;

/// Keys a reply must contain, checked in this order.
pub const REQUIRED_KEYS: [ConfigField; 4] = ConfigField::ALL;

/// Key of the optional per-field explanation object.
const RATIONALE_KEY: &str = "rationale";

/// Extracts a [`Recommendation`] from an advisor's reply.
///
/// The result is not validated; see [`Recommendation::to_config`].
///
/// # Errors
///
/// - [`AdvisoryError::NoJsonObject`] if the reply has no `{ ... }` span.
/// - [`AdvisoryError::MalformedJson`] if that span is not a JSON object, or a
///   field is neither a number nor a string.
/// - [`AdvisoryError::MissingKey`] for the first absent required key.
pub fn parse_recommendation(reply: &str) -> Result<Recommendation, AdvisoryError> {
    let object = extract_object(reply).ok_or(AdvisoryError::NoJsonObject)?;
    trace!(object, "advisor reply object");

    let map: Map<String, Value> =
        serde_json::from_str(object).map_err(|e| AdvisoryError::MalformedJson(e.to_string()))?;

    if let Some(missing) = REQUIRED_KEYS
        .into_iter()
        .find(|field| !map.contains_key(field.key()))
    {
        return Err(AdvisoryError::MissingKey(missing));
    }

    let rationale = map
        .get(RATIONALE_KEY)
        .and_then(Value::as_object)
        .map(|notes| {
            notes
                .iter()
                .filter_map(|(key, note)| {
                    Some((ConfigField::from_key(key)?, note.as_str()?.to_string()))
                })
                .collect()
        })
        .unwrap_or_default();

    let raw: RawConfig = serde_json::from_value(Value::Object(map))
        .map_err(|e| AdvisoryError::MalformedJson(e.to_string()))?;

    Ok(Recommendation { raw, rationale })
}

/// The span from the first `{` to the last `}`, inclusive.
fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
