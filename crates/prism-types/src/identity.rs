//! Identity trait types.
//!
//! Traits describe the agent's own persona. They are the only records that
//! are mutated in place: one row per trait name, replaced on every update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Confidence stored when an adjustment does not carry one.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// A persisted identity trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityTrait {
    pub name: String,
    /// The adjustment blob exactly as it was last supplied.
    pub value: serde_json::Value,
    pub confidence: f64,
    pub last_updated: DateTime<Utc>,
}

/// A validated full-replace update for one trait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitUpdate {
    pub name: String,
    pub value: serde_json::Value,
    pub confidence: f64,
}

impl TraitUpdate {
    /// Build an update from a raw adjustment blob.
    ///
    /// `adjustment.confidence` becomes the stored confidence (default
    /// [`DEFAULT_CONFIDENCE`]); it must be a number within `0.0..=1.0`.
    pub fn from_adjustment(
        name: impl Into<String>,
        adjustment: serde_json::Value,
    ) -> Result<Self, String> {
        let confidence = match adjustment.get("confidence") {
            None | Some(serde_json::Value::Null) => DEFAULT_CONFIDENCE,
            Some(v) => v
                .as_f64()
                .ok_or_else(|| "confidence must be a number".to_string())?,
        };
        if !(0.0..=1.0).contains(&confidence) {
            return Err(format!("confidence {confidence} must be within 0.0..=1.0"));
        }

        Ok(Self {
            name: name.into(),
            value: adjustment,
            confidence,
        })
    }
}
