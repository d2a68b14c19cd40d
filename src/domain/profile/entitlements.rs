//! Named boolean capabilities stored on a profile.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the entitlement granted by a paid subscription.
pub const PREMIUM: &str = "premium";

/// Free-form entitlement map (`{"premium": true}`), stored as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entitlements(BTreeMap<String, bool>);

impl Entitlements {
    /// The empty map.
    pub fn none() -> Self {
        Self::default()
    }

    /// `{"premium": true}`.
    pub fn premium() -> Self {
        Self::none().with(PREMIUM, true)
    }

    pub fn with(mut self, name: impl Into<String>, granted: bool) -> Self {
        self.0.insert(name.into(), granted);
        self
    }

    /// Exact lookup; absent names are not granted.
    pub fn is_granted(&self, name: &str) -> bool {
        self.0.get(name).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::Bool(*v)))
                .collect(),
        )
    }

    /// Reads a stored JSON value, skipping non-boolean entries.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value.as_object() {
            Some(map) => Self(
                map.iter()
                    .filter_map(|(k, v)| v.as_bool().map(|b| (k.clone(), b)))
                    .collect(),
            ),
            None => Self::none(),
        }
    }
}
