#![forbid(unsafe_code)]

//! Flat key-value machine state.
//!
//! The state is a string map with the fixed keys listed in [`KEYS`]; each
//! value uses the same grammar as the matching machine setter. Saving always
//! writes every key. Loading applies each present key on its own and turns
//! bad values into [`StateDiagnostic`]s instead of errors.

use std::collections::BTreeMap;
use std::fmt;

pub const ROTOR_ORDER: &str = "rotor_order";
pub const RING_SETTING: &str = "ring_setting";
pub const INDICATOR: &str = "indicator";
pub const PLUGBOARD: &str = "plugboard";
pub const LOCKED: &str = "locked";

/// Keys in load order.
pub const KEYS: [&str; 5] = [ROTOR_ORDER, RING_SETTING, INDICATOR, PLUGBOARD, LOCKED];

/// Flat string map of machine settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FlatState {
    entries: BTreeMap<String, String>,
}

impl FlatState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlatState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Encodes the ring-lock flag.
#[must_use]
pub fn encode_bool(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Decodes the ring-lock flag; only `"1"` and `"0"` are accepted.
#[must_use]
pub fn decode_bool(value: &str) -> Option<bool> {
    match value {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

/// A state entry that was present but could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDiagnostic {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for StateDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid state value: {}={} ({})",
            self.key, self.value, self.reason
        )
    }
}
