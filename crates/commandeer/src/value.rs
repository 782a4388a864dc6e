//! Option values and their provenance.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where an option value came from.
///
/// A value stored without a source (see
/// [`Command::set_option_value`](crate::Command::set_option_value)) has no
/// `ValueSource` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    Config,
    Env,
    Cli,
    Implied,
}

impl ValueSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueSource::Default => "default",
            ValueSource::Config => "config",
            ValueSource::Env => "env",
            ValueSource::Cli => "cli",
            ValueSource::Implied => "implied",
        }
    }
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    value: Value,
    source: Option<ValueSource>,
}

/// The option value bag of one command level, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionValues {
    slots: BTreeMap<String, Slot>,
}

impl OptionValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    /// Deserialize one value into `T`. `None` when absent or of the wrong shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn source(&self, key: &str) -> Option<ValueSource> {
        self.slots.get(key).and_then(|slot| slot.source)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value, source: Option<ValueSource>) {
        self.slots.insert(key.into(), Slot { value, source });
    }

    /// True when a value is present and did not come from a default or an
    /// implication.
    pub fn has_custom(&self, key: &str) -> bool {
        match self.slots.get(key) {
            Some(slot) => !matches!(
                slot.source,
                Some(ValueSource::Default) | Some(ValueSource::Implied)
            ),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots
            .iter()
            .map(|(key, slot)| (key.as_str(), &slot.value))
    }

    pub fn to_map(&self) -> Map<String, Value> {
        self.slots
            .iter()
            .map(|(key, slot)| (key.clone(), slot.value.clone()))
            .collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    /// Deserialize the whole bag into a struct.
    ///
    /// Attribute names are camel-cased, so pair this with
    /// `#[serde(rename_all = "camelCase")]`.
    pub fn to_struct<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_value())
    }

    /// Layer `other` under `self`: keys missing here are taken from `other`.
    pub(crate) fn fill_from(&mut self, other: &OptionValues) {
        for (key, slot) in &other.slots {
            self.slots
                .entry(key.clone())
                .or_insert_with(|| slot.clone());
        }
    }
}

/// Text form of a value handed to coercion functions and error messages.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
