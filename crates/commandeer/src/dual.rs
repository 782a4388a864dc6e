//! Positive/negative option pairs sharing one attribute.
//!
//! `--cheese` and `--no-cheese` both store into `cheese`. Given a stored
//! value, [`DualOptions::value_from_option`] tells which of the two produced
//! it, so implications and conflict messages can be attributed to the right
//! flag.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::Opt;

pub struct DualOptions<'a> {
    positive: HashMap<&'a str, &'a Opt>,
    negative: HashMap<&'a str, &'a Opt>,
    dual: HashSet<&'a str>,
}

impl<'a> DualOptions<'a> {
    pub fn new(options: &'a [Opt]) -> Self {
        let mut positive = HashMap::new();
        let mut negative = HashMap::new();
        for opt in options {
            if opt.is_negate() {
                negative.insert(opt.attribute_name(), opt);
            } else {
                positive.insert(opt.attribute_name(), opt);
            }
        }
        let dual = negative
            .keys()
            .filter(|key| positive.contains_key(*key))
            .copied()
            .collect();

        Self {
            positive,
            negative,
            dual,
        }
    }

    pub fn is_dual(&self, attribute: &str) -> bool {
        self.dual.contains(attribute)
    }

    pub fn positive(&self, attribute: &str) -> Option<&'a Opt> {
        self.positive.get(attribute).copied()
    }

    pub fn negative(&self, attribute: &str) -> Option<&'a Opt> {
        self.negative.get(attribute).copied()
    }

    /// Could `option` have produced `value`?
    ///
    /// Always true for attributes with a single option. For a dual pair the
    /// negative option produces its preset (or `false`); the positive one
    /// produces anything else.
    pub fn value_from_option(&self, value: &Value, option: &Opt) -> bool {
        let key = option.attribute_name();
        if !self.is_dual(key) {
            return true;
        }
        let negative_value = self
            .negative
            .get(key)
            .and_then(|neg| neg.preset_value())
            .cloned()
            .unwrap_or(Value::Bool(false));
        option.is_negate() == (negative_value == *value)
    }
}
