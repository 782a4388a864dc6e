//! Positional argument declarations.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::flags::parse_argument;
use crate::option::CoerceFn;

/// One positional slot of a command: `<name>`, `[name]` or `<name...>`.
#[derive(Clone)]
pub struct Argument {
    name: String,
    description: String,
    required: bool,
    variadic: bool,
    default: Option<Value>,
    default_description: Option<String>,
    coerce: Option<CoerceFn>,
    choices: Option<Vec<String>>,
}

impl Argument {
    /// `<name>` is required, `[name]` optional, a bare name required. A
    /// trailing `...` makes the argument variadic.
    pub fn new(spec: impl AsRef<str>) -> Self {
        let spec = parse_argument(spec.as_ref());
        Self {
            name: spec.name,
            description: String::new(),
            required: spec.required,
            variadic: spec.variadic,
            default: None,
            default_description: None,
            coerce: None,
            choices: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn default_with_description(
        mut self,
        value: impl Into<Value>,
        description: impl Into<String>,
    ) -> Self {
        self.default = Some(value.into());
        self.default_description = Some(description.into());
        self
    }

    pub fn coerce<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, Option<&Value>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.coerce = Some(Arc::new(f));
        self
    }

    /// Restrict values to a fixed set. The list is copied.
    pub fn choices<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.choices = Some(values.into_iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn default_value_description(&self) -> Option<&str> {
        self.default_description.as_deref()
    }

    pub fn coercion(&self) -> Option<&CoerceFn> {
        self.coerce.as_ref()
    }

    pub fn get_choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    /// `<name>`, `[name]`, `<name...>` as shown in usage lines.
    pub fn human_name(&self) -> String {
        let dots = if self.variadic { "..." } else { "" };
        if self.required {
            format!("<{}{}>", self.name, dots)
        } else {
            format!("[{}{}]", self.name, dots)
        }
    }
}

impl fmt::Debug for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argument")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("variadic", &self.variadic)
            .field("default", &self.default)
            .field("choices", &self.choices)
            .field("has_coerce", &self.coerce.is_some())
            .finish_non_exhaustive()
    }
}
