//! Option declarations.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::flags::{camelcase, parse_flags, Arity};

/// Converts a raw value into a typed one: `(raw, previous) -> new`.
///
/// `previous` is the value currently held (the default on first use), so a
/// coercion function can accumulate across repeated occurrences. Return
/// [`InvalidArgumentError`](crate::InvalidArgumentError) to reject a value.
pub type CoerceFn = Arc<dyn Fn(&str, Option<&Value>) -> anyhow::Result<Value> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OptRole {
    User,
    Version(String),
}

/// One flagged option of a command.
///
/// ```rust
/// use commandeer::Opt;
/// use serde_json::json;
///
/// let port = Opt::new("-p, --port <number>", "port to listen on")
///     .default(json!(8080))
///     .env("PORT");
/// assert_eq!(port.attribute_name(), "port");
/// assert!(port.is_required());
/// ```
#[derive(Clone)]
pub struct Opt {
    flags: String,
    description: String,
    short: Option<String>,
    long: Option<String>,
    arity: Arity,
    variadic: bool,
    negate: bool,
    attribute: String,
    default: Option<Value>,
    default_description: Option<String>,
    preset: Option<Value>,
    env_var: Option<String>,
    coerce: Option<CoerceFn>,
    choices: Option<Vec<String>>,
    conflicts_with: Vec<String>,
    implied: Vec<(String, Value)>,
    hidden: bool,
    mandatory: bool,
    pub(crate) role: OptRole,
    pub(crate) invalid: Option<String>,
}

impl Opt {
    /// Parse `flags` and build an option. Malformed flags are reported when
    /// the option is added to a command.
    pub fn new(flags: impl Into<String>, description: impl Into<String>) -> Self {
        let flags = flags.into();
        let (short, long, arity, variadic, invalid) = match parse_flags(&flags) {
            Ok(spec) => (spec.short, spec.long, spec.arity, spec.variadic, None),
            Err(reason) => (None, None, Arity::Boolean, false, Some(reason)),
        };
        let negate = long.as_deref().is_some_and(|l| l.starts_with("--no-"));
        let name = long
            .as_deref()
            .map(|l| l.trim_start_matches("--"))
            .or_else(|| short.as_deref().map(|s| s.trim_start_matches('-')))
            .unwrap_or_default();
        let attribute = if negate {
            camelcase(name.trim_start_matches("no-"))
        } else {
            camelcase(name)
        };

        Self {
            flags,
            description: description.into(),
            short,
            long,
            arity,
            variadic,
            negate,
            attribute,
            default: None,
            default_description: None,
            preset: None,
            env_var: None,
            coerce: None,
            choices: None,
            conflicts_with: Vec::new(),
            implied: Vec::new(),
            hidden: false,
            mandatory: false,
            role: OptRole::User,
            invalid,
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

    /// Default value with a description shown in help instead of the value.
    pub fn default_with_description(
        mut self,
        value: impl Into<Value>,
        description: impl Into<String>,
    ) -> Self {
        self.default = Some(value.into());
        self.default_description = Some(description.into());
        self
    }

    /// Value used when the flag is given without one.
    pub fn preset(mut self, value: impl Into<Value>) -> Self {
        self.preset = Some(value.into());
        self
    }

    /// Environment variable consulted when the flag is absent.
    pub fn env(mut self, name: impl Into<String>) -> Self {
        self.env_var = Some(name.into());
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

    /// Attribute names this option cannot be combined with.
    pub fn conflicts<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflicts_with.extend(names.into_iter().map(Into::into));
        self
    }

    /// Values set on other attributes when this option is used.
    pub fn implies<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.implied
            .extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Require a value to be present after parsing (from any source).
    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn short(&self) -> Option<&str> {
        self.short.as_deref()
    }

    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    /// Long flag without dashes, else the short flag letter.
    pub fn name(&self) -> &str {
        self.long
            .as_deref()
            .map(|l| l.trim_start_matches("--"))
            .or_else(|| self.short.as_deref().map(|s| s.trim_start_matches('-')))
            .unwrap_or_default()
    }

    /// Key under which the value is stored.
    pub fn attribute_name(&self) -> &str {
        &self.attribute
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn is_required(&self) -> bool {
        self.arity == Arity::Required
    }

    pub fn is_optional(&self) -> bool {
        self.arity == Arity::Optional
    }

    pub fn is_boolean(&self) -> bool {
        self.arity == Arity::Boolean
    }

    pub fn takes_value(&self) -> bool {
        self.arity != Arity::Boolean
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn is_negate(&self) -> bool {
        self.negate
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn default_value_description(&self) -> Option<&str> {
        self.default_description.as_deref()
    }

    pub fn preset_value(&self) -> Option<&Value> {
        self.preset.as_ref()
    }

    pub fn env_var(&self) -> Option<&str> {
        self.env_var.as_deref()
    }

    pub fn coercion(&self) -> Option<&CoerceFn> {
        self.coerce.as_ref()
    }

    pub fn get_choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    pub fn conflicts_with(&self) -> &[String] {
        &self.conflicts_with
    }

    pub fn implied_values(&self) -> &[(String, Value)] {
        &self.implied
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    /// Does `arg` name this option (exactly its short or long flag)?
    pub fn is(&self, arg: &str) -> bool {
        self.short.as_deref() == Some(arg) || self.long.as_deref() == Some(arg)
    }

    pub(crate) fn version(version: String, flags: &str, description: &str) -> Self {
        let mut opt = Self::new(flags, description);
        opt.role = OptRole::Version(version);
        opt
    }
}

impl fmt::Debug for Opt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opt")
            .field("flags", &self.flags)
            .field("attribute", &self.attribute)
            .field("arity", &self.arity)
            .field("variadic", &self.variadic)
            .field("negate", &self.negate)
            .field("default", &self.default)
            .field("preset", &self.preset)
            .field("env_var", &self.env_var)
            .field("choices", &self.choices)
            .field("has_coerce", &self.coerce.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_name_from_long() {
        let opt = Opt::new("-d, --dry-run", "");
        assert_eq!(opt.name(), "dry-run");
        assert_eq!(opt.attribute_name(), "dryRun");
    }

    #[test]
    fn test_attribute_name_from_short() {
        let opt = Opt::new("-d", "");
        assert_eq!(opt.name(), "d");
        assert_eq!(opt.attribute_name(), "d");
    }

    #[test]
    fn test_negate_strips_no_prefix() {
        let opt = Opt::new("--no-sauce", "");
        assert!(opt.is_negate());
        assert_eq!(opt.name(), "no-sauce");
        assert_eq!(opt.attribute_name(), "sauce");
    }

    #[test]
    fn test_is_matches_exact_flags() {
        let opt = Opt::new("-c, --cheese <type>", "");
        assert!(opt.is("-c"));
        assert!(opt.is("--cheese"));
        assert!(!opt.is("--cheese=brie"));
        assert!(!opt.is("-cbrie"));
    }

    #[test]
    fn test_choices_are_copied() {
        let mut allowed = vec!["red".to_string(), "blue".to_string()];
        let opt = Opt::new("--shade <shade>", "").choices(&allowed);
        allowed.push("orange".to_string());
        assert_eq!(opt.get_choices(), Some(&["red".to_string(), "blue".to_string()][..]));
    }

    #[test]
    fn test_implies_accumulates() {
        let opt = Opt::new("--quiet", "")
            .implies([("logLevel", json!("off"))])
            .implies([("color", json!(false))]);
        assert_eq!(opt.implied_values().len(), 2);
    }

    #[test]
    fn test_invalid_flags_recorded() {
        let opt = Opt::new("cheese", "");
        assert!(opt.invalid.is_some());
    }
}
