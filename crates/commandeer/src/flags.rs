//! Flag and argument spec grammar.
//!
//! Option flags: `-p, --port <number>`, `--no-color`, `-l|--list [items...]`.
//! Short and long flags are separated by commas, spaces or pipes; `<..>`
//! marks a required value, `[..]` an optional one, and `...` before the
//! closing bracket a variadic value.

/// How many values an option takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// `<value>`: a value must follow.
    Required,
    /// `[value]`: a value may follow.
    Optional,
    /// No value.
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FlagSpec {
    pub short: Option<String>,
    pub long: Option<String>,
    pub arity: Arity,
    pub variadic: bool,
}

pub(crate) fn parse_flags(flags: &str) -> Result<FlagSpec, String> {
    let mut short = None;
    let mut long = None;

    for part in flags.split([' ', ',', '|']).filter(|p| !p.is_empty()) {
        if part.starts_with('<') || part.starts_with('[') {
            break;
        }
        if let Some(name) = part.strip_prefix("--") {
            if name.is_empty() || name.starts_with('-') {
                return Err(format!("bad long flag '{part}'"));
            }
            if long.replace(part.to_string()).is_some() {
                return Err("more than one long flag".to_string());
            }
        } else if part.starts_with('-') && part.chars().count() == 2 {
            if short.replace(part.to_string()).is_some() {
                return Err("more than one short flag".to_string());
            }
        } else {
            return Err(format!("unexpected '{part}'"));
        }
    }

    if short.is_none() && long.is_none() {
        return Err("no short or long flag".to_string());
    }

    let arity = if flags.contains('<') {
        Arity::Required
    } else if flags.contains('[') {
        Arity::Optional
    } else {
        Arity::Boolean
    };

    Ok(FlagSpec {
        short,
        long,
        arity,
        variadic: is_variadic_spec(flags.trim_end()),
    })
}

/// `word...>` or `word...]` at the end of the spec.
fn is_variadic_spec(flags: &str) -> bool {
    let Some(body) = flags
        .strip_suffix("...>")
        .or_else(|| flags.strip_suffix("...]"))
    else {
        return false;
    };
    body.chars()
        .last()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// `foo-bar-baz` → `fooBarBaz`.
pub(crate) fn camelcase(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, word) in name.split('-').enumerate() {
        if i == 0 {
            out.push_str(word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// A token that could be an option: starts with `-` and is not just `-`.
pub(crate) fn maybe_option(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-')
}

/// Parsed positional argument spec: `<name>`, `[name]`, `name...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArgumentSpec {
    pub name: String,
    pub required: bool,
    pub variadic: bool,
}

pub(crate) fn parse_argument(spec: &str) -> ArgumentSpec {
    let spec = spec.trim();
    let (inner, required) = if let Some(inner) = spec.strip_prefix('<') {
        (inner.strip_suffix('>').unwrap_or(inner), true)
    } else if let Some(inner) = spec.strip_prefix('[') {
        (inner.strip_suffix(']').unwrap_or(inner), false)
    } else {
        (spec, true)
    };

    let (name, variadic) = match inner.strip_suffix("...") {
        Some(name) if !name.is_empty() => (name, true),
        _ => (inner, false),
    };

    ArgumentSpec {
        name: name.to_string(),
        required,
        variadic,
    }
}
