//! Option value resolution: defaults, command line, environment,
//! implications, conflicts, and positional argument binding.
//!
//! Precedence, highest first: command line, environment, implied, preset
//! (for a flag given without a value), default. The environment only
//! replaces values whose source is `default`, `config` or `env`.

use std::collections::{HashSet, VecDeque};

use serde_json::Value;

use crate::dual::DualOptions;
use crate::error::{CommandError, Error, ErrorCode, InvalidArgumentError};
use crate::option::{CoerceFn, OptRole};
use crate::value::{value_text, OptionValues, ValueSource};
use crate::{Argument, EnvReader, Opt};

/// Where a raw option value came from, for error messages.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RawOrigin<'a> {
    Cli,
    Env(&'a str),
}

impl RawOrigin<'_> {
    fn source(&self) -> ValueSource {
        match self {
            RawOrigin::Cli => ValueSource::Cli,
            RawOrigin::Env(_) => ValueSource::Env,
        }
    }

    fn invalid_prefix(&self, opt: &Opt, text: &str) -> String {
        match self {
            RawOrigin::Cli => {
                format!("error: option '{}' argument '{}' is invalid.", opt.flags(), text)
            }
            RawOrigin::Env(var) => format!(
                "error: option '{}' value '{}' from env '{}' is invalid.",
                opt.flags(),
                text,
                var
            ),
        }
    }
}

/// Value bag before the command line is read: declared defaults, the
/// `true` default of lone negated flags, then programmatic values.
pub(crate) fn initial_values(
    options: &[Opt],
    programmatic: &[(String, Value, Option<ValueSource>)],
) -> OptionValues {
    let mut values = OptionValues::new();
    for (index, opt) in options.iter().enumerate() {
        if opt.role != OptRole::User {
            continue;
        }
        if opt.is_negate() {
            let positive = opt.long().map(|l| l.replacen("--no-", "--", 1));
            let has_positive = positive.as_deref().is_some_and(|flag| {
                options[..index].iter().any(|o| o.long() == Some(flag))
            });
            if !has_positive {
                let default = opt.default_value().cloned().unwrap_or(Value::Bool(true));
                values.set(opt.attribute_name(), default, Some(ValueSource::Default));
            }
        } else if let Some(default) = opt.default_value() {
            values.set(opt.attribute_name(), default.clone(), Some(ValueSource::Default));
        }
    }
    for (key, value, source) in programmatic {
        values.set(key.clone(), value.clone(), *source);
    }
    values
}

/// Run a coercion function, re-wrapping [`InvalidArgumentError`] with context.
pub(crate) fn coerce_value(
    f: &CoerceFn,
    raw: &str,
    previous: Option<&Value>,
    prefix: impl FnOnce() -> String,
) -> Result<Value, Error> {
    f(raw, previous).map_err(|err| match err.downcast::<InvalidArgumentError>() {
        Ok(invalid) => {
            Error::Command(CommandError::invalid_argument(format!("{} {}", prefix(), invalid)))
        }
        Err(other) => Error::from_callback(other),
    })
}

fn check_choice(choices: Option<&[String]>, text: &str, prefix: impl FnOnce() -> String) -> Result<(), Error> {
    match choices {
        Some(choices) if !choices.iter().any(|c| c == text) => {
            Err(Error::Command(CommandError::invalid_argument(format!(
                "{} Allowed choices are {}.",
                prefix(),
                choices.join(", ")
            ))))
        }
        _ => Ok(()),
    }
}

/// Store one occurrence of an option.
///
/// `raw` is `None` for a flag given without a value. Booleans with a
/// coercion function call it with an empty raw value so it can accumulate;
/// optional-value flags given bare take the preset or `true`.
pub(crate) fn apply_value(
    values: &mut OptionValues,
    opt: &Opt,
    raw: Option<&str>,
    origin: RawOrigin<'_>,
) -> Result<(), Error> {
    let key = opt.attribute_name();
    let previous = values.get(key).cloned();
    let previous_is_default = values.source(key) == Some(ValueSource::Default);

    let given = raw
        .map(|s| Value::String(s.to_string()))
        .or_else(|| opt.preset_value().cloned());

    let value = match given {
        Some(value) => {
            let text = value_text(&value);
            check_choice(opt.get_choices(), &text, || origin.invalid_prefix(opt, &text))?;
            if let Some(f) = opt.coercion() {
                coerce_value(f, &text, previous.as_ref(), || origin.invalid_prefix(opt, &text))?
            } else if opt.is_variadic() {
                match previous {
                    Some(Value::Array(mut items)) if !previous_is_default => {
                        items.push(value);
                        Value::Array(items)
                    }
                    _ => Value::Array(vec![value]),
                }
            } else {
                value
            }
        }
        None => match opt.coercion() {
            Some(f) if opt.is_boolean() => {
                coerce_value(f, "", previous.as_ref(), || origin.invalid_prefix(opt, ""))?
            }
            _ => Value::Bool(!opt.is_negate()),
        },
    };

    tracing::trace!(attribute = key, value = %value, source = %origin.source(), "option value");
    values.set(key, value, Some(origin.source()));
    Ok(())
}

/// Apply environment fallbacks after the command line of one level was read.
pub(crate) fn apply_env(
    values: &mut OptionValues,
    options: &[Opt],
    env: &dyn EnvReader,
) -> Result<(), Error> {
    for opt in options {
        let Some(var) = opt.env_var() else {
            continue;
        };
        let Some(text) = env.var(var) else {
            continue;
        };
        let key = opt.attribute_name();
        let replaceable = !values.contains(key)
            || matches!(
                values.source(key),
                Some(ValueSource::Default | ValueSource::Config | ValueSource::Env)
            );
        if !replaceable {
            continue;
        }
        let raw = opt.takes_value().then_some(text.as_str());
        apply_value(values, opt, raw, RawOrigin::Env(var))?;
    }
    Ok(())
}

/// Apply `implies` maps of options that hold a custom value.
///
/// Targets that already hold a custom value are left alone. An implied
/// value can itself trigger the implications of the option it lands on;
/// each option fires at most once, so cycles end.
pub(crate) fn apply_implied(values: &mut OptionValues, options: &[Opt]) {
    let dual = DualOptions::new(options);

    let mut queue: VecDeque<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, opt)| !opt.implied_values().is_empty())
        .filter(|(_, opt)| {
            let key = opt.attribute_name();
            values.has_custom(key)
                && values
                    .get(key)
                    .is_some_and(|value| dual.value_from_option(value, opt))
        })
        .map(|(index, _)| index)
        .collect();
    let mut fired: HashSet<usize> = queue.iter().copied().collect();

    while let Some(index) = queue.pop_front() {
        for (key, value) in options[index].implied_values() {
            if values.has_custom(key) {
                continue;
            }
            values.set(key.clone(), value.clone(), Some(ValueSource::Implied));

            for (next, opt) in options.iter().enumerate() {
                if opt.attribute_name() == key
                    && !opt.implied_values().is_empty()
                    && !fired.contains(&next)
                    && dual.value_from_option(value, opt)
                {
                    fired.insert(next);
                    queue.push_back(next);
                }
            }
        }
    }
}

/// Which flag to name for a value: the negative one when the value is what
/// the negative flag produces, else the positive one.
fn best_option_for_value<'a>(opt: &'a Opt, dual: &DualOptions<'a>, values: &OptionValues) -> &'a Opt {
    let key = opt.attribute_name();
    if let Some(negative) = dual.negative(key) {
        let negative_value = negative
            .preset_value()
            .cloned()
            .unwrap_or(Value::Bool(false));
        if values.get(key) == Some(&negative_value) {
            return negative;
        }
    }
    dual.positive(key).unwrap_or(opt)
}

fn describe_for_conflict(opt: &Opt, dual: &DualOptions<'_>, values: &OptionValues) -> String {
    let best = best_option_for_value(opt, dual, values);
    match (values.source(best.attribute_name()), best.env_var()) {
        (Some(ValueSource::Env), Some(var)) => format!("environment variable '{var}'"),
        _ => format!("option '{}'", best.flags()),
    }
}

/// First pair of set options that declare a conflict with each other.
pub(crate) fn check_conflicts(options: &[Opt], values: &OptionValues) -> Result<(), CommandError> {
    let dual = DualOptions::new(options);
    let defined: Vec<&Opt> = options
        .iter()
        .filter(|opt| {
            let key = opt.attribute_name();
            values.contains(key) && values.source(key) != Some(ValueSource::Default)
        })
        .collect();

    for opt in defined.iter().filter(|o| !o.conflicts_with().is_empty()) {
        let conflicting = defined.iter().find(|other| {
            opt.conflicts_with()
                .iter()
                .any(|name| name == other.attribute_name())
        });
        if let Some(other) = conflicting {
            let message = format!(
                "error: {} cannot be used with {}",
                describe_for_conflict(opt, &dual, values),
                describe_for_conflict(other, &dual, values)
            );
            return Err(CommandError::new(ErrorCode::ConflictingOption, 1, message));
        }
    }
    Ok(())
}

/// First mandatory option left without a value.
pub(crate) fn check_mandatory(options: &[Opt], values: &OptionValues) -> Result<(), CommandError> {
    match options
        .iter()
        .find(|opt| opt.is_mandatory() && !values.contains(opt.attribute_name()))
    {
        Some(opt) => Err(CommandError::new(
            ErrorCode::MissingMandatoryOptionValue,
            1,
            format!("error: required option '{}' not specified", opt.flags()),
        )),
        None => Ok(()),
    }
}

fn argument_prefix(argument: &Argument, text: &str) -> String {
    format!(
        "error: command-argument value '{}' is invalid for argument '{}'.",
        text,
        argument.name()
    )
}

fn bind_one(argument: &Argument, raw: &str, previous: Option<&Value>) -> Result<Value, Error> {
    check_choice(argument.get_choices(), raw, || argument_prefix(argument, raw))?;
    match argument.coercion() {
        Some(f) => coerce_value(f, raw, previous, || argument_prefix(argument, raw)),
        None => Ok(Value::String(raw.to_string())),
    }
}

/// Bind raw operands to declared arguments.
///
/// `command_label` names the command in the excess-arguments message
/// (`None` for the program itself).
pub(crate) fn bind_arguments(
    arguments: &[Argument],
    raw: &[String],
    allow_excess: bool,
    command_label: Option<&str>,
) -> Result<Vec<Value>, Error> {
    for (index, argument) in arguments.iter().enumerate() {
        if argument.is_required() && index >= raw.len() {
            return Err(Error::Command(CommandError::new(
                ErrorCode::MissingArgument,
                1,
                format!("error: missing required argument '{}'", argument.name()),
            )));
        }
    }

    let ends_variadic = arguments.last().is_some_and(Argument::is_variadic);
    if !ends_variadic && raw.len() > arguments.len() && !allow_excess {
        let expected = arguments.len();
        let plural = if expected == 1 { "" } else { "s" };
        let for_command = command_label
            .map(|name| format!(" for '{name}'"))
            .unwrap_or_default();
        return Err(Error::Command(CommandError::new(
            ErrorCode::ExcessArguments,
            1,
            format!(
                "error: too many arguments{for_command}. Expected {expected} argument{plural} but got {}.",
                raw.len()
            ),
        )));
    }

    let mut bound = Vec::with_capacity(arguments.len());
    for (index, argument) in arguments.iter().enumerate() {
        let value = if argument.is_variadic() {
            if index < raw.len() {
                if argument.coercion().is_some() {
                    let mut acc = argument.default_value().cloned();
                    for item in &raw[index..] {
                        acc = Some(bind_one(argument, item, acc.as_ref())?);
                    }
                    acc.unwrap_or(Value::Null)
                } else {
                    let items = raw[index..]
                        .iter()
                        .map(|item| bind_one(argument, item, None))
                        .collect::<Result<Vec<_>, _>>()?;
                    Value::Array(items)
                }
            } else {
                argument
                    .default_value()
                    .cloned()
                    .unwrap_or_else(|| Value::Array(Vec::new()))
            }
        } else if let Some(item) = raw.get(index) {
            bind_one(argument, item, argument.default_value())?
        } else {
            argument.default_value().cloned().unwrap_or(Value::Null)
        };
        bound.push(value);
    }
    Ok(bound)
}
