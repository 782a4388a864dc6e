//! Help extraction: turns a command chain into [`HelpData`] and writes the
//! rendered text, with any extra help text, to an output sink.
//!
//! A chain is the path from the root to the command whose help is shown;
//! ancestors contribute their names to the usage line and, when enabled,
//! their options to the `Global Options` section.

use commandeer_help::{HelpData, HelpEntry, HelpError};
use serde_json::Value;

use crate::{Argument, Command, Opt};

/// Where a piece of extra help text is written relative to the generated help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTextPosition {
    /// Before the help of this command and of every descendant.
    BeforeAll,
    /// Before the help of this command only.
    Before,
    /// After the help of this command only.
    After,
    /// After the help of this command and of every descendant.
    AfterAll,
}

/// A command chain with the display name of each level.
#[derive(Clone, Copy)]
pub(crate) struct HelpTarget<'a> {
    pub chain: &'a [&'a Command],
    pub names: &'a [String],
}

impl<'a> HelpTarget<'a> {
    fn command(&self) -> &'a Command {
        self.chain[self.chain.len() - 1]
    }

    fn name(&self) -> &'a str {
        &self.names[self.names.len() - 1]
    }
}

/// Flags and description of the help option as it appears for `cmd`.
///
/// A flag already used by one of the command's own options is dropped from
/// the entry; when both are taken there is no entry.
pub(crate) fn help_option_entry(cmd: &Command) -> Option<Opt> {
    let help = cmd.help_opt()?;
    let short_taken = help.short().is_some_and(|s| cmd.find_option(s).is_some());
    let long_taken = help.long().is_some_and(|l| cmd.find_option(l).is_some());
    match (short_taken, long_taken) {
        (false, false) => Some(help),
        (true, false) => help
            .long()
            .map(|long| Opt::new(long, help.get_description())),
        (false, true) => help
            .short()
            .map(|short| Opt::new(short, help.get_description())),
        (true, true) => None,
    }
}

fn sort_key(opt: &Opt) -> String {
    opt.short()
        .map(|s| s.trim_start_matches('-'))
        .or_else(|| opt.long().map(|l| l.trim_start_matches("--")))
        .unwrap_or_default()
        .to_lowercase()
}

/// Options listed in help for `cmd`, help option included.
pub(crate) fn visible_options(cmd: &Command) -> Vec<Opt> {
    let mut options: Vec<Opt> = cmd
        .options()
        .iter()
        .filter(|opt| !opt.is_hidden())
        .cloned()
        .collect();
    options.extend(help_option_entry(cmd));
    if cmd.help_config().sort_options {
        options.sort_by_key(sort_key);
    }
    options
}

/// `(term, description)` of each subcommand listed in help, implicit help
/// command included.
pub(crate) fn visible_commands(cmd: &Command) -> Vec<(String, String)> {
    let mut children: Vec<&Command> = cmd.commands().iter().filter(|c| !c.is_hidden()).collect();
    if cmd.help_config().sort_subcommands {
        children.sort_by(|a, b| a.get_name().cmp(b.get_name()));
    }
    let mut entries: Vec<(String, String)> = children
        .into_iter()
        .map(|child| (subcommand_term(child), subcommand_description(child)))
        .collect();
    if let Some(help) = cmd.implicit_help_command() {
        entries.push((help.name_and_args.clone(), help.description.clone()));
    }
    entries
}

/// Long flags offered as suggestions for a mistyped option.
pub(crate) fn option_candidates(cmd: &Command) -> Vec<String> {
    visible_options(cmd)
        .iter()
        .filter_map(|opt| opt.long().map(str::to_string))
        .collect()
}

/// Command names and first aliases offered as suggestions for a mistyped
/// command.
pub(crate) fn command_candidates(cmd: &Command) -> Vec<String> {
    let mut names = Vec::new();
    for child in cmd.commands().iter().filter(|c| !c.is_hidden()) {
        names.push(child.get_name().to_string());
        if let Some(alias) = child.get_aliases().first() {
            names.push(alias.clone());
        }
    }
    if let Some(help) = cmd.implicit_help_command() {
        names.push(help.name().to_string());
    }
    names
}

fn argument_list(arguments: &[Argument]) -> String {
    arguments
        .iter()
        .map(Argument::human_name)
        .collect::<Vec<_>>()
        .join(" ")
}

/// `[options] [command] <args>` for `cmd`, or its custom usage.
pub(crate) fn command_usage(cmd: &Command) -> String {
    if let Some(usage) = cmd.get_usage() {
        return usage.to_string();
    }
    let mut parts = Vec::new();
    if !cmd.options().is_empty() || cmd.help_opt().is_some() {
        parts.push("[options]".to_string());
    }
    if !cmd.commands().is_empty() {
        parts.push("[command]".to_string());
    }
    if !cmd.registered_arguments().is_empty() {
        parts.push(argument_list(cmd.registered_arguments()));
    }
    parts.join(" ")
}

fn name_with_alias(name: &str, cmd: &Command) -> String {
    match cmd.get_aliases().first() {
        Some(alias) => format!("{name}|{alias}"),
        None => name.to_string(),
    }
}

fn subcommand_term(cmd: &Command) -> String {
    let mut term = name_with_alias(cmd.get_name(), cmd);
    if !cmd.options().is_empty() {
        term.push_str(" [options]");
    }
    if !cmd.registered_arguments().is_empty() {
        term.push(' ');
        term.push_str(&argument_list(cmd.registered_arguments()));
    }
    term
}

fn subcommand_description(cmd: &Command) -> String {
    cmd.get_summary()
        .unwrap_or_else(|| cmd.get_description())
        .to_string()
}

fn with_extras(description: &str, extras: Vec<String>) -> String {
    if extras.is_empty() {
        return description.to_string();
    }
    let extras = extras.join(", ");
    if description.is_empty() {
        format!("({extras})")
    } else {
        format!("{description} ({extras})")
    }
}

fn choices_extra(choices: &[String]) -> String {
    let quoted: Vec<String> = choices
        .iter()
        .map(|c| Value::String(c.clone()).to_string())
        .collect();
    format!("choices: {}", quoted.join(", "))
}

fn option_description(opt: &Opt) -> String {
    let mut extras = Vec::new();
    if let Some(choices) = opt.get_choices() {
        extras.push(choices_extra(choices));
    }
    if let Some(default) = opt.default_value() {
        let shown = opt.takes_value() || default.is_boolean();
        if shown {
            let text = opt
                .default_value_description()
                .map(str::to_string)
                .unwrap_or_else(|| default.to_string());
            extras.push(format!("default: {text}"));
        }
    }
    if let Some(preset) = opt.preset_value() {
        if opt.is_optional() {
            extras.push(format!("preset: {preset}"));
        }
    }
    if let Some(var) = opt.env_var() {
        extras.push(format!("env: {var}"));
    }
    with_extras(opt.get_description(), extras)
}

fn argument_description(argument: &Argument) -> String {
    let mut extras = Vec::new();
    if let Some(choices) = argument.get_choices() {
        extras.push(choices_extra(choices));
    }
    if let Some(default) = argument.default_value() {
        let text = argument
            .default_value_description()
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string());
        extras.push(format!("default: {text}"));
    }
    with_extras(argument.get_description(), extras)
}

fn option_entry(opt: &Opt) -> HelpEntry {
    HelpEntry::new(opt.flags(), option_description(opt))
}

/// Structured help for the last command of the chain.
pub(crate) fn help_data(target: HelpTarget<'_>) -> HelpData {
    let cmd = target.command();

    let ancestors: Vec<&str> = target.names[..target.names.len() - 1]
        .iter()
        .map(String::as_str)
        .collect();
    let mut usage = ancestors.join(" ");
    if !usage.is_empty() {
        usage.push(' ');
    }
    usage.push_str(&name_with_alias(target.name(), cmd));
    usage.push(' ');
    usage.push_str(&command_usage(cmd));

    let arguments = if cmd
        .registered_arguments()
        .iter()
        .any(|a| !a.get_description().is_empty())
    {
        cmd.registered_arguments()
            .iter()
            .map(|a| HelpEntry::new(a.name(), argument_description(a)))
            .collect()
    } else {
        Vec::new()
    };

    let global_options = if cmd.help_config().show_global_options {
        let mut globals: Vec<Opt> = target.chain[..target.chain.len() - 1]
            .iter()
            .rev()
            .flat_map(|ancestor| ancestor.options().iter().filter(|o| !o.is_hidden()))
            .cloned()
            .collect();
        if cmd.help_config().sort_options {
            globals.sort_by_key(sort_key);
        }
        globals.iter().map(option_entry).collect()
    } else {
        Vec::new()
    };

    HelpData {
        usage: usage.trim_end().to_string(),
        description: cmd.get_description().to_string(),
        arguments,
        options: visible_options(cmd).iter().map(option_entry).collect(),
        global_options,
        commands: visible_commands(cmd)
            .into_iter()
            .map(|(term, description)| HelpEntry::new(term, description))
            .collect(),
    }
}

/// Help text for the last command of the chain, without extra help text.
pub(crate) fn render(target: HelpTarget<'_>, to_err: bool) -> Result<String, HelpError> {
    let cmd = target.command();
    let width = cmd
        .help_config()
        .help_width
        .or_else(|| cmd.output_config().help_width(to_err));
    cmd.component_factory()
        .create_help()
        .format_help(&help_data(target), width)
}

/// Write help to the out or error sink, surrounded by extra help text:
/// `BeforeAll` from the root down, `Before`, the help, `After`, then
/// `AfterAll` from this command up.
pub(crate) fn write_help(target: HelpTarget<'_>, to_err: bool) -> Result<(), HelpError> {
    let cmd = target.command();
    let output = cmd.output_config();
    let write = |text: &str| {
        if to_err {
            output.err(text)
        } else {
            output.out(text)
        }
    };
    let write_texts = |command: &Command, position: HelpTextPosition| {
        for text in command.help_texts(position) {
            write(&format!("{text}\n"));
        }
    };

    for command in target.chain {
        write_texts(command, HelpTextPosition::BeforeAll);
    }
    write_texts(cmd, HelpTextPosition::Before);
    write(&render(target, to_err)?);
    write_texts(cmd, HelpTextPosition::After);
    for command in target.chain.iter().rev() {
        write_texts(command, HelpTextPosition::AfterAll);
    }
    Ok(())
}
