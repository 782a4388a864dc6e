//! The command tree.
//!
//! A [`Command`] owns its options, arguments and subcommands and is built
//! by value:
//!
//! ```rust
//! use commandeer::{program, Command};
//!
//! # fn main() -> Result<(), commandeer::DeclarationError> {
//! let pm = program()
//!     .name("pm")
//!     .option("-d, --debug", "output extra debugging")?
//!     .subcommand(
//!         Command::new("install")
//!             .alias("i")
//!             .argument("<pkg...>", "packages to install")?
//!             .action(|inv| {
//!                 println!("installing {:?}", inv.arg(0));
//!                 Ok(())
//!             }),
//!     )?;
//! # let _ = pm;
//! # Ok(())
//! # }
//! ```
//!
//! Registration methods that can reject a declaration return
//! `Result<Self, DeclarationError>`; the rest return `Self`.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use commandeer_help::HelpError;
use futures::FutureExt;
use serde_json::Value;

use crate::engine;
use crate::error::{DeclarationError, Error};
use crate::factory::{ComponentFactory, DefaultFactory};
use crate::help::{self, HelpTarget, HelpTextPosition};
use crate::hooks::{Handler, HookEvent, Hooks};
use crate::matches::{Invocation, Matches, ParseOptions};
use crate::settings::{
    ExitBehavior, HelpCommandConfig, HelpCommandMode, HelpConfig, HelpOptionConfig, OutputConfig,
    Settings, ShowHelpAfterError,
};
use crate::tokenizer::OptionScope;
use crate::value::ValueSource;
use crate::{Argument, CommandError, Opt};

/// Name shown for an unnamed program that was not started from a script.
pub(crate) const DEFAULT_PROGRAM_NAME: &str = "program";

/// A fresh, unnamed root command.
///
/// The name is taken from the script path at parse time unless set with
/// [`Command::name`].
pub fn program() -> Command {
    Command::new("")
}

/// One node of the command tree.
#[derive(Clone)]
pub struct Command {
    name: String,
    aliases: Vec<String>,
    description: String,
    summary: Option<String>,
    usage: Option<String>,
    hidden: bool,
    options: Vec<Opt>,
    arguments: Vec<Argument>,
    commands: Vec<Command>,
    default_command: Option<String>,
    marked_default: bool,
    executable: bool,
    executable_file: Option<String>,
    executable_dir: Option<PathBuf>,
    action: Option<Handler>,
    hooks: Hooks,
    subcommand_observers: Vec<(String, Handler)>,
    unknown_command_listeners: Vec<Handler>,
    pass_through: bool,
    allow_unknown: bool,
    programmatic: Vec<(String, Value, Option<ValueSource>)>,
    help_texts: Vec<(HelpTextPosition, String)>,
    settings: Settings,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
            summary: None,
            usage: None,
            hidden: false,
            options: Vec::new(),
            arguments: Vec::new(),
            commands: Vec::new(),
            default_command: None,
            marked_default: false,
            executable: false,
            executable_file: None,
            executable_dir: None,
            action: None,
            hooks: Hooks::new(),
            subcommand_observers: Vec::new(),
            unknown_command_listeners: Vec::new(),
            pass_through: false,
            allow_unknown: false,
            programmatic: Vec::new(),
            help_texts: Vec::new(),
            settings: Settings::default(),
        }
    }

    // =========================================================================
    // Identity and help metadata
    // =========================================================================

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add an alias. The first alias is shown in help.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Short description used in the parent's command list.
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Replace the generated `[options] [command] <args>` usage.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Leave this command out of its parent's help.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Make this the command run when its parent gets no subcommand name.
    /// Takes effect when attached with [`subcommand`](Self::subcommand).
    pub fn is_default(mut self, is_default: bool) -> Self {
        self.marked_default = is_default;
        self
    }

    pub fn add_help_text(mut self, position: HelpTextPosition, text: impl Into<String>) -> Self {
        self.help_texts.push((position, text.into()));
        self
    }

    // =========================================================================
    // Options and arguments
    // =========================================================================

    /// Add an option created by the command's factory.
    pub fn option(
        self,
        flags: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Result<Self, DeclarationError> {
        let opt = self
            .component_factory()
            .create_option(flags.as_ref(), description.as_ref());
        self.add_option(opt)
    }

    /// Add an option that must have a value once parsing is done.
    pub fn required_option(
        self,
        flags: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Result<Self, DeclarationError> {
        let opt = self
            .component_factory()
            .create_option(flags.as_ref(), description.as_ref())
            .mandatory(true);
        self.add_option(opt)
    }

    pub fn add_option(mut self, opt: Opt) -> Result<Self, DeclarationError> {
        if let Some(reason) = &opt.invalid {
            return Err(DeclarationError::InvalidFlags {
                flags: opt.flags().to_string(),
                reason: reason.clone(),
            });
        }
        for flag in [opt.short(), opt.long()].into_iter().flatten() {
            if let Some(existing) = self.find_option(flag) {
                return Err(DeclarationError::DuplicateFlag {
                    flags: opt.flags().to_string(),
                    flag: flag.to_string(),
                    existing: existing.flags().to_string(),
                });
            }
        }
        // A positive/negative pair may share an attribute.
        if let Some(existing) = self.options.iter().find(|o| {
            o.attribute_name() == opt.attribute_name() && o.is_negate() == opt.is_negate()
        }) {
            return Err(DeclarationError::DuplicateAttribute {
                flags: opt.flags().to_string(),
                attribute: opt.attribute_name().to_string(),
                existing: existing.flags().to_string(),
            });
        }
        self.options.push(opt);
        Ok(self)
    }

    /// Add a positional argument created by the command's factory.
    pub fn argument(
        self,
        spec: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Result<Self, DeclarationError> {
        let argument = self
            .component_factory()
            .create_argument(spec.as_ref(), description.as_ref());
        self.add_argument(argument)
    }

    /// Add several arguments from a space-separated list: `"<src> [dest]"`.
    pub fn arguments(mut self, specs: impl AsRef<str>) -> Result<Self, DeclarationError> {
        for spec in specs.as_ref().split_whitespace() {
            self = self.argument(spec, "")?;
        }
        Ok(self)
    }

    pub fn add_argument(mut self, argument: Argument) -> Result<Self, DeclarationError> {
        if argument.name().is_empty() {
            return Err(DeclarationError::EmptyArgumentName);
        }
        if let Some(previous) = self.arguments.last() {
            if previous.is_variadic() {
                return Err(DeclarationError::VariadicNotLast(previous.name().to_string()));
            }
        }
        if argument.is_required()
            && argument.default_value().is_some()
            && argument.coercion().is_none()
        {
            return Err(DeclarationError::DefaultOnRequiredArgument(
                argument.name().to_string(),
            ));
        }
        self.arguments.push(argument);
        Ok(self)
    }

    /// Add a version flag (`-V, --version`) that prints `version` and exits.
    pub fn version(self, version: impl Into<String>) -> Result<Self, DeclarationError> {
        self.version_with_flags(version, "-V, --version", "output the version number")
    }

    pub fn version_with_flags(
        self,
        version: impl Into<String>,
        flags: &str,
        description: &str,
    ) -> Result<Self, DeclarationError> {
        self.add_option(Opt::version(version.into(), flags, description))
    }

    /// Seed an option value before parsing. The value has no source, so it
    /// counts as custom and is not replaced by the environment.
    pub fn set_option_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.programmatic.push((key.into(), value.into(), None));
        self
    }

    pub fn set_option_value_with_source(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
        source: ValueSource,
    ) -> Self {
        self.programmatic
            .push((key.into(), value.into(), Some(source)));
        self
    }

    // =========================================================================
    // Subcommands
    // =========================================================================

    /// A new command from this command's factory, not yet attached.
    pub fn create_command(&self, name: impl AsRef<str>) -> Command {
        self.component_factory().create_command(name.as_ref())
    }

    /// Attach a subcommand.
    ///
    /// The child's unset settings are filled from this command's current
    /// settings, through all of its own descendants.
    pub fn subcommand(mut self, mut child: Command) -> Result<Self, DeclarationError> {
        if child.name.is_empty() {
            return Err(DeclarationError::EmptyCommandName);
        }
        if let Some(alias) = child.aliases.iter().find(|a| **a == child.name) {
            return Err(DeclarationError::AliasSameAsName(alias.clone()));
        }
        for name in std::iter::once(&child.name).chain(&child.aliases) {
            if let Some(existing) = self.find_command(name) {
                return Err(DeclarationError::DuplicateCommand {
                    name: name.clone(),
                    existing: existing.name.clone(),
                });
            }
        }
        if child.marked_default {
            if let Some(existing) = &self.default_command {
                return Err(DeclarationError::MultipleDefaultCommands {
                    name: child.name.clone(),
                    existing: existing.clone(),
                });
            }
        }
        if child.pass_through && !self.positional_options() {
            return Err(DeclarationError::PassThroughWithoutPositional(child.name.clone()));
        }
        if child.executable && child.action.is_some() {
            return Err(DeclarationError::ExecutableWithAction(child.name.clone()));
        }

        child.inherit_settings(&self.settings);
        if child.marked_default {
            self.default_command = Some(child.name.clone());
        }
        tracing::trace!(parent = %self.name, child = %child.name, "attached subcommand");
        self.commands.push(child);
        Ok(self)
    }

    fn inherit_settings(&mut self, parent: &Settings) {
        self.settings.inherit_from(parent);
        let own = self.settings.clone();
        for child in &mut self.commands {
            child.inherit_settings(&own);
        }
    }

    /// Run this command as a separate program, `<parent>-<name>`.
    pub fn executable(mut self, executable: bool) -> Self {
        self.executable = executable;
        self
    }

    /// Run this command as the given program (name or path). Implies
    /// [`executable`](Self::executable).
    pub fn executable_file(mut self, file: impl Into<String>) -> Self {
        self.executable = true;
        self.executable_file = Some(file.into());
        self
    }

    /// Directory searched for this command's executable subcommands,
    /// relative to the program's own directory.
    pub fn executable_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.executable_dir = Some(dir.into());
        self
    }

    // =========================================================================
    // Handlers
    // =========================================================================

    pub fn action<F>(mut self, f: F) -> Self
    where
        F: Fn(&Invocation) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.action = Some(Handler::sync(f));
        self
    }

    /// An action returning a future. Requires [`parse_async`](Self::parse_async).
    pub fn action_async<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.action = Some(Handler::from_async(move |inv| f(inv).boxed()));
        self
    }

    pub fn hook<F>(mut self, event: HookEvent, f: F) -> Self
    where
        F: Fn(&Invocation) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks.add(event, Handler::sync(f));
        self
    }

    pub fn hook_async<F, Fut>(mut self, event: HookEvent, f: F) -> Self
    where
        F: Fn(Invocation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hooks
            .add(event, Handler::from_async(move |inv| f(inv).boxed()));
        self
    }

    /// Observe the subcommand `name`.
    ///
    /// Observers run after the subcommand's action. When the subcommand has
    /// no action, they run in its place and parsing succeeds.
    pub fn on_subcommand<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Invocation) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.subcommand_observers
            .push((name.into(), Handler::sync(f)));
        self
    }

    /// Handle operands that name no subcommand instead of failing with
    /// `unknown command`. The operands are in `command().raw_args()`.
    pub fn on_unknown_command<F>(mut self, f: F) -> Self
    where
        F: Fn(&Invocation) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.unknown_command_listeners.push(Handler::sync(f));
        self
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn configure_output(mut self, output: OutputConfig) -> Self {
        self.settings.output = Some(output);
        self
    }

    /// Return categorized errors from `parse` instead of exiting.
    pub fn exit_override(self) -> Self {
        self.exit_behavior(ExitBehavior::Return)
    }

    /// Hand categorized errors to `f`; see [`ExitCallback`](crate::ExitCallback).
    pub fn exit_callback<F>(self, f: F) -> Self
    where
        F: Fn(&CommandError) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        self.exit_behavior(ExitBehavior::Callback(Arc::new(f)))
    }

    pub fn exit_behavior(mut self, behavior: ExitBehavior) -> Self {
        self.settings.exit = Some(behavior);
        self
    }

    pub fn configure_help(mut self, config: HelpConfig) -> Self {
        self.settings.help_config = Some(config);
        self
    }

    pub fn help_option(mut self, flags: impl Into<String>, description: impl Into<String>) -> Self {
        self.settings.help_option = Some(HelpOptionConfig::Enabled {
            flags: flags.into(),
            description: description.into(),
        });
        self
    }

    pub fn disable_help_option(mut self) -> Self {
        self.settings.help_option = Some(HelpOptionConfig::Disabled);
        self
    }

    /// Rename the implicit help command, e.g. `assist [topic]`.
    pub fn help_command(
        mut self,
        name_and_args: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let mut config = self.settings.help_command.clone().unwrap_or_default();
        config.name_and_args = name_and_args.into();
        config.description = description.into();
        self.settings.help_command = Some(config);
        self
    }

    /// Force the implicit help command on or off.
    pub fn add_help_command(mut self, enabled: bool) -> Self {
        let mut config = self.settings.help_command.clone().unwrap_or_default();
        config.mode = if enabled {
            HelpCommandMode::Always
        } else {
            HelpCommandMode::Never
        };
        self.settings.help_command = Some(config);
        self
    }

    /// Whether `-oVALUE` sets an optional-value option (default on) or
    /// expands as a cluster of short flags.
    pub fn combine_flag_and_optional_value(mut self, combine: bool) -> Self {
        self.settings.combine_flag_and_optional_value = Some(combine);
        self
    }

    /// Accept more operands than declared arguments (default on).
    pub fn allow_excess_arguments(mut self, allow: bool) -> Self {
        self.settings.allow_excess_arguments = Some(allow);
        self
    }

    /// Options of this command are only recognized before its subcommand name.
    pub fn enable_positional_options(mut self, enable: bool) -> Self {
        self.settings.enable_positional_options = Some(enable);
        self
    }

    /// From the first operand on, pass every token through untouched.
    pub fn pass_through_options(mut self, pass_through: bool) -> Self {
        self.pass_through = pass_through;
        self
    }

    /// Keep unknown options as operands instead of failing.
    pub fn allow_unknown_option(mut self, allow: bool) -> Self {
        self.allow_unknown = allow;
        self
    }

    /// Print the full help after an error message.
    pub fn show_help_after_error(mut self, show: bool) -> Self {
        self.settings.show_help_after_error = Some(if show {
            ShowHelpAfterError::Help
        } else {
            ShowHelpAfterError::Off
        });
        self
    }

    /// Print `message` after an error message.
    pub fn show_help_after_error_message(mut self, message: impl Into<String>) -> Self {
        self.settings.show_help_after_error = Some(ShowHelpAfterError::Message(message.into()));
        self
    }

    /// Append "Did you mean" hints to unknown option and command errors
    /// (default on).
    pub fn show_suggestion_after_error(mut self, show: bool) -> Self {
        self.settings.show_suggestion_after_error = Some(show);
        self
    }

    pub fn factory<F: ComponentFactory + 'static>(self, factory: F) -> Self {
        self.shared_factory(Arc::new(factory))
    }

    pub fn shared_factory(mut self, factory: Arc<dyn ComponentFactory>) -> Self {
        self.settings.factory = Some(factory);
        self
    }

    // =========================================================================
    // Parsing and help
    // =========================================================================

    /// Parse `argv` and run the resolved handlers.
    ///
    /// Fails with [`ErrorCode::AsyncRequired`](crate::ErrorCode::AsyncRequired)
    /// when an async pre-subcommand hook is reached, and before running any
    /// action handler when an async pre-action, action or post-action
    /// handler would run.
    pub fn parse<I, S>(&self, argv: I, options: ParseOptions) -> Result<Matches, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        engine::parse(self, collect(argv), &options)
    }

    /// Parse `argv` and run the resolved handlers, awaiting async ones.
    pub fn parse_async<I, S>(
        &self,
        argv: I,
        options: ParseOptions,
    ) -> impl Future<Output = Result<Matches, Error>> + '_
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = collect(argv);
        async move { engine::parse_async(self, argv, &options).await }
    }

    /// Parse the arguments of the running process.
    pub fn parse_process_args(&self) -> Result<Matches, Error> {
        self.parse(std::env::args(), ParseOptions::default())
    }

    /// Help text for this command, as if it were the root.
    pub fn help_information(&self) -> Result<String, HelpError> {
        let names = [self.display_name().to_string()];
        help::render(
            HelpTarget {
                chain: &[self],
                names: &names,
            },
            false,
        )
    }

    /// Write help, with any extra help text, to the out sink.
    pub fn output_help(&self) -> Result<(), HelpError> {
        let names = [self.display_name().to_string()];
        help::write_help(
            HelpTarget {
                chain: &[self],
                names: &names,
            },
            false,
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub(crate) fn display_name(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_PROGRAM_NAME
        } else {
            &self.name
        }
    }

    pub fn get_aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn get_summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn get_usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn options(&self) -> &[Opt] {
        &self.options
    }

    pub fn registered_arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn is_executable(&self) -> bool {
        self.executable
    }

    pub fn get_executable_file(&self) -> Option<&str> {
        self.executable_file.as_deref()
    }

    pub fn get_executable_dir(&self) -> Option<&Path> {
        self.executable_dir.as_deref()
    }

    /// The subcommand with this name or alias.
    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|c| c.name == name || c.aliases.iter().any(|a| a == name))
    }

    /// The option with exactly this short or long flag.
    pub fn find_option(&self, flag: &str) -> Option<&Opt> {
        self.options.iter().find(|o| o.is(flag))
    }

    pub(crate) fn default_command(&self) -> Option<&Command> {
        self.default_command
            .as_deref()
            .and_then(|name| self.find_command(name))
    }

    pub(crate) fn action_handler(&self) -> Option<&Handler> {
        self.action.as_ref()
    }

    pub(crate) fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub(crate) fn observers_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Handler> {
        self.subcommand_observers
            .iter()
            .filter(move |(observed, _)| observed == name)
            .map(|(_, handler)| handler)
    }

    pub(crate) fn unknown_command_listeners(&self) -> &[Handler] {
        &self.unknown_command_listeners
    }

    pub(crate) fn programmatic_values(&self) -> &[(String, Value, Option<ValueSource>)] {
        &self.programmatic
    }

    pub(crate) fn help_texts(&self, position: HelpTextPosition) -> impl Iterator<Item = &str> {
        self.help_texts
            .iter()
            .filter(move |(p, _)| *p == position)
            .map(|(_, text)| text.as_str())
    }

    pub(crate) fn passes_through(&self) -> bool {
        self.pass_through
    }

    pub(crate) fn allows_unknown_option(&self) -> bool {
        self.allow_unknown
    }

    // Settings, resolved against their defaults.

    pub(crate) fn output_config(&self) -> OutputConfig {
        self.settings.output.clone().unwrap_or_default()
    }

    pub(crate) fn exit_setting(&self) -> ExitBehavior {
        self.settings.exit.clone().unwrap_or_default()
    }

    pub(crate) fn help_config(&self) -> HelpConfig {
        self.settings.help_config.clone().unwrap_or_default()
    }

    pub(crate) fn component_factory(&self) -> Arc<dyn ComponentFactory> {
        self.settings
            .factory
            .clone()
            .unwrap_or_else(|| Arc::new(DefaultFactory))
    }

    pub(crate) fn positional_options(&self) -> bool {
        self.settings.enable_positional_options.unwrap_or(false)
    }

    pub(crate) fn allows_excess_arguments(&self) -> bool {
        self.settings.allow_excess_arguments.unwrap_or(true)
    }

    pub(crate) fn help_after_error(&self) -> ShowHelpAfterError {
        self.settings
            .show_help_after_error
            .clone()
            .unwrap_or_default()
    }

    pub(crate) fn shows_suggestions(&self) -> bool {
        self.settings.show_suggestion_after_error.unwrap_or(true)
    }

    /// The help flag, unless disabled.
    pub(crate) fn help_opt(&self) -> Option<Opt> {
        match self.settings.help_option.clone().unwrap_or_default() {
            HelpOptionConfig::Enabled { flags, description } => Some(Opt::new(flags, description)),
            HelpOptionConfig::Disabled => None,
        }
    }

    /// The synthesized `help [command]` subcommand, when this command has one.
    pub(crate) fn implicit_help_command(&self) -> Option<HelpCommandConfig> {
        let config = self.settings.help_command.clone().unwrap_or_default();
        let wanted = match config.mode {
            HelpCommandMode::Auto => !self.commands.is_empty() && self.action.is_none(),
            HelpCommandMode::Always => true,
            HelpCommandMode::Never => false,
        };
        (wanted && self.find_command(config.name()).is_none()).then_some(config)
    }
}

impl OptionScope for Command {
    fn find_option(&self, arg: &str) -> Option<&Opt> {
        Command::find_option(self, arg)
    }

    fn combine_flag_and_optional_value(&self) -> bool {
        self.settings.combine_flag_and_optional_value.unwrap_or(true)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("options", &self.options)
            .field("arguments", &self.arguments)
            .field("commands", &self.commands)
            .field("executable", &self.executable)
            .field("has_action", &self.action.is_some())
            .finish_non_exhaustive()
    }
}

fn collect<I, S>(argv: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    argv.into_iter().map(Into::into).collect()
}
