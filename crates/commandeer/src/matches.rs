//! Parse input options and parse results.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use commandeer_exec::{Launcher, ProcessLauncher};
use serde_json::Value;

use crate::env::{EnvReader, RealEnv};
use crate::value::OptionValues;
use crate::CommandError;

/// How the argument vector handed to `parse` is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgvOrigin {
    /// Only user arguments.
    User,
    /// `argv[0]` is the program path, as from `std::env::args()`.
    #[default]
    Program,
    /// `argv[0]` is an interpreter and `argv[1]` the script it runs.
    Interpreter,
}

/// Per-parse inputs besides argv.
#[derive(Clone)]
pub struct ParseOptions {
    pub(crate) origin: ArgvOrigin,
    pub(crate) env: Arc<dyn EnvReader>,
    pub(crate) launcher: Arc<dyn Launcher>,
    pub(crate) script_path: Option<PathBuf>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            origin: ArgvOrigin::default(),
            env: Arc::new(RealEnv),
            launcher: Arc::new(ProcessLauncher::new()),
            script_path: None,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for an argv holding only user arguments.
    pub fn user() -> Self {
        Self::default().origin(ArgvOrigin::User)
    }

    pub fn origin(mut self, origin: ArgvOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn env<E: EnvReader + 'static>(mut self, env: E) -> Self {
        self.env = Arc::new(env);
        self
    }

    pub fn launcher<L: Launcher + 'static>(mut self, launcher: L) -> Self {
        self.launcher = Arc::new(launcher);
        self
    }

    pub fn shared_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Path the program was started from, overriding the one taken from argv.
    pub fn script_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.script_path = Some(path.into());
        self
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("origin", &self.origin)
            .field("script_path", &self.script_path)
            .finish_non_exhaustive()
    }
}

/// What one command level saw during a parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub(crate) name: String,
    pub(crate) options: OptionValues,
    pub(crate) raw_args: Vec<String>,
    pub(crate) args: Vec<Value>,
}

impl ParsedCommand {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn opts(&self) -> &OptionValues {
        &self.options
    }

    /// Operands and unclaimed tokens, as typed.
    pub fn raw_args(&self) -> &[String] {
        &self.raw_args
    }

    /// Bound argument values, one per declared argument (`null` when an
    /// optional argument was not given and has no default).
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }
}

/// How a parse ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The resolved command's action ran.
    Action,
    /// The resolved command had no action; its parent's observers ran.
    Observed,
    /// Unmatched operands were handed to an unknown-command listener.
    UnknownCommand,
    /// No handler; values were bound and returned.
    Parsed,
    /// An executable subcommand ran and exited with this code.
    Executed(i32),
}

/// Result of a successful parse: one [`ParsedCommand`] per level, root first.
#[derive(Debug, Clone)]
pub struct Matches {
    levels: Arc<[ParsedCommand]>,
    outcome: Outcome,
}

impl Matches {
    pub(crate) fn new(levels: Arc<[ParsedCommand]>, outcome: Outcome) -> Self {
        Self { levels, outcome }
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn levels(&self) -> &[ParsedCommand] {
        &self.levels
    }

    pub fn root(&self) -> &ParsedCommand {
        &self.levels[0]
    }

    /// The command the parse resolved to.
    pub fn leaf(&self) -> &ParsedCommand {
        &self.levels[self.levels.len() - 1]
    }

    /// Root option values.
    pub fn opts(&self) -> &OptionValues {
        self.root().opts()
    }

    /// Names of the invoked subcommands, root excluded.
    pub fn subcommand_path(&self) -> Vec<&str> {
        self.levels[1..].iter().map(|l| l.name()).collect()
    }

    /// The first level (from the root down) with this name.
    pub fn command(&self, name: &str) -> Option<&ParsedCommand> {
        self.levels.iter().find(|l| l.name == name)
    }

    /// Leaf option values with ancestors' values merged in; nearer wins.
    pub fn opts_with_globals(&self) -> OptionValues {
        merged(&self.levels)
    }
}

fn merged(levels: &[ParsedCommand]) -> OptionValues {
    let mut values = OptionValues::new();
    for level in levels.iter().rev() {
        values.fill_from(&level.options);
    }
    values
}

/// What a hook or action sees: the parse results, which level it is
/// registered on, and which level is the target (the command being
/// delegated to, or the command whose action runs).
#[derive(Debug, Clone)]
pub struct Invocation {
    levels: Arc<[ParsedCommand]>,
    focus: usize,
    target: usize,
}

impl Invocation {
    pub(crate) fn new(levels: Arc<[ParsedCommand]>, focus: usize, target: usize) -> Self {
        Self {
            levels,
            focus,
            target,
        }
    }

    /// The command the handler is registered on.
    pub fn command(&self) -> &ParsedCommand {
        &self.levels[self.focus]
    }

    /// The command whose action is running (same as [`command`](Self::command)
    /// for the action itself).
    pub fn action_command(&self) -> &ParsedCommand {
        &self.levels[self.target]
    }

    /// The subcommand being entered, for pre-subcommand hooks. It has not
    /// parsed yet: its raw args are the tokens handed down to it.
    pub fn subcommand(&self) -> &ParsedCommand {
        &self.levels[self.target]
    }

    pub fn opts(&self) -> &OptionValues {
        self.command().opts()
    }

    pub fn args(&self) -> &[Value] {
        self.command().args()
    }

    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.command().arg(index)
    }

    /// Option values of the focused command merged with its ancestors'.
    pub fn opts_with_globals(&self) -> OptionValues {
        merged(&self.levels[..=self.focus])
    }

    pub fn levels(&self) -> &[ParsedCommand] {
        &self.levels
    }

    /// Build an error that is reported like a parse error (message to the
    /// error sink, then the exit behavior).
    pub fn error(&self, message: impl Into<String>) -> anyhow::Error {
        CommandError::custom(message).into()
    }
}
