//! The parse engine.
//!
//! A parse runs in two phases. Resolution walks the command tree level by
//! level: each level scans its tokens, applies environment and implied
//! values, then either delegates to a subcommand or settles on a terminal
//! (action, observers, unknown-command listeners, plain values, or an
//! executable subcommand). A delegating level runs its pre-subcommand hooks
//! before the subcommand scans anything, so they fire even when the
//! subcommand then fails or shows help.
//!
//! Dispatch then runs the handler plan: pre-action hooks, the action,
//! subcommand observers and post-action hooks.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use commandeer_exec::LaunchRequest;
use serde_json::Value;

use crate::command::DEFAULT_PROGRAM_NAME;
use crate::error::{CommandError, Error, ErrorCode};
use crate::flags::maybe_option;
use crate::help::{self, HelpTarget};
use crate::hooks::{Handler, HookEvent};
use crate::matches::{ArgvOrigin, Invocation, Matches, Outcome, ParseOptions, ParsedCommand};
use crate::option::OptRole;
use crate::resolver::{
    apply_env, apply_implied, apply_value, bind_arguments, check_conflicts, check_mandatory,
    initial_values, RawOrigin,
};
use crate::settings::{ExitBehavior, ShowHelpAfterError};
use crate::suggest::suggest_similar;
use crate::tokenizer::{Token, Tokenizer};
use crate::value::OptionValues;
use crate::Command;

/// Message carried by help exits.
const HELP_MESSAGE: &str = "(outputHelp)";

/// Where the engine is, for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    AtProgramLevel,
    ScanningOptions,
    CollectingPositional,
    DelegatingToSubcommand,
    PassThrough,
    TerminalAction,
    TerminalHelp,
    TerminalError,
}

/// Sync entry point: resolve, refuse async plans, run.
pub(crate) fn parse(root: &Command, argv: Vec<String>, options: &ParseOptions) -> Result<Matches, Error> {
    let mut run = ParseRun::new(root, argv, options, Mode::Sync);
    // Async pre-subcommand hooks are refused before they are polled, so
    // neither call ever blocks.
    let terminal = futures::executor::block_on(run.resolve())?;
    let plan = run.plan(terminal);
    if let Some(step) = plan.steps.iter().find(|s| s.handler.is_async()) {
        return Err(async_required(&run.levels[step.focus].name, step.label));
    }
    futures::executor::block_on(run.dispatch(plan))
}

pub(crate) async fn parse_async(
    root: &Command,
    argv: Vec<String>,
    options: &ParseOptions,
) -> Result<Matches, Error> {
    let mut run = ParseRun::new(root, argv, options, Mode::Async);
    let terminal = run.resolve().await?;
    let plan = run.plan(terminal);
    run.dispatch(plan).await
}

fn async_required(command: &str, label: &str) -> Error {
    tracing::debug!(event = label, "async handler reached through sync parse");
    Error::Command(CommandError::new(
        ErrorCode::AsyncRequired,
        1,
        format!("error: '{command}' has an async {label} handler; use parse_async"),
    ))
}

/// Whether the run may await async handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Sync,
    Async,
}

/// One command level of a parse.
struct Level<'c> {
    command: &'c Command,
    name: String,
    values: OptionValues,
    operands: Vec<String>,
    unknown: Vec<String>,
    args: Vec<Value>,
}

impl<'c> Level<'c> {
    fn new(command: &'c Command, name: String) -> Self {
        Self {
            command,
            name,
            values: OptionValues::new(),
            operands: Vec::new(),
            unknown: Vec::new(),
            args: Vec::new(),
        }
    }

    fn raw_args(&self) -> Vec<String> {
        self.operands.iter().chain(&self.unknown).cloned().collect()
    }
}

/// How resolution ended.
enum Terminal {
    Action,
    Observed,
    UnknownCommand,
    Parsed,
    /// The last level is an executable subcommand to launch with `args`.
    Executable { args: Vec<String> },
}

enum Next<'c> {
    Descend {
        child: &'c Command,
        operands: Vec<String>,
        unknown: Vec<String>,
    },
    Finish(Terminal),
}

struct Step {
    label: &'static str,
    handler: Handler,
    focus: usize,
    target: usize,
}

struct Plan {
    steps: Vec<Step>,
    launch: Option<LaunchRequest>,
    outcome: Outcome,
}

struct ParseRun<'c> {
    options: &'c ParseOptions,
    mode: Mode,
    script_path: Option<PathBuf>,
    root: &'c Command,
    root_name: String,
    user_args: Vec<String>,
    levels: Vec<Level<'c>>,
}

impl<'c> ParseRun<'c> {
    fn new(root: &'c Command, argv: Vec<String>, options: &'c ParseOptions, mode: Mode) -> Self {
        let mut argv = argv.into_iter();
        let script = match options.origin {
            ArgvOrigin::User => None,
            ArgvOrigin::Program => argv.next().map(PathBuf::from),
            ArgvOrigin::Interpreter => argv.nth(1).map(PathBuf::from),
        };
        let script_path = options.script_path.clone().or(script);

        let root_name = if root.get_name().is_empty() {
            script_path
                .as_deref()
                .and_then(Path::file_stem)
                .and_then(|stem| stem.to_str())
                .unwrap_or(DEFAULT_PROGRAM_NAME)
                .to_string()
        } else {
            root.get_name().to_string()
        };

        Self {
            options,
            mode,
            script_path,
            root,
            root_name,
            user_args: argv.collect(),
            levels: Vec::new(),
        }
    }

    fn enter(&self, state: ParseState) {
        tracing::trace!(?state, depth = self.levels.len(), "parse state");
    }

    fn current(&self) -> &'c Command {
        self.levels[self.levels.len() - 1].command
    }

    fn chain(&self) -> Vec<&'c Command> {
        self.levels.iter().map(|l| l.command).collect()
    }

    fn names(&self) -> Vec<String> {
        self.levels.iter().map(|l| l.name.clone()).collect()
    }

    // =========================================================================
    // Exit path
    // =========================================================================

    /// Apply `cmd`'s exit behavior. Only returns when the error is handed back.
    fn exit(&self, cmd: &Command, err: CommandError) -> Error {
        tracing::debug!(code = %err.code, exit_code = err.exit_code, "exit");
        match cmd.exit_setting() {
            ExitBehavior::Terminate => std::process::exit(err.exit_code),
            ExitBehavior::Return => Error::Command(err),
            ExitBehavior::Callback(callback) => match callback(&err) {
                Err(returned) => Error::Command(returned),
                Ok(()) => std::process::exit(err.exit_code),
            },
        }
    }

    /// Report an error on the level at `index`: message, optional help,
    /// then the exit behavior.
    fn fail_at(&self, index: usize, err: CommandError) -> Error {
        self.enter(ParseState::TerminalError);
        let cmd = self.levels[index].command;
        let output = cmd.output_config();
        output.error(&format!("{}\n", err.message));
        match cmd.help_after_error() {
            ShowHelpAfterError::Off => {}
            ShowHelpAfterError::Message(message) => output.err(&format!("{message}\n")),
            ShowHelpAfterError::Help => {
                output.err("\n");
                let chain: Vec<&Command> = self.levels[..=index].iter().map(|l| l.command).collect();
                let names: Vec<String> = self.levels[..=index].iter().map(|l| l.name.clone()).collect();
                let target = HelpTarget {
                    chain: &chain,
                    names: &names,
                };
                if let Err(help_err) = help::write_help(target, true) {
                    return Error::Callback(help_err.into());
                }
            }
        }
        self.exit(cmd, err)
    }

    fn fail(&self, err: CommandError) -> Error {
        self.fail_at(self.levels.len() - 1, err)
    }

    /// Route an error from a resolver or handler: categorized errors are
    /// reported, callback errors pass through.
    fn report(&self, err: Error) -> Error {
        match err {
            Error::Command(err) => self.fail(err),
            other => other,
        }
    }

    /// Write help for `chain` and exit: to the out sink with code 0, or to
    /// the error sink with code 1.
    fn show_help(&self, chain: &[&'c Command], names: &[String], to_err: bool) -> Error {
        self.enter(ParseState::TerminalHelp);
        let target = HelpTarget { chain, names };
        if let Err(help_err) = help::write_help(target, to_err) {
            return Error::Callback(help_err.into());
        }
        let err = if to_err {
            CommandError::new(ErrorCode::Help, 1, HELP_MESSAGE)
        } else {
            CommandError::new(ErrorCode::HelpDisplayed, 0, HELP_MESSAGE)
        };
        self.exit(chain[chain.len() - 1], err)
    }

    fn show_current_help(&self, to_err: bool) -> Error {
        self.show_help(&self.chain(), &self.names(), to_err)
    }

    fn help_if_requested(&self, unknown: &[String]) -> Result<(), Error> {
        let Some(help) = self.current().help_opt() else {
            return Ok(());
        };
        if unknown.iter().any(|arg| help.is(arg)) {
            return Err(self.show_current_help(false));
        }
        Ok(())
    }

    fn show_version(&self, cmd: &Command, version: &str) -> Error {
        cmd.output_config().out(&format!("{version}\n"));
        self.exit(cmd, CommandError::new(ErrorCode::Version, 0, version))
    }

    fn check_unknown_options(&self, unknown: &[String]) -> Result<(), Error> {
        let index = self.levels.len() - 1;
        let cmd = self.levels[index].command;
        let Some(flag) = unknown.first() else {
            return Ok(());
        };
        if cmd.allows_unknown_option() {
            return Ok(());
        }

        let mut suggestion = String::new();
        if flag.starts_with("--") && cmd.shows_suggestions() {
            // Ancestors' options are accepted here too, up to the first
            // ancestor that keeps its options positional.
            let mut candidates = Vec::new();
            let mut at = index;
            loop {
                candidates.extend(help::option_candidates(self.levels[at].command));
                if at == 0 {
                    break;
                }
                at -= 1;
                if self.levels[at].command.positional_options() {
                    break;
                }
            }
            suggestion = suggest_similar(flag, &candidates);
        }
        Err(self.fail(CommandError::new(
            ErrorCode::UnknownOption,
            1,
            format!("error: unknown option '{flag}'{suggestion}"),
        )))
    }

    fn unknown_command(&self, name: &str) -> Error {
        let cmd = self.current();
        let suggestion = if cmd.shows_suggestions() {
            suggest_similar(name, &help::command_candidates(cmd))
        } else {
            String::new()
        };
        self.fail(CommandError::new(
            ErrorCode::UnknownCommand,
            1,
            format!("error: unknown command '{name}'{suggestion}"),
        ))
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    async fn resolve(&mut self) -> Result<Terminal, Error> {
        let mut command = self.root;
        let mut name = self.root_name.clone();
        let mut operands = Vec::new();
        let mut unknown = std::mem::take(&mut self.user_args);

        loop {
            self.levels.push(Level::new(command, name));
            match self.parse_level(operands, unknown)? {
                Next::Descend {
                    child,
                    operands: child_operands,
                    unknown: child_unknown,
                } => {
                    let entering = ParsedCommand {
                        name: child.get_name().to_string(),
                        options: OptionValues::new(),
                        raw_args: child_operands.iter().chain(&child_unknown).cloned().collect(),
                        args: Vec::new(),
                    };
                    self.pre_subcommand(Some(entering)).await?;
                    command = child;
                    name = child.get_name().to_string();
                    operands = child_operands;
                    unknown = child_unknown;
                }
                Next::Finish(terminal) => {
                    if matches!(terminal, Terminal::Executable { .. }) {
                        self.pre_subcommand(None).await?;
                    }
                    return Ok(terminal);
                }
            }
        }
    }

    /// Run the pre-subcommand hooks of the level delegating to `entering`,
    /// or to the last level when it is already pushed (executables).
    async fn pre_subcommand(&self, entering: Option<ParsedCommand>) -> Result<(), Error> {
        let mut levels = self.parsed_levels().to_vec();
        levels.extend(entering);
        let levels: Arc<[ParsedCommand]> = levels.into();
        let focus = levels.len() - 2;

        for handler in self.levels[focus].command.hooks().get(HookEvent::PreSubcommand) {
            if self.mode == Mode::Sync && handler.is_async() {
                return Err(async_required(&levels[focus].name, "preSubcommand"));
            }
            tracing::debug!(
                command = %levels[focus].name,
                subcommand = %levels[focus + 1].name,
                "running preSubcommand hook"
            );
            let invocation = Invocation::new(Arc::clone(&levels), focus, focus + 1);
            if let Err(err) = handler.call(invocation).await {
                return Err(match Error::from_callback(err) {
                    Error::Command(err) => self.fail_at(focus, err),
                    other => other,
                });
            }
        }
        Ok(())
    }

    fn parse_level(&mut self, operands_in: Vec<String>, args: Vec<String>) -> Result<Next<'c>, Error> {
        let index = self.levels.len() - 1;
        let cmd = self.levels[index].command;
        self.enter(if index == 0 {
            ParseState::AtProgramLevel
        } else {
            ParseState::ScanningOptions
        });

        let mut values = initial_values(cmd.options(), cmd.programmatic_values());
        let (scanned, unknown) = self.scan(cmd, &mut values, args)?;
        apply_env(&mut values, cmd.options(), self.options.env.as_ref())
            .map_err(|e| self.report(e))?;
        apply_implied(&mut values, cmd.options());

        let mut operands = operands_in;
        operands.extend(scanned);
        {
            let level = &mut self.levels[index];
            level.values = values;
            level.operands = operands.clone();
            level.unknown = unknown.clone();
            tracing::debug!(command = %level.name, ?operands, ?unknown, "parsed level");
        }

        if let Some(first) = operands.first() {
            if let Some(child) = cmd.find_command(first) {
                return Ok(self.delegate(child, operands[1..].to_vec(), unknown));
            }
        }
        if let Some(help_command) = cmd.implicit_help_command() {
            if operands.first().map(String::as_str) == Some(help_command.name()) {
                return self.help_command(cmd, operands.get(1).cloned());
            }
        }
        if let Some(default) = cmd.default_command() {
            self.help_if_requested(&unknown)?;
            return Ok(self.delegate(default, operands, unknown));
        }
        if !cmd.commands().is_empty()
            && operands.is_empty()
            && unknown.is_empty()
            && cmd.action_handler().is_none()
        {
            return Err(self.show_current_help(true));
        }

        self.help_if_requested(&unknown)?;
        for level in self.levels.iter().rev() {
            check_mandatory(level.command.options(), &level.values).map_err(|e| self.fail(e))?;
        }
        for level in self.levels.iter().rev() {
            check_conflicts(level.command.options(), &level.values).map_err(|e| self.fail(e))?;
        }

        if cmd.action_handler().is_some() {
            self.check_unknown_options(&unknown)?;
            self.bind(index)?;
            self.enter(ParseState::TerminalAction);
            return Ok(Next::Finish(Terminal::Action));
        }

        let observed = index > 0
            && self.levels[index - 1]
                .command
                .observers_of(cmd.get_name())
                .next()
                .is_some();
        if observed {
            self.check_unknown_options(&unknown)?;
            self.bind(index)?;
            return Ok(Next::Finish(Terminal::Observed));
        }

        if let Some(first) = operands.first() {
            if let Some(star) = cmd.find_command("*") {
                return Ok(self.delegate(star, operands, unknown));
            }
            if !cmd.unknown_command_listeners().is_empty() {
                return Ok(Next::Finish(Terminal::UnknownCommand));
            }
            if !cmd.commands().is_empty() {
                return Err(self.unknown_command(first));
            }
            self.check_unknown_options(&unknown)?;
            self.bind(index)?;
            return Ok(Next::Finish(Terminal::Parsed));
        }

        if !cmd.commands().is_empty() {
            self.check_unknown_options(&unknown)?;
            return Err(self.show_current_help(true));
        }

        self.check_unknown_options(&unknown)?;
        self.bind(index)?;
        Ok(Next::Finish(Terminal::Parsed))
    }

    /// Scan one level's tokens. Returns `(operands, unknown)`.
    fn scan(
        &self,
        cmd: &'c Command,
        values: &mut OptionValues,
        args: Vec<String>,
    ) -> Result<(Vec<String>, Vec<String>), Error> {
        let positional = cmd.positional_options() || cmd.passes_through();
        let help_command = cmd.implicit_help_command();
        let mut operands = Vec::new();
        let mut unknown = Vec::new();
        let mut to_unknown = false;
        let mut tokens = Tokenizer::new(args);
        let mut active_variadic = None;

        loop {
            if let Some(opt) = active_variadic {
                if tokens.peek_raw().is_some_and(|raw| !maybe_option(raw)) {
                    let raw = tokens.next_raw();
                    apply_value(values, opt, raw.as_deref(), RawOrigin::Cli)
                        .map_err(|e| self.report(e))?;
                    continue;
                }
            }
            active_variadic = None;

            let Some(token) = tokens.next_token(cmd) else {
                break;
            };
            match token {
                Token::Terminator => {
                    if to_unknown {
                        unknown.push("--".to_string());
                        unknown.extend(tokens.drain());
                    } else {
                        operands.extend(tokens.drain());
                    }
                    break;
                }
                Token::Flag {
                    option,
                    inline,
                    exact,
                } => {
                    if let OptRole::Version(version) = &option.role {
                        return Err(self.show_version(cmd, version));
                    }
                    let raw = match inline {
                        Some(value) => Some(value),
                        None if exact && option.is_required() => match tokens.next_raw() {
                            Some(value) => Some(value),
                            None => {
                                return Err(self.fail(CommandError::new(
                                    ErrorCode::OptionMissingArgument,
                                    1,
                                    format!("error: option '{}' argument missing", option.flags()),
                                )))
                            }
                        },
                        None if exact && option.is_optional() => {
                            if tokens.peek_raw().is_some_and(|next| !maybe_option(next)) {
                                tokens.next_raw()
                            } else {
                                None
                            }
                        }
                        None => None,
                    };
                    apply_value(values, option, raw.as_deref(), RawOrigin::Cli)
                        .map_err(|e| self.report(e))?;
                    if exact && option.is_variadic() {
                        active_variadic = Some(option);
                    }
                }
                Token::Arg(arg) => {
                    if maybe_option(&arg) {
                        to_unknown = true;
                    }
                    if positional && operands.is_empty() && unknown.is_empty() {
                        if cmd.find_command(&arg).is_some() {
                            operands.push(arg);
                            unknown.extend(tokens.drain());
                            break;
                        }
                        if help_command.as_ref().is_some_and(|h| h.name() == arg) {
                            operands.push(arg);
                            operands.extend(tokens.drain());
                            break;
                        }
                        if cmd.default_command().is_some() {
                            unknown.push(arg);
                            unknown.extend(tokens.drain());
                            break;
                        }
                    }
                    let dest = if to_unknown { &mut unknown } else { &mut operands };
                    dest.push(arg);
                    if cmd.passes_through() {
                        self.enter(ParseState::PassThrough);
                        dest.extend(tokens.drain());
                        break;
                    }
                }
            }
        }
        Ok((operands, unknown))
    }

    fn delegate(&mut self, child: &'c Command, operands: Vec<String>, unknown: Vec<String>) -> Next<'c> {
        self.enter(ParseState::DelegatingToSubcommand);
        tracing::debug!(subcommand = child.get_name(), "delegating");
        if child.is_executable() {
            let mut args = operands;
            args.extend(unknown);
            let mut level = Level::new(child, child.get_name().to_string());
            level.operands = args.clone();
            self.levels.push(level);
            return Next::Finish(Terminal::Executable { args });
        }
        Next::Descend {
            child,
            operands,
            unknown,
        }
    }

    /// `help [command]`.
    fn help_command(&mut self, cmd: &'c Command, target: Option<String>) -> Result<Next<'c>, Error> {
        let Some(target) = target else {
            return Err(self.show_current_help(false));
        };
        match cmd.find_command(&target) {
            // The subcommand shows its own help, in process or as an executable.
            Some(child) => {
                let flag = cmd
                    .help_opt()
                    .and_then(|h| h.long().or(h.short()).map(str::to_string))
                    .unwrap_or_else(|| "--help".to_string());
                Ok(self.delegate(child, Vec::new(), vec![flag]))
            }
            None => Err(self.show_current_help(true)),
        }
    }

    fn bind(&mut self, index: usize) -> Result<(), Error> {
        self.enter(ParseState::CollectingPositional);
        let level = &self.levels[index];
        let label = (index > 0).then(|| level.name.clone());
        let args = bind_arguments(
            level.command.registered_arguments(),
            &level.raw_args(),
            level.command.allows_excess_arguments(),
            label.as_deref(),
        )
        .map_err(|e| self.report(e))?;
        self.levels[index].args = args;
        Ok(())
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    fn search_dir(&self, cmd: &Command) -> Option<PathBuf> {
        let script_dir = self.script_path.as_ref().and_then(|path| {
            let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
            resolved.parent().map(Path::to_path_buf)
        });
        match (script_dir, cmd.get_executable_dir()) {
            (Some(dir), Some(exe_dir)) => Some(dir.join(exe_dir)),
            (Some(dir), None) => Some(dir),
            (None, Some(exe_dir)) => Some(exe_dir.to_path_buf()),
            (None, None) => None,
        }
    }

    fn plan(&self, terminal: Terminal) -> Plan {
        let leaf = self.levels.len() - 1;
        let mut steps = Vec::new();

        let leaf_command = self.levels[leaf].command;
        let parent = leaf.checked_sub(1).map(|i| self.levels[i].command);
        let observer_steps = |steps: &mut Vec<Step>| {
            if let Some(parent) = parent {
                for handler in parent.observers_of(leaf_command.get_name()) {
                    steps.push(Step {
                        label: "subcommand observer",
                        handler: handler.clone(),
                        focus: leaf - 1,
                        target: leaf,
                    });
                }
            }
        };

        let mut launch = None;
        let outcome = match terminal {
            Terminal::Action => {
                let mut around = Vec::new();
                for focus in 0..=leaf {
                    for handler in self.levels[focus].command.hooks().get(HookEvent::PreAction) {
                        around.push((focus, handler.clone()));
                    }
                }
                for (focus, handler) in &around {
                    steps.push(Step {
                        label: "preAction",
                        handler: handler.clone(),
                        focus: *focus,
                        target: leaf,
                    });
                }
                if let Some(action) = leaf_command.action_handler() {
                    steps.push(Step {
                        label: "action",
                        handler: action.clone(),
                        focus: leaf,
                        target: leaf,
                    });
                }
                observer_steps(&mut steps);
                let mut post = Vec::new();
                for focus in 0..=leaf {
                    for handler in self.levels[focus].command.hooks().get(HookEvent::PostAction) {
                        post.push((focus, handler.clone()));
                    }
                }
                for (focus, handler) in post.into_iter().rev() {
                    steps.push(Step {
                        label: "postAction",
                        handler,
                        focus,
                        target: leaf,
                    });
                }
                Outcome::Action
            }
            Terminal::Observed => {
                observer_steps(&mut steps);
                Outcome::Observed
            }
            Terminal::UnknownCommand => {
                for handler in leaf_command.unknown_command_listeners() {
                    steps.push(Step {
                        label: "unknown command listener",
                        handler: handler.clone(),
                        focus: leaf,
                        target: leaf,
                    });
                }
                Outcome::UnknownCommand
            }
            Terminal::Parsed => Outcome::Parsed,
            Terminal::Executable { args } => {
                let parent_index = leaf - 1;
                let parent = &self.levels[parent_index];
                let mut request = LaunchRequest::new(parent.name.clone(), leaf_command.get_name())
                    .args(args);
                if let Some(file) = leaf_command.get_executable_file() {
                    request = request.executable_file(file);
                }
                if let Some(dir) = self.search_dir(parent.command) {
                    request = request.search_dir(dir);
                }
                if let Some(script) = &self.script_path {
                    request = request.script_path(script.clone());
                }
                launch = Some(request);
                Outcome::Executed(0)
            }
        };

        Plan {
            steps,
            launch,
            outcome,
        }
    }

    fn parsed_levels(&self) -> Arc<[ParsedCommand]> {
        self.levels
            .iter()
            .map(|level| ParsedCommand {
                name: level.name.clone(),
                options: level.values.clone(),
                raw_args: level.raw_args(),
                args: level.args.clone(),
            })
            .collect()
    }

    async fn dispatch(&self, plan: Plan) -> Result<Matches, Error> {
        let levels = self.parsed_levels();

        for step in &plan.steps {
            tracing::debug!(
                event = step.label,
                command = %levels[step.focus].name,
                "running handler"
            );
            let invocation = Invocation::new(Arc::clone(&levels), step.focus, step.target);
            if let Err(err) = step.handler.call(invocation).await {
                return Err(self.report(Error::from_callback(err)));
            }
        }

        if let Some(request) = plan.launch {
            let parent = self.levels.len() - 2;
            match self.options.launcher.launch(&request) {
                Ok(0) => {}
                Ok(code) => {
                    let err = CommandError::new(ErrorCode::ExecuteSubcommand, code, "(close)");
                    return Err(self.exit(self.levels[parent].command, err));
                }
                Err(launch_err) => {
                    let searched = match &request.search_dir {
                        Some(dir) => format!(
                            "searched for local subcommand relative to directory '{}'",
                            dir.display()
                        ),
                        None => "no directory to search for local subcommand, use executable_dir() to supply a custom directory".to_string(),
                    };
                    let hint = format!(
                        "\n - if the default executable name is not suitable, use executable_file() to supply a custom name or path\n - {searched}"
                    );
                    let err = CommandError::new(
                        ErrorCode::ExecuteSubcommand,
                        1,
                        format!("error: {}", launch_err.with_hint(hint)),
                    );
                    return Err(self.fail_at(parent, err));
                }
            }
        }

        Ok(Matches::new(levels, plan.outcome))
    }
}
