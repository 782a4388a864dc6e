//! # Commandeer - Command Trees for CLI Applications
//!
//! Commandeer parses an argument vector against a declared tree of commands
//! and dispatches to the handler of the command it resolves to. It provides:
//!
//! - Flag grammar with short/long flags, required/optional/variadic values
//!   and `--no-` negation
//! - Value precedence: command line, environment, implied, preset, default
//! - Coercion functions that can accumulate across repeated flags
//! - Nested subcommands with aliases, a default subcommand and executable
//!   subcommands run as separate programs
//! - Positional-options and pass-through modes
//! - Lifecycle hooks (sync or async) around actions
//! - Generated help, version flag and "did you mean" suggestions
//!
//! ## Core Concepts
//!
//! - [`Command`]: a node of the tree, built by value
//! - [`Opt`] and [`Argument`]: option and positional declarations
//! - [`Matches`]: per-level values and arguments after a parse
//! - [`Invocation`]: what hooks and actions receive
//! - [`CommandError`]: categorized failures with stable [`ErrorCode`]s
//! - [`ExitBehavior`]: terminate the process (default) or return errors
//!
//! ## Quick Start
//!
//! ```rust
//! use commandeer::{program, Command, ParseOptions};
//!
//! let pm = program()
//!     .name("pm")
//!     .exit_override()
//!     .option("-d, --debug", "output extra debugging").unwrap()
//!     .subcommand(
//!         Command::new("install")
//!             .argument("<pkg...>", "packages to install").unwrap()
//!             .option("-S, --save", "save to dependencies").unwrap(),
//!     )
//!     .unwrap();
//!
//! let matches = pm
//!     .parse(["-d", "install", "left-pad", "-S"], ParseOptions::user())
//!     .unwrap();
//! assert_eq!(matches.subcommand_path(), ["install"]);
//! assert_eq!(matches.opts().get_as::<bool>("debug"), Some(true));
//! assert_eq!(matches.leaf().opts().get_as::<bool>("save"), Some(true));
//! ```
//!
//! ## Errors and Exit
//!
//! Every parse failure carries an [`ErrorCode`] and an exit code. By default
//! the message is written to stderr and the process exits; with
//! [`Command::exit_override`] the error is returned from `parse` instead:
//!
//! ```rust
//! use commandeer::{program, ErrorCode, OutputConfig, ParseOptions};
//!
//! let (output, captured) = OutputConfig::capture();
//! let cmd = program().name("x").configure_output(output).exit_override();
//!
//! let err = cmd.parse(["--colour"], ParseOptions::user()).unwrap_err();
//! assert_eq!(err.code(), Some(ErrorCode::UnknownOption));
//! assert_eq!(captured.err(), "error: unknown option '--colour'\n");
//! ```
//!
//! ## Async Handlers
//!
//! [`Command::parse`] refuses to run a pipeline containing async hooks or
//! actions; use [`Command::parse_async`] for those.

mod argument;
mod command;
mod dual;
mod engine;
mod env;
mod error;
mod factory;
mod flags;
mod help;
mod hooks;
mod matches;
mod option;
mod resolver;
mod settings;
mod suggest;
mod tokenizer;
mod value;

pub use argument::Argument;
pub use command::{program, Command};
pub use env::{EnvReader, MockEnv, RealEnv};
pub use error::{CommandError, DeclarationError, Error, ErrorCode, InvalidArgumentError};
pub use factory::{ComponentFactory, DefaultFactory, HelpFormatter, TemplateHelp};
pub use flags::Arity;
pub use help::HelpTextPosition;
pub use hooks::{AsyncHandlerFn, Handler, HookEvent, Hooks, SyncHandlerFn};
pub use matches::{ArgvOrigin, Invocation, Matches, Outcome, ParseOptions, ParsedCommand};
pub use option::{CoerceFn, Opt};
pub use settings::{
    CapturedOutput, ExitBehavior, ExitCallback, HelpCommandConfig, HelpCommandMode, HelpConfig,
    HelpOptionConfig, OutputConfig, OutputErrorFn, ShowHelpAfterError, WriteFn,
};
pub use value::{OptionValues, ValueSource};

pub use commandeer_exec::{LaunchError, LaunchRequest, Launcher, ProcessLauncher};
pub use commandeer_help::{HelpData, HelpEntry, HelpError, RenderConfig};
