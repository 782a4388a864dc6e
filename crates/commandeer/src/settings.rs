//! Inheritable command configuration: output sinks, exit behavior, help
//! presentation and parsing modes.
//!
//! Every setting is stored as `Option<_>` on the command. When a subcommand
//! is attached, its unset settings are filled from the parent (recursively
//! through the subcommand's own children). Settings the subcommand
//! configured itself are kept. Changing the parent afterwards does not
//! reach already attached children.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::CommandError;
use crate::factory::ComponentFactory;

pub type WriteFn = Arc<dyn Fn(&str) + Send + Sync>;
/// `(message, write)`: writes an error message, usually by calling `write`.
pub type OutputErrorFn = Arc<dyn Fn(&str, &dyn Fn(&str)) + Send + Sync>;
/// Called with every categorized failure when the exit behavior is
/// [`ExitBehavior::Callback`]. Returning `Err` hands that error back to the
/// caller of `parse`; returning `Ok` terminates the process.
pub type ExitCallback = Arc<dyn Fn(&CommandError) -> Result<(), CommandError> + Send + Sync>;

/// Where parser output goes.
#[derive(Clone)]
pub struct OutputConfig {
    write_out: WriteFn,
    write_err: WriteFn,
    output_error: OutputErrorFn,
    out_help_width: Option<usize>,
    err_help_width: Option<usize>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            write_out: Arc::new(|s| print!("{s}")),
            write_err: Arc::new(|s| eprint!("{s}")),
            output_error: Arc::new(|message, write| write(message)),
            out_help_width: None,
            err_help_width: None,
        }
    }
}

impl OutputConfig {
    pub fn write_out<F: Fn(&str) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.write_out = Arc::new(f);
        self
    }

    pub fn write_err<F: Fn(&str) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.write_err = Arc::new(f);
        self
    }

    pub fn output_error<F: Fn(&str, &dyn Fn(&str)) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.output_error = Arc::new(f);
        self
    }

    /// Wrap width for help written to the out sink.
    pub fn out_help_width(mut self, width: usize) -> Self {
        self.out_help_width = Some(width);
        self
    }

    /// Wrap width for help written to the error sink.
    pub fn err_help_width(mut self, width: usize) -> Self {
        self.err_help_width = Some(width);
        self
    }

    /// Send both sinks into a shared in-memory buffer pair.
    pub fn capture() -> (Self, CapturedOutput) {
        let captured = CapturedOutput::default();
        let out = Arc::clone(&captured.out);
        let err = Arc::clone(&captured.err);
        let config = Self::default()
            .write_out(move |s| push(&out, s))
            .write_err(move |s| push(&err, s));
        (config, captured)
    }

    pub(crate) fn out(&self, s: &str) {
        (self.write_out)(s)
    }

    pub(crate) fn err(&self, s: &str) {
        (self.write_err)(s)
    }

    pub(crate) fn error(&self, message: &str) {
        let write_err = &self.write_err;
        (self.output_error)(message, &|s: &str| write_err(s))
    }

    pub(crate) fn help_width(&self, to_err: bool) -> Option<usize> {
        if to_err {
            self.err_help_width
        } else {
            self.out_help_width
        }
    }
}

impl fmt::Debug for OutputConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputConfig")
            .field("out_help_width", &self.out_help_width)
            .field("err_help_width", &self.err_help_width)
            .finish_non_exhaustive()
    }
}

fn push(buffer: &Mutex<String>, s: &str) {
    if let Ok(mut guard) = buffer.lock() {
        guard.push_str(s);
    }
}

/// In-memory output produced by [`OutputConfig::capture`].
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    out: Arc<Mutex<String>>,
    err: Arc<Mutex<String>>,
}

impl CapturedOutput {
    pub fn out(&self) -> String {
        self.out.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn err(&self) -> String {
        self.err.lock().map(|g| g.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut g) = self.out.lock() {
            g.clear();
        }
        if let Ok(mut g) = self.err.lock() {
            g.clear();
        }
    }
}

/// What happens after a categorized failure (or help/version) is reported.
#[derive(Clone, Default)]
pub enum ExitBehavior {
    /// Terminate the process with the error's exit code.
    #[default]
    Terminate,
    /// Return the error from `parse`.
    Return,
    /// Hand the error to a callback.
    Callback(ExitCallback),
}

impl fmt::Debug for ExitBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitBehavior::Terminate => f.write_str("Terminate"),
            ExitBehavior::Return => f.write_str("Return"),
            ExitBehavior::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Extra output after an error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ShowHelpAfterError {
    #[default]
    Off,
    /// The full help of the failing command.
    Help,
    /// A fixed hint line, e.g. `(add --help for additional information)`.
    Message(String),
}

/// Help layout options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpConfig {
    pub sort_subcommands: bool,
    pub sort_options: bool,
    /// List ancestors' options in a `Global Options` section.
    pub show_global_options: bool,
    /// Fixed wrap width, overriding sink widths and terminal detection.
    pub help_width: Option<usize>,
}

/// The built-in help flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpOptionConfig {
    Enabled { flags: String, description: String },
    Disabled,
}

impl Default for HelpOptionConfig {
    fn default() -> Self {
        HelpOptionConfig::Enabled {
            flags: "-h, --help".to_string(),
            description: "display help for command".to_string(),
        }
    }
}

/// When the `help [command]` subcommand is synthesized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HelpCommandMode {
    /// When the command has subcommands, no action and no own `help` child.
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpCommandConfig {
    pub mode: HelpCommandMode,
    /// Name and argument spec, e.g. `help [command]`.
    pub name_and_args: String,
    pub description: String,
}

impl Default for HelpCommandConfig {
    fn default() -> Self {
        Self {
            mode: HelpCommandMode::Auto,
            name_and_args: "help [command]".to_string(),
            description: "display help for command".to_string(),
        }
    }
}

impl HelpCommandConfig {
    pub fn name(&self) -> &str {
        self.name_and_args
            .split_whitespace()
            .next()
            .unwrap_or("help")
    }
}

#[derive(Clone, Default)]
pub(crate) struct Settings {
    pub output: Option<OutputConfig>,
    pub exit: Option<ExitBehavior>,
    pub help_config: Option<HelpConfig>,
    pub help_option: Option<HelpOptionConfig>,
    pub help_command: Option<HelpCommandConfig>,
    pub combine_flag_and_optional_value: Option<bool>,
    pub allow_excess_arguments: Option<bool>,
    pub enable_positional_options: Option<bool>,
    pub show_help_after_error: Option<ShowHelpAfterError>,
    pub show_suggestion_after_error: Option<bool>,
    pub factory: Option<Arc<dyn ComponentFactory>>,
}

macro_rules! inherit {
    ($self:ident, $parent:ident, $($field:ident),+ $(,)?) => {
        $(
            if $self.$field.is_none() {
                $self.$field = $parent.$field.clone();
            }
        )+
    };
}

impl Settings {
    pub fn inherit_from(&mut self, parent: &Settings) {
        inherit!(
            self,
            parent,
            output,
            exit,
            help_config,
            help_option,
            help_command,
            combine_flag_and_optional_value,
            allow_excess_arguments,
            enable_positional_options,
            show_help_after_error,
            show_suggestion_after_error,
            factory,
        );
    }
}
