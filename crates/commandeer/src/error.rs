//! Error types.
//!
//! Three layers:
//!
//! - [`DeclarationError`]: the command tree itself is malformed. Raised by
//!   the registration builders (`add_option`, `subcommand`, ...), before any
//!   parsing happens.
//! - [`CommandError`]: the user typed something the tree rejects (or asked
//!   for help/version). Carries a stable [`ErrorCode`] and an exit code, and
//!   goes through the command's exit behavior.
//! - [`Error::Callback`]: user code (a coercion function, hook or action)
//!   failed with an error that is not one of ours. It is passed through
//!   untouched.

use std::fmt;

/// Stable identifiers for every categorized failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnknownOption,
    UnknownCommand,
    MissingArgument,
    OptionMissingArgument,
    MissingMandatoryOptionValue,
    ConflictingOption,
    ExcessArguments,
    InvalidArgument,
    /// Help was shown because the user asked for it. Exit code 0.
    HelpDisplayed,
    /// Help was shown because the invocation was incomplete.
    Help,
    /// The version was printed. Exit code 0.
    Version,
    /// An executable subcommand failed to start or exited non-zero.
    ExecuteSubcommand,
    /// An async hook or action was reached through the sync entry point.
    AsyncRequired,
    /// Raised explicitly by user code.
    Generic,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnknownOption => "unknown-option",
            ErrorCode::UnknownCommand => "unknown-command",
            ErrorCode::MissingArgument => "missing-argument",
            ErrorCode::OptionMissingArgument => "option-missing-argument",
            ErrorCode::MissingMandatoryOptionValue => "missing-mandatory-option-value",
            ErrorCode::ConflictingOption => "conflicting-option",
            ErrorCode::ExcessArguments => "excess-arguments",
            ErrorCode::InvalidArgument => "invalid-argument",
            ErrorCode::HelpDisplayed => "help-displayed",
            ErrorCode::Help => "help",
            ErrorCode::Version => "version",
            ErrorCode::ExecuteSubcommand => "execute-subcommand",
            ErrorCode::AsyncRequired => "async-required",
            ErrorCode::Generic => "error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A categorized parse or dispatch failure.
///
/// `message` is the full text written to the error sink, e.g.
/// `error: unknown option '--colour'`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CommandError {
    pub code: ErrorCode,
    pub exit_code: i32,
    pub message: String,
}

impl CommandError {
    pub fn new(code: ErrorCode, exit_code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            exit_code,
            message: message.into(),
        }
    }

    /// A user-raised error with exit code 1.
    ///
    /// Return it (through `anyhow`) from an action or hook to have it
    /// reported like any parse error:
    ///
    /// ```rust
    /// use commandeer::CommandError;
    /// let err: anyhow::Error = CommandError::custom("error: disk full").with_exit_code(28).into();
    /// # let _ = err;
    /// ```
    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Generic, 1, message)
    }

    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    /// True for the help/version outcomes that exit 0.
    pub fn is_informational(&self) -> bool {
        matches!(self.code, ErrorCode::HelpDisplayed | ErrorCode::Version)
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, 1, message)
    }
}

/// Error a coercion function returns to reject a value.
///
/// The parser prefixes the message with the option or argument context:
/// `error: option '-p, --port <n>' argument 'x' is invalid. Not a number.`
/// Any other error type returned by a coercion function is propagated as
/// [`Error::Callback`] instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidArgumentError(pub String);

impl InvalidArgumentError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Problems with the declared command tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclarationError {
    #[error("option flags '{flags}' are not valid: {reason}")]
    InvalidFlags { flags: String, reason: String },

    #[error("cannot add option '{flags}' due to conflicting flag '{flag}' - already used by option '{existing}'")]
    DuplicateFlag {
        flags: String,
        flag: String,
        existing: String,
    },

    #[error("cannot add option '{flags}': attribute '{attribute}' is already used by option '{existing}'")]
    DuplicateAttribute {
        flags: String,
        attribute: String,
        existing: String,
    },

    #[error("argument name must not be empty")]
    EmptyArgumentName,

    #[error("only the last argument can be variadic '{0}'")]
    VariadicNotLast(String),

    #[error("a default value for a required argument is never used: '{0}'")]
    DefaultOnRequiredArgument(String),

    #[error("command name must not be empty")]
    EmptyCommandName,

    #[error("cannot add command '{name}' as already have command '{existing}'")]
    DuplicateCommand { name: String, existing: String },

    #[error("command alias can't be the same as its name: '{0}'")]
    AliasSameAsName(String),

    #[error("cannot add default command '{name}': '{existing}' is already the default")]
    MultipleDefaultCommands { name: String, existing: String },

    #[error("pass-through options cannot be used for '{0}' without enabling positional options on its parent")]
    PassThroughWithoutPositional(String),

    #[error("executable command '{0}' cannot also have an action handler")]
    ExecutableWithAction(String),
}

/// Everything [`Command::parse`](crate::Command::parse) can fail with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A categorized failure that went through the exit behavior.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// An uncategorized error from user code, passed through unchanged.
    #[error(transparent)]
    Callback(anyhow::Error),
}

impl Error {
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Command(e) => Some(e.code),
            Error::Callback(_) => None,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Command(e) => e.exit_code,
            Error::Callback(_) => 1,
        }
    }

    pub fn as_command_error(&self) -> Option<&CommandError> {
        match self {
            Error::Command(e) => Some(e),
            Error::Callback(_) => None,
        }
    }

    /// Split an error coming back from user code: our own categorized
    /// errors stay categorized, everything else becomes a callback error.
    pub(crate) fn from_callback(err: anyhow::Error) -> Self {
        match err.downcast::<CommandError>() {
            Ok(e) => Error::Command(e),
            Err(other) => Error::Callback(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_error_defaults() {
        let err = CommandError::custom("error: boom");
        assert_eq!(err.code, ErrorCode::Generic);
        assert_eq!(err.exit_code, 1);
        assert_eq!(err.to_string(), "error: boom");
    }

    #[test]
    fn test_from_callback_keeps_command_errors() {
        let source: anyhow::Error = CommandError::custom("error: x").with_exit_code(7).into();
        let err = Error::from_callback(source);
        assert_eq!(err.code(), Some(ErrorCode::Generic));
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_from_callback_passes_other_errors_through() {
        let err = Error::from_callback(anyhow::anyhow!("io went away"));
        assert!(matches!(err, Error::Callback(_)));
        assert_eq!(err.to_string(), "io went away");
    }

    #[test]
    fn test_code_strings_are_stable() {
        assert_eq!(ErrorCode::UnknownOption.as_str(), "unknown-option");
        assert_eq!(ErrorCode::HelpDisplayed.to_string(), "help-displayed");
    }
}
