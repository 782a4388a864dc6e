//! Error types for launching executable subcommands.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while resolving or spawning an executable subcommand.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// Neither a local file nor a PATH entry matched the executable name.
    #[error("'{file}' does not exist{hint}")]
    NotFound {
        /// The file name or path that was looked up.
        file: String,
        /// Extra guidance appended to the message (may be empty).
        hint: String,
    },

    /// The file exists but the OS refused to execute it.
    #[error("'{}' not executable", .0.display())]
    NotExecutable(PathBuf),

    /// Spawning or waiting on the child failed for another reason.
    #[error("failed to run '{file}': {source}")]
    Spawn {
        file: String,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Create a not-found error without a hint.
    pub fn not_found(file: impl Into<String>) -> Self {
        Self::NotFound {
            file: file.into(),
            hint: String::new(),
        }
    }

    /// Attach guidance to a not-found error. Other variants are returned unchanged.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        match self {
            Self::NotFound { file, .. } => Self::NotFound {
                file,
                hint: hint.into(),
            },
            other => other,
        }
    }
}
