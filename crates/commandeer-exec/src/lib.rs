//! # commandeer-exec - Executable subcommands
//!
//! Looks up and runs subcommands implemented as separate programs. A program
//! `pm` with an executable subcommand `install` runs `pm-install`, found
//! either in a search directory (usually the directory of the running
//! program) or on `PATH`.
//!
//! ```rust,ignore
//! use commandeer_exec::{LaunchRequest, Launcher, ProcessLauncher};
//!
//! let request = LaunchRequest::new("pm", "install")
//!     .search_dir("/opt/pm/bin")
//!     .args(["left-pad", "--save"]);
//! let code = ProcessLauncher::new().launch(&request)?;
//! ```
//!
//! The child inherits stdio. Only its exit code flows back; signals are not
//! forwarded.

mod error;
mod launcher;

pub use error::LaunchError;
pub use launcher::{LaunchRequest, Launcher, ProcessLauncher, Resolved, DEFAULT_SUFFIXES};
