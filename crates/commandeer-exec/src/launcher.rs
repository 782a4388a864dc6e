use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::LaunchError;

/// Everything needed to run one executable subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Name of the dispatching (parent) command, e.g. `pm`.
    pub program_name: String,
    /// Name of the subcommand being launched, e.g. `install`.
    pub subcommand: String,
    /// Explicit file name or path overriding `<program>-<subcommand>`.
    pub executable_file: Option<String>,
    /// Directory searched for a local executable before falling back to PATH.
    pub search_dir: Option<PathBuf>,
    /// Script path the program was started from, when known.
    ///
    /// Its stem is tried as an alternative program prefix when it differs
    /// from `program_name`.
    pub script_path: Option<PathBuf>,
    /// Tokens forwarded to the child.
    pub args: Vec<String>,
}

impl LaunchRequest {
    pub fn new(program_name: impl Into<String>, subcommand: impl Into<String>) -> Self {
        Self {
            program_name: program_name.into(),
            subcommand: subcommand.into(),
            executable_file: None,
            search_dir: None,
            script_path: None,
            args: Vec::new(),
        }
    }

    pub fn executable_file(mut self, file: impl Into<String>) -> Self {
        self.executable_file = Some(file.into());
        self
    }

    pub fn search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    pub fn script_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.script_path = Some(path.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// The file name the child is looked up by: the explicit override, or
    /// `<program>-<subcommand>`.
    pub fn command_file(&self) -> String {
        self.executable_file
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.program_name, self.subcommand))
    }
}

/// Where a request resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A file found in the search directory.
    Local(PathBuf),
    /// A bare name to be looked up on PATH when spawning.
    Path(String),
}

impl Resolved {
    pub fn display_name(&self) -> String {
        match self {
            Resolved::Local(path) => path.display().to_string(),
            Resolved::Path(name) => name.clone(),
        }
    }
}

/// Runs executable subcommands and reports their exit status.
///
/// The engine only talks to this trait, so tests can substitute a recorder.
pub trait Launcher: Send + Sync {
    /// Run the subcommand to completion and return its exit code.
    fn launch(&self, request: &LaunchRequest) -> Result<i32, LaunchError>;
}

/// Launcher that spawns real processes with inherited stdio.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    suffixes: Vec<String>,
}

/// Suffixes tried after the bare name when searching a directory.
pub const DEFAULT_SUFFIXES: &[&str] = &[".exe", ".sh", ".py", ".js"];

impl Default for ProcessLauncher {
    fn default() -> Self {
        Self {
            suffixes: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the suffix candidates used for directory search.
    pub fn with_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve a request to a local file or a bare PATH name.
    ///
    /// The search directory is consulted first (exact name, then each
    /// suffix). When the program was started from a script whose stem
    /// differs from the program name, `<stem>-<subcommand>` is tried too.
    pub fn resolve(&self, request: &LaunchRequest) -> Resolved {
        let file = request.command_file();
        if let Some(dir) = &request.search_dir {
            if let Some(found) = self.find_file(dir, &file) {
                return Resolved::Local(found);
            }
            if request.executable_file.is_none() {
                let legacy = request
                    .script_path
                    .as_deref()
                    .and_then(Path::file_stem)
                    .and_then(|stem| stem.to_str())
                    .filter(|stem| *stem != request.program_name);
                if let Some(stem) = legacy {
                    let alt = format!("{}-{}", stem, request.subcommand);
                    if let Some(found) = self.find_file(dir, &alt) {
                        return Resolved::Local(found);
                    }
                }
            }
        }
        Resolved::Path(file)
    }

    fn find_file(&self, dir: &Path, name: &str) -> Option<PathBuf> {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        let has_known_suffix = self.suffixes.iter().any(|s| name.ends_with(s.as_str()));
        if has_known_suffix {
            return None;
        }
        self.suffixes
            .iter()
            .map(|suffix| dir.join(format!("{name}{suffix}")))
            .find(|path| path.is_file())
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<i32, LaunchError> {
        let resolved = self.resolve(request);
        let program = match &resolved {
            Resolved::Local(path) => path.clone(),
            Resolved::Path(name) => {
                which::which(name).map_err(|_| LaunchError::not_found(name.clone()))?
            }
        };
        tracing::debug!(program = %program.display(), args = ?request.args, "spawning subcommand");

        let status = Command::new(&program)
            .args(&request.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => LaunchError::not_found(resolved.display_name()),
                io::ErrorKind::PermissionDenied => LaunchError::NotExecutable(program.clone()),
                _ => LaunchError::Spawn {
                    file: resolved.display_name(),
                    source: e,
                },
            })?;

        // Killed by a signal: no code, report a generic failure.
        Ok(status.code().unwrap_or(1))
    }
}
