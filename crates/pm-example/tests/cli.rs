//! Runs the built `pm` binaries end to end.

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

fn pm(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pm"))
        .args(args)
        .env_remove("PM_MANIFEST")
        .output()
        .unwrap()
}

fn manifest(content: &str) -> (TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pm.json");
    fs::write(&path, content).unwrap();
    let path = path.to_string_lossy().into_owned();
    (dir, path)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_list_reads_manifest() {
    let (_dir, path) = manifest(r#"{"dependencies": {"lodash": "4.17.21", "left-pad": "1.3.0"}}"#);

    let output = pm(&["-m", &path, "ls", "-l"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "left-pad@1.3.0\nlodash@4.17.21\n");
}

#[test]
fn test_manifest_from_environment() {
    let (_dir, path) = manifest(r#"{"dependencies": {"left-pad": "1.3.0"}}"#);

    let output = Command::new(env!("CARGO_BIN_EXE_pm"))
        .arg("list")
        .env("PM_MANIFEST", &path)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "left-pad\n");
}

#[test]
fn test_empty_manifest_is_an_error() {
    let (_dir, path) = manifest(r#"{"dependencies": {}}"#);

    let output = pm(&["-m", &path, "list"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: no dependencies in"));
}

#[test]
fn test_install_runs_executable_subcommand() {
    let output = pm(&["install", "left-pad", "lodash", "-S"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "installing left-pad, lodash (saved)\n");
}

#[test]
fn test_install_exit_code_is_forwarded() {
    // pm-install rejects a call without packages.
    let output = pm(&["install"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: missing required argument 'pkg'"));
}

#[test]
fn test_unknown_command_suggests() {
    let output = pm(&["lsit"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("error: unknown command 'lsit'\n(Did you mean list?)\n"));
    assert!(err.contains("(add --help for additional information)"));
}

#[test]
fn test_version() {
    let output = pm(&["--version"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), format!("{}\n", env!("CARGO_PKG_VERSION")));
}
