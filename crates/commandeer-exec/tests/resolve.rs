//! Directory search and spawning behavior of `ProcessLauncher`.

use std::fs;

use commandeer_exec::{LaunchError, LaunchRequest, Launcher, ProcessLauncher, Resolved};

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_finds_exact_file_in_search_dir() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("pm-install");
    fs::write(&file, "").unwrap();

    let request = LaunchRequest::new("pm", "install").search_dir(dir.path());
    let resolved = ProcessLauncher::new().resolve(&request);

    assert_eq!(resolved, Resolved::Local(file));
}

#[test]
fn test_finds_file_with_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("pm-install.sh");
    fs::write(&file, "").unwrap();

    let request = LaunchRequest::new("pm", "install").search_dir(dir.path());
    let resolved = ProcessLauncher::new().resolve(&request);

    assert_eq!(resolved, Resolved::Local(file));
}

#[test]
fn test_custom_suffixes_replace_defaults() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("pm-install.sh"), "").unwrap();

    let request = LaunchRequest::new("pm", "install").search_dir(dir.path());
    let resolved = ProcessLauncher::new()
        .with_suffixes([".cmd"])
        .resolve(&request);

    assert_eq!(resolved, Resolved::Path("pm-install".into()));
}

#[test]
fn test_missing_local_file_falls_back_to_path_name() {
    let dir = tempfile::tempdir().unwrap();

    let request = LaunchRequest::new("pm", "sub").search_dir(dir.path());
    let resolved = ProcessLauncher::new().resolve(&request);

    assert_eq!(resolved, Resolved::Path("pm-sub".into()));
}

#[test]
fn test_script_stem_is_tried_as_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("pm-cli-install");
    fs::write(&file, "").unwrap();

    let request = LaunchRequest::new("pm", "install")
        .search_dir(dir.path())
        .script_path(dir.path().join("pm-cli.sh"));
    let resolved = ProcessLauncher::new().resolve(&request);

    assert_eq!(resolved, Resolved::Local(file));
}

#[test]
fn test_executable_file_override_is_searched() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("installer");
    fs::write(&file, "").unwrap();

    let request = LaunchRequest::new("pm", "install")
        .executable_file("installer")
        .search_dir(dir.path());
    let resolved = ProcessLauncher::new().resolve(&request);

    assert_eq!(resolved, Resolved::Local(file));
}

// =============================================================================
// Spawning
// =============================================================================

#[test]
fn test_launch_missing_program_is_not_found() {
    let request = LaunchRequest::new("commandeer-test-no-such-program", "sub");
    let err = ProcessLauncher::new().launch(&request).unwrap_err();

    assert!(matches!(err, LaunchError::NotFound { .. }));
    assert!(err.to_string().contains("commandeer-test-no-such-program-sub"));
}

#[cfg(unix)]
#[test]
fn test_launch_forwards_exit_code() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("pm-fail");
    fs::write(&file, "#!/bin/sh\nexit 3\n").unwrap();
    fs::set_permissions(&file, fs::Permissions::from_mode(0o755)).unwrap();

    let request = LaunchRequest::new("pm", "fail").search_dir(dir.path());
    let code = ProcessLauncher::new().launch(&request).unwrap();

    assert_eq!(code, 3);
}

#[cfg(unix)]
#[test]
fn test_launch_non_executable_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("pm-noexec");
    fs::write(&file, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();

    let request = LaunchRequest::new("pm", "noexec").search_dir(dir.path());
    let err = ProcessLauncher::new().launch(&request).unwrap_err();

    assert!(matches!(err, LaunchError::NotExecutable(_)));
}
