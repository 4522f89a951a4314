use std::process::Command;

use tempfile::TempDir;

/// Binary with a session file private to `dir`, away from the home directory.
fn edu(dir: &TempDir) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_edu"));
    command.env("EDU_SESSION_FILE", dir.path().join("session.json"));
    command
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    let output = edu(&dir)
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success(), "Version flag should exit with code 0");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version_part = stdout.trim().strip_prefix("edu ").unwrap_or("");
    assert_eq!(version_part, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let output = edu(&dir).arg("--help").output().expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["login", "logout", "whoami", "get", "stream", "guard"] {
        assert!(stdout.contains(command), "usage should mention {}", command);
    }
}

#[test]
fn test_unknown_command_exits_with_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = edu(&dir).arg("frobnicate").output().expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown command 'frobnicate'"));
}

#[test]
fn test_whoami_with_fresh_session_file_is_signed_out() {
    let dir = TempDir::new().unwrap();
    let output = edu(&dir).arg("whoami").output().expect("Failed to execute binary");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Not signed in");
}

#[test]
fn test_guard_without_session_redirects_to_login() {
    let dir = TempDir::new().unwrap();
    let output = edu(&dir)
        .args(["guard", "/courses/new"])
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "redirect /login");
}
