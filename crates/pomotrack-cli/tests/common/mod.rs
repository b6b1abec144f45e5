//! Common utilities for CLI E2E tests.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Invoke the CLI with `args`, feeding `stdin`, using `config_dir` for
/// configuration. Returns (stdout, stderr, exit code).
pub fn run_cli(config_dir: &Path, args: &[&str], stdin: &str) -> (String, String, i32) {
    run_cli_with_env(config_dir, args, stdin, &[])
}

/// Like [`run_cli`], with extra environment variables. `RUST_LOG` is
/// cleared unless given here.
#[allow(dead_code)]
pub fn run_cli_with_env(
    config_dir: &Path,
    args: &[&str],
    stdin: &str,
    vars: &[(&str, &str)],
) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pomotrack"))
        .args(args)
        .env("POMOTRACK_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .envs(vars.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Invoke the CLI and expect success.
pub fn run_cli_success(config_dir: &Path, args: &[&str], stdin: &str) -> String {
    let (stdout, stderr, code) = run_cli(config_dir, args, stdin);
    assert_eq!(code, 0, "CLI command failed: {args:?}\nstderr: {stderr}");
    stdout
}

/// Check if string contains substring
pub fn assert_contains(haystack: &str, needle: &str) {
    assert!(
        haystack.contains(needle),
        "Expected '{}' to contain '{}'",
        haystack,
        needle
    );
}
