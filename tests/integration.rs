#![allow(clippy::expect_used, clippy::unwrap_used)]

use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Runs the hook with HOME and XDG_CONFIG_HOME pointed into `sandbox`.
fn run_gitpad(json: &str, sandbox: &Path) -> (String, String, i32) {
    let mut child = Command::new("cargo")
        .args(["run", "--quiet"])
        .env("HOME", sandbox.join("home"))
        .env("XDG_CONFIG_HOME", sandbox.join("xdg"))
        .env_remove("CLAUDE_WORKSPACE_DIR")
        .env_remove("GITPAD_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn");

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(json.as_bytes()).expect("failed to write");
    }

    let output = child.wait_with_output().expect("failed to wait");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

fn write_config(sandbox: &Path, content: &str) {
    let dir = sandbox.join("xdg/gitpad");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.yaml"), content).unwrap();
}

/// A fake gpg that leaves a marker behind and fails
#[cfg(unix)]
fn marker_gpg(sandbox: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    use std::os::unix::fs::PermissionsExt;

    let marker = sandbox.join("probed");
    let script = sandbox.join("fake-gpg");
    fs::write(
        &script,
        format!("#!/bin/sh\ntouch '{}'\nexit 1\n", marker.display()),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    (script, marker)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

#[test]
fn test_unknown_event_noop() {
    let sandbox = TempDir::new().unwrap();
    let json = r#"{"hook_event_name":"Stop","cwd":"/tmp","session_id":"test","transcript_path":"/tmp/t"}"#;
    let (stdout, _stderr, code) = run_gitpad(json, sandbox.path());

    assert_eq!(code, 0);
    assert!(stdout.is_empty(), "Unknown events should be no-op");
}

#[test]
fn test_invalid_json_fails() {
    let sandbox = TempDir::new().unwrap();
    let (stdout, _stderr, code) = run_gitpad("not valid json", sandbox.path());

    assert_ne!(code, 0, "Invalid JSON should cause non-zero exit");
    assert_ne!(code, 2, "Malformed input must not look like a block");
    assert!(stdout.is_empty());
}

#[test]
fn test_missing_event_name_fails() {
    let sandbox = TempDir::new().unwrap();
    let (_stdout, _stderr, code) = run_gitpad(r#"{"cwd":"/tmp"}"#, sandbox.path());

    assert_eq!(code, 1);
}

#[test]
fn test_prompt_outside_repo_blocks() {
    let sandbox = TempDir::new().unwrap();
    let json = r#"{"hook_event_name":"UserPromptSubmit","cwd":"/tmp/not-a-repo","session_id":"test","prompt":"hi"}"#;
    let (stdout, stderr, code) = run_gitpad(json, sandbox.path());

    assert_eq!(code, 2);
    assert!(
        stderr.contains("Not in a git repository"),
        "block reason should reach stderr: {stderr}"
    );
    let body: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(body["decision"], "block");
    assert_eq!(body["reason"], "Not in a git repository");
    assert_eq!(body["hookSpecificOutput"]["hookEventName"], "UserPromptSubmit");
    assert!(!sandbox.path().join("home/.claude").exists());
}

#[cfg(unix)]
#[test]
fn test_git_command_with_locked_key_denied() {
    let sandbox = TempDir::new().unwrap();
    let (script, marker) = marker_gpg(sandbox.path());
    write_config(
        sandbox.path(),
        &format!("gpg_program: '{}'\n", script.display()),
    );

    let json = r#"{"hook_event_name":"PreToolUse","cwd":"/tmp","session_id":"test","tool_name":"Bash","tool_input":{"command":"git commit -m x"}}"#;
    let (stdout, stderr, code) = run_gitpad(json, sandbox.path());

    assert_eq!(code, 2);
    assert!(marker.exists());
    assert!(stderr.contains("Unlock"));
    let body: Value = serde_json::from_str(&stdout).unwrap();
    let output = &body["hookSpecificOutput"];
    assert_eq!(output["hookEventName"], "PreToolUse");
    assert_eq!(output["permissionDecision"], "deny");
    assert!(output["permissionDecisionReason"]
        .as_str()
        .unwrap()
        .contains("Unlock"));
}

#[cfg(unix)]
#[test]
fn test_git_command_with_unlocked_key_continues() {
    let sandbox = TempDir::new().unwrap();
    write_config(sandbox.path(), "gpg_program: 'true'\n");

    let json = r#"{"hook_event_name":"PreToolUse","cwd":"/tmp","session_id":"test","tool_name":"Bash","tool_input":{"command":"git push"}}"#;
    let (stdout, _stderr, code) = run_gitpad(json, sandbox.path());

    assert_eq!(code, 0);
    assert!(stdout.is_empty());
}

#[cfg(unix)]
#[test]
fn test_non_git_command_skips_probe() {
    let sandbox = TempDir::new().unwrap();
    let (script, marker) = marker_gpg(sandbox.path());
    write_config(
        sandbox.path(),
        &format!("gpg_program: '{}'\n", script.display()),
    );

    let json = r#"{"hook_event_name":"PreToolUse","cwd":"/tmp","session_id":"test","tool_name":"Bash","tool_input":{"command":"ls -la"}}"#;
    let (stdout, _stderr, code) = run_gitpad(json, sandbox.path());

    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(!marker.exists(), "probe must not run for non-git commands");
}

#[test]
fn test_prompt_in_repo_injects_workspace() {
    if !git_available() {
        return;
    }
    let sandbox = TempDir::new().unwrap();
    let repo = sandbox.path().join("foo");
    fs::create_dir_all(&repo).unwrap();
    git(&repo, &["init", "-q"]);
    git(&repo, &["symbolic-ref", "HEAD", "refs/heads/feature-x"]);
    git(
        &repo,
        &[
            "-c",
            "user.name=test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "-q",
            "--allow-empty",
            "-m",
            "init",
        ],
    );

    let json = serde_json::json!({
        "hook_event_name": "UserPromptSubmit",
        "cwd": repo,
        "session_id": "test",
        "prompt": "hi",
    })
    .to_string();
    let (stdout, _stderr, code) = run_gitpad(&json, sandbox.path());

    assert_eq!(code, 0);
    let workspace = sandbox.path().join("home/.claude/workspace/foo/feature-x");
    assert!(workspace.is_dir());
    let body: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(body["hookSpecificOutput"]["hookEventName"], "UserPromptSubmit");
    assert!(body["hookSpecificOutput"]["additionalContext"]
        .as_str()
        .unwrap()
        .contains("feature-x"));

    // Second call resolves to the same place without error
    let (stdout_again, _stderr, code) = run_gitpad(&json, sandbox.path());
    assert_eq!(code, 0);
    assert_eq!(stdout, stdout_again);
}

#[test]
fn test_prompt_in_empty_repo_uses_placeholder() {
    if !git_available() {
        return;
    }
    let sandbox = TempDir::new().unwrap();
    let repo = sandbox.path().join("foo");
    fs::create_dir_all(&repo).unwrap();
    git(&repo, &["init", "-q"]);

    let json = serde_json::json!({
        "hook_event_name": "UserPromptSubmit",
        "cwd": repo,
        "session_id": "test",
        "prompt": "hi",
    })
    .to_string();
    let (stdout, _stderr, code) = run_gitpad(&json, sandbox.path());

    assert_eq!(code, 0);
    assert!(sandbox
        .path()
        .join("home/.claude/workspace/foo/detached")
        .is_dir());
    let body: Value = serde_json::from_str(&stdout).unwrap();
    assert!(body["hookSpecificOutput"]["additionalContext"]
        .as_str()
        .unwrap()
        .contains("detached"));
}
