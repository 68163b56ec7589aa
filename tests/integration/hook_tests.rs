//! End-to-end tests driving the hook binary over stdin

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

struct Hook {
    dir: TempDir,
    config: PathBuf,
}

impl Hook {
    fn new() -> Self {
        Self::with_general("")
    }

    fn with_general(extra: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(
            &config,
            format!(
                "[general]\naudit_log = true\naudit_path = '{}'\n{}\n\n[state]\ndir = '{}'\n\n[overrides]\nallowlist_file = '{}'\n",
                dir.path().join("audit.jsonl").display(),
                extra,
                dir.path().join("state").display(),
                dir.path().join("allow.toml").display(),
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn run(&self, stdin: &str) -> Output {
        self.run_with(stdin, &[], &[])
    }

    fn run_with(&self, stdin: &str, args: &[&str], envs: &[(&str, &str)]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_claude-security-guard"));
        cmd.arg("--config")
            .arg(&self.config)
            .args(args)
            .env_remove("ENABLE_SECURITY_REMINDER")
            .env_remove("SECURITY_GUARD_WARN_ONLY")
            .env_remove("SECURITY_GUARD_STATE_DIR")
            .env_remove("SECURITY_GUARD_LOG")
            .env_remove("CLAUDE_SESSION_ID")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in envs {
            cmd.env(key, value);
        }

        let mut child = cmd.spawn().expect("spawn hook");
        child
            .stdin
            .take()
            .unwrap()
            .write_all(stdin.as_bytes())
            .unwrap();
        child.wait_with_output().expect("hook output")
    }

    fn state_dir(&self) -> &Path {
        self.dir.path()
    }
}

fn write_event(session: &str, file_path: &str, content: &str) -> String {
    serde_json::json!({
        "session_id": session,
        "hook_event_name": "PreToolUse",
        "tool_name": "Write",
        "tool_input": { "file_path": file_path, "content": content },
    })
    .to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_block_then_allow() {
    let hook = Hook::new();
    let event = write_event("sess-1", "a.ts", "localStorage.setItem('authToken', t)");

    let first = hook.run(&event);
    assert_eq!(first.status.code(), Some(2));
    let text = stderr(&first);
    assert!(text.contains("[security-guard:local-storage-sensitive-data]"));
    assert!(text.contains("localStorage"));

    let second = hook.run(&event);
    assert_eq!(second.status.code(), Some(0));
    assert!(second.stderr.is_empty());

    let state_files: Vec<_> = std::fs::read_dir(hook.state_dir().join("state"))
        .unwrap()
        .flatten()
        .collect();
    assert_eq!(state_files.len(), 1);
}

#[test]
fn test_combined_message() {
    let hook = Hook::new();
    let output = hook.run(&write_event("sess-1", "page.js", "eval(a); document.write(b);"));
    assert_eq!(output.status.code(), Some(2));

    let text = stderr(&output);
    let eval_at = text.find("[security-guard:eval-injection]").unwrap();
    let write_at = text.find("[security-guard:document-write-xss]").unwrap();
    assert!(eval_at < write_at);
}

#[test]
fn test_malformed_input_allows() {
    let hook = Hook::new();
    for input in ["", "   ", "{not json", r#"{"tool_input":{"file_path":"a.js"}}"#, "[1,2,3]"] {
        let output = hook.run(input);
        assert_eq!(output.status.code(), Some(0), "input {:?}", input);
    }
}

#[test]
fn test_env_switch_disables() {
    let hook = Hook::new();
    let event = write_event("sess-1", "a.js", "eval(x)");

    let output = hook.run_with(&event, &[], &[("ENABLE_SECURITY_REMINDER", "0")]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty());
    assert!(!hook.state_dir().join("state").exists());

    // Still unwarned once re-enabled
    assert_eq!(hook.run(&event).status.code(), Some(2));
}

#[test]
fn test_dry_run_warns_without_blocking() {
    let hook = Hook::new();
    let output = hook.run_with(&write_event("sess-1", "a.py", "import pickle"), &["--dry-run"], &[]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("pickle-deserialization"));
}

#[test]
fn test_session_id_from_environment() {
    let hook = Hook::new();
    let event = serde_json::json!({
        "tool_name": "Edit",
        "tool_input": { "file_path": "a.js", "old_string": "x", "new_string": "el.innerHTML = y" },
    })
    .to_string();

    let env = [("CLAUDE_SESSION_ID", "from-env")];
    assert_eq!(hook.run_with(&event, &[], &env).status.code(), Some(2));
    assert_eq!(hook.run_with(&event, &[], &env).status.code(), Some(0));
    assert_eq!(
        hook.run_with(&event, &[], &[("CLAUDE_SESSION_ID", "other")]).status.code(),
        Some(2)
    );
}

#[test]
fn test_audit_log_written() {
    let hook = Hook::new();
    hook.run(&write_event("sess-9", "a.js", "eval(x)"));
    hook.run(&write_event("sess-9", "a.js", "eval(x)"));

    let audit = std::fs::read_to_string(hook.state_dir().join("audit.jsonl")).unwrap();
    let lines: Vec<&str> = audit.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("BLOCKED"));
    assert!(lines[1].contains("ACKNOWLEDGED"));
}

#[test]
fn test_config_disabled() {
    let hook = Hook::with_general("enabled = false");
    let output = hook.run(&write_event("sess-1", "a.js", "eval(x)"));
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_list_rules() {
    let hook = Hook::new();
    let output = hook.run_with("", &["--list-rules"], &[]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("github-actions-workflow"));
    assert!(stdout.contains("eval-injection"));
}

#[test]
fn test_unusable_state_dir_never_blocks() {
    let hook = Hook::new();
    std::fs::write(hook.state_dir().join("state"), "not a directory").unwrap();
    let event = write_event("sess-1", "a.js", "eval(x)");

    for _ in 0..3 {
        let output = hook.run(&event);
        assert_eq!(output.status.code(), Some(0));
        assert!(stderr(&output).contains("[security-guard:eval-injection]"));
    }
}

#[test]
fn test_corrupt_state_file_heals() {
    let hook = Hook::new();
    let state = hook.state_dir().join("state");
    std::fs::create_dir_all(&state).unwrap();
    std::fs::write(
        state.join("security_warnings_state_sess-1.json"),
        [0xff, 0xfe, 0x00, 0x80],
    )
    .unwrap();
    let event = write_event("sess-1", "a.js", "eval(x)");

    let codes: Vec<_> = (0..3).map(|_| hook.run(&event).status.code()).collect();
    assert_eq!(codes, vec![Some(2), Some(0), Some(0)]);
}

#[test]
fn test_allowlist_file_suppresses_reminder() {
    let hook = Hook::new();
    std::fs::write(
        hook.state_dir().join("allow.toml"),
        "[[allow]]\npath = '^vendor/'\nreason = 'third-party code'\n",
    )
    .unwrap();

    let vendored = hook.run(&write_event("sess-1", "vendor/lib.js", "eval(x)"));
    assert_eq!(vendored.status.code(), Some(0));
    assert!(vendored.stderr.is_empty());

    assert_eq!(hook.run(&write_event("sess-1", "src/app.js", "eval(x)")).status.code(), Some(2));
}
