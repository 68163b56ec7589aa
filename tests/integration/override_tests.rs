//! Integration tests for override mechanisms

use std::env;

use claude_security_guard::config::{ENV_ENABLED, ENV_STATE_DIR, ENV_WARN_ONLY};
use claude_security_guard::rules::allowlist::CompiledAllowlist;
use claude_security_guard::state::{MemoryBackend, WarningStore};
use claude_security_guard::{Config, Decision, HookInput, SecurityGuard};

const DANGEROUS: &str =
    r#"{"tool_name":"Write","session_id":"s","tool_input":{"file_path":"a.js","content":"eval(x)"}}"#;

fn guard_from(config: Config) -> SecurityGuard<MemoryBackend> {
    SecurityGuard::with_store(config, WarningStore::new(MemoryBackend::default()))
}

fn check_with_env(env_var: &str, env_val: &str) -> (Decision, usize) {
    env::set_var(env_var, env_val);
    let mut config = Config::default();
    config.apply_env();
    env::remove_var(env_var);

    let guard = guard_from(config);
    let decision = guard.check(&HookInput::from_json(DANGEROUS).unwrap());
    let sessions = guard.store().backend().session_count();
    (decision, sessions)
}

// ============================================================================
// Environment switches
// ============================================================================

// Environment mutation is process-wide, so every env case runs in one test.
#[test]
fn test_environment_switches() {
    // ENABLE_SECURITY_REMINDER=0 allows everything and records nothing
    let (decision, sessions) = check_with_env(ENV_ENABLED, "0");
    assert!(matches!(decision, Decision::Allow { .. }));
    assert_eq!(sessions, 0);

    let (decision, _) = check_with_env(ENV_ENABLED, "false");
    assert!(decision.is_allow());

    // Any other value keeps the guard on
    let (decision, sessions) = check_with_env(ENV_ENABLED, "1");
    assert!(decision.is_block());
    assert_eq!(sessions, 1);

    // Warn-only still surfaces the reminder but lets the edit through
    let (decision, sessions) = check_with_env(ENV_WARN_ONLY, "1");
    assert!(matches!(decision, Decision::Warn { .. }));
    assert_eq!(decision.warnings().len(), 1);
    assert_eq!(sessions, 1);

    // State directory override
    env::set_var(ENV_STATE_DIR, "/tmp/guard-state");
    let mut config = Config::default();
    config.apply_env();
    env::remove_var(ENV_STATE_DIR);
    assert_eq!(config.state_dir(), std::path::PathBuf::from("/tmp/guard-state"));
}

#[test]
fn test_disabled_in_config() {
    let mut config = Config::default();
    config.general.enabled = false;
    let guard = guard_from(config);

    assert!(!guard.is_enabled());
    assert!(guard.check(&HookInput::from_json(DANGEROUS).unwrap()).is_allow());
}

// ============================================================================
// Rule selection
// ============================================================================

#[test]
fn test_disabled_rules_never_fire() {
    let mut config = Config::default();
    config.rules.disabled = vec!["eval-injection".to_string()];
    let guard = guard_from(config);

    assert!(guard.catalog().get("eval-injection").is_none());
    assert!(guard.check(&HookInput::from_json(DANGEROUS).unwrap()).is_allow());
}

// ============================================================================
// Allowlist Tests
// ============================================================================

#[test]
fn test_allowlist_file_loaded_from_config() {
    let dir = tempfile::TempDir::new().unwrap();
    let allow_path = dir.path().join("allow.toml");
    std::fs::write(
        &allow_path,
        r#"
[[allow]]
path = "^a\\.js$"
rule = "eval-injection"
reason = "generated bundle"
"#,
    )
    .unwrap();

    let mut config = Config::default();
    config.overrides.allowlist_file = Some(allow_path.to_string_lossy().into_owned());
    let guard = guard_from(config);
    assert!(guard.check(&HookInput::from_json(DANGEROUS).unwrap()).is_allow());
}

#[test]
fn test_broken_allowlist_ignored() {
    let dir = tempfile::TempDir::new().unwrap();
    let allow_path = dir.path().join("allow.toml");
    std::fs::write(&allow_path, "[[allow]\npath = ").unwrap();

    let mut config = Config::default();
    config.overrides.allowlist_file = Some(allow_path.to_string_lossy().into_owned());
    let guard = guard_from(config);
    assert!(guard.check(&HookInput::from_json(DANGEROUS).unwrap()).is_block());
}

#[test]
fn test_explicit_allowlist() {
    let guard = guard_from(Config::default()).with_allowlist(CompiledAllowlist::empty());
    assert!(guard.check(&HookInput::from_json(DANGEROUS).unwrap()).is_block());
}

// ============================================================================
// Config Loading Tests
// ============================================================================

#[test]
fn test_config_file_roundtrip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[general]
warn_only = true

[state]
retention_days = 7
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(config.general.warn_only);
    assert!(config.general.enabled);
    assert_eq!(config.retention(), chrono::Duration::days(7));
    assert!(config
        .allowlist_path()
        .is_some_and(|p| p.ends_with(".claude/security-guard/allow.toml")));
}

#[test]
fn test_config_expand_path() {
    let expanded = Config::expand_path("~/.claude/security-guard/audit.jsonl");
    assert!(!expanded.to_string_lossy().starts_with('~'));
}
