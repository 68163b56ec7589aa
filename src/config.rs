//! Configuration loading for claude-security-guard
//!
//! Supports TOML configuration with embedded defaults, plus the environment
//! switches the hook honors on every invocation.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::state::DEFAULT_RETENTION_DAYS;

/// Global on/off switch; "0", "false", "off" or "no" disable the guard
pub const ENV_ENABLED: &str = "ENABLE_SECURITY_REMINDER";

/// Report reminders without blocking
pub const ENV_WARN_ONLY: &str = "SECURITY_GUARD_WARN_ONLY";

/// Override for the state directory
pub const ENV_STATE_DIR: &str = "SECURITY_GUARD_STATE_DIR";

/// Diagnostics filter, in `tracing_subscriber::EnvFilter` syntax
pub const ENV_LOG: &str = "SECURITY_GUARD_LOG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Master switch
    pub enabled: bool,

    /// Surface reminders but never block
    pub warn_only: bool,

    /// Enable audit logging
    pub audit_log: bool,

    /// Path to audit log file
    pub audit_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            warn_only: false,
            audit_log: true,
            audit_path: Some("~/.claude/security-guard/audit.jsonl".to_string()),
        }
    }
}

/// Session state configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Directory holding one state file per session
    pub dir: String,

    /// Records untouched for longer than this are pruned
    pub retention_days: i64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: "~/.claude".to_string(),
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

/// Rule selection
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule ids that never fire
    pub disabled: Vec<String>,
}

/// Override configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverrideConfig {
    /// Path to allowlist file
    pub allowlist_file: Option<String>,
}

impl Default for OverrideConfig {
    fn default() -> Self {
        Self {
            allowlist_file: Some("~/.claude/security-guard/allow.toml".to_string()),
        }
    }
}

/// Diagnostics logging
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "warn" or "claude_security_guard=debug"
    pub level: String,

    /// Log file; stderr when unset
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "off".to_string(),
            file: None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub state: StateConfig,
    pub rules: RulesConfig,
    pub overrides: OverrideConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the standard locations or use defaults
    pub fn load() -> Self {
        let config_paths = [
            // User-specific config
            dirs::home_dir().map(|p| p.join(".claude/security-guard/config.toml")),
            // System-wide config
            Some(PathBuf::from("/etc/claude-security-guard/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!(error = %e, "falling back to default config"),
                }
            }
        }

        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment switches on top of file settings
    pub fn apply_env(&mut self) {
        if let Ok(value) = env::var(ENV_ENABLED) {
            self.general.enabled = parse_switch(&value);
        }
        if let Ok(value) = env::var(ENV_WARN_ONLY) {
            self.general.warn_only = parse_switch(&value);
        }
        if let Ok(dir) = env::var(ENV_STATE_DIR) {
            if !dir.trim().is_empty() {
                self.state.dir = dir;
            }
        }
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get the audit log path (expanded)
    pub fn audit_path(&self) -> Option<PathBuf> {
        self.general.audit_path.as_deref().map(Self::expand_path)
    }

    /// Get the state directory (expanded)
    pub fn state_dir(&self) -> PathBuf {
        Self::expand_path(&self.state.dir)
    }

    /// Get the allowlist file path (expanded)
    pub fn allowlist_path(&self) -> Option<PathBuf> {
        self.overrides
            .allowlist_file
            .as_deref()
            .map(Self::expand_path)
    }

    /// Get the diagnostics log path (expanded)
    pub fn log_path(&self) -> Option<PathBuf> {
        self.logging.file.as_deref().map(Self::expand_path)
    }

    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::days(self.state.retention_days.max(0))
    }
}

/// Interpret a boolean-like environment value; unrecognized values mean "on"
pub fn parse_switch(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "off" | "no"
    )
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
enabled = true
warn_only = false
audit_log = true
audit_path = "~/.claude/security-guard/audit.jsonl"

[state]
dir = "~/.claude"
retention_days = 30

[rules]
disabled = []

[overrides]
allowlist_file = "~/.claude/security-guard/allow.toml"

[logging]
level = "off"
"#;
