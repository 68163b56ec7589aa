//! Allowlist handling for suppressing reminders
//!
//! Supports user-defined path patterns that should never trigger a reminder,
//! either for every rule or for one rule id.

use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// An allowlist entry
#[derive(Debug, Clone, Deserialize)]
pub struct AllowEntry {
    /// Regex matched against the target file path
    pub path: String,

    /// Human-readable reason for allowing
    pub reason: String,

    /// Optional rule restriction (if not set, applies to all rules)
    #[serde(default)]
    pub rule: Option<String>,
}

/// The allowlist configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AllowlistConfig {
    #[serde(default)]
    pub allow: Vec<AllowEntry>,
}

/// Compiled allowlist for efficient matching
#[derive(Debug, Default)]
pub struct CompiledAllowlist {
    entries: Vec<(Regex, Option<String>, String)>,
}

impl CompiledAllowlist {
    /// Create an empty allowlist
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and compile allowlist from file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: AllowlistConfig = toml::from_str(&content)?;
        Ok(Self::from_config(&config))
    }

    /// Compile from config, skipping entries whose pattern does not compile
    pub fn from_config(config: &AllowlistConfig) -> Self {
        let mut allowlist = Self::empty();

        for entry in &config.allow {
            match Regex::new(&entry.path) {
                Ok(regex) => {
                    allowlist
                        .entries
                        .push((regex, entry.rule.clone(), entry.reason.clone()));
                }
                Err(e) => {
                    tracing::warn!(pattern = %entry.path, error = %e, "skipping invalid allowlist pattern");
                }
            }
        }

        allowlist
    }

    /// Return the reason if `rule_id` is allowed for `file_path`
    pub fn matches(&self, rule_id: &str, file_path: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(regex, rule, _)| {
                rule.as_deref().map_or(true, |r| r == rule_id || r == "*")
                    && regex.is_match(file_path)
            })
            .map(|(_, _, reason)| reason.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
