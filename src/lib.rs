//! claude-security-guard - Pre-edit security reminders for Claude Code
//!
//! A `PreToolUse` hook that inspects proposed file edits for risky patterns
//! (eval, shell execution, XSS sinks, workflow injection, ...) and blocks the
//! first occurrence of each pattern per file with an explanation. Repeats of
//! the same (rule, file) pair within a session pass silently.
//!
//! # Features
//!
//! - **Rule catalog**: content substring rules and path-scoped rules
//! - **Session memory**: per-session state files with 30-day pruning
//! - **Fail open**: malformed input or state faults never block an edit
//! - **Allowlist support**: user-defined path exceptions per rule
//! - **Audit logging**: JSONL log of all decisions
//!
//! # Example
//!
//! ```
//! use claude_security_guard::{Config, HookInput, SecurityGuard};
//! use claude_security_guard::state::{MemoryBackend, WarningStore};
//!
//! let guard = SecurityGuard::with_store(Config::default(), WarningStore::new(MemoryBackend::default()));
//!
//! let input = r#"{"tool_name":"Write","session_id":"s","tool_input":{"file_path":"a.js","content":"eval(x)"}}"#;
//! let hook_input = HookInput::from_json(input).unwrap();
//!
//! assert!(guard.check(&hook_input).is_block());
//! assert!(guard.check(&hook_input).is_allow());
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod input;
pub mod logging;
pub mod output;
pub mod rules;
pub mod state;

// Re-exports for convenience
pub use config::Config;
pub use engine::SecurityGuard;
pub use input::{EditEvent, HookInput, ToolInput};
pub use output::{Decision, HookOutput, Warning};
pub use rules::{Rule, RuleCatalog};
