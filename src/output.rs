//! Verdicts and their rendering for the Claude Code hook protocol
//!
//! A blocking verdict is signalled with exit status 2 and the reminder text on
//! stderr; everything else exits 0.

use std::io::Write;

/// Exit status that lets the tool call proceed
pub const EXIT_ALLOW: i32 = 0;

/// Exit status that blocks the tool call and feeds stderr back to the model
pub const EXIT_BLOCK: i32 = 2;

/// One reminder surfaced for a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub rule_id: String,
    pub message: String,
}

impl Warning {
    pub fn new(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }
}

/// Decision result from the security guard
#[derive(Debug, Clone)]
pub enum Decision {
    /// Nothing to report
    Allow { reason: String },

    /// Every match was already surfaced earlier in this session
    Acknowledged { rule_ids: Vec<String> },

    /// First encounter of at least one rule for this file
    Block { warnings: Vec<Warning> },

    /// Like `Block`, but warn-only mode lets the edit through
    Warn { warnings: Vec<Warning> },
}

impl Decision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Decision::Allow {
            reason: reason.into(),
        }
    }

    /// Check if the edit may proceed
    pub fn is_allow(&self) -> bool {
        !self.is_block()
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Decision::Block { .. })
    }

    /// Reminders carried by this decision
    pub fn warnings(&self) -> &[Warning] {
        match self {
            Decision::Block { warnings } | Decision::Warn { warnings } => warnings.as_slice(),
            _ => &[],
        }
    }

    /// Rule ids involved in this decision
    pub fn rule_ids(&self) -> Vec<&str> {
        match self {
            Decision::Allow { .. } => Vec::new(),
            Decision::Acknowledged { rule_ids } => rule_ids.iter().map(String::as_str).collect(),
            Decision::Block { warnings } | Decision::Warn { warnings } => {
                warnings.iter().map(|w| w.rule_id.as_str()).collect()
            }
        }
    }

    /// Short description for logs
    pub fn reason(&self) -> String {
        match self {
            Decision::Allow { reason } => reason.clone(),
            Decision::Acknowledged { rule_ids } => {
                format!("already surfaced this session: {}", rule_ids.join(", "))
            }
            Decision::Block { warnings } | Decision::Warn { warnings } => {
                let ids: Vec<&str> = warnings.iter().map(|w| w.rule_id.as_str()).collect();
                format!("first match in this file: {}", ids.join(", "))
            }
        }
    }
}

/// Process-level rendering of a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOutput {
    pub exit_code: i32,

    /// Text for stderr, if any
    pub message: Option<String>,
}

impl HookOutput {
    /// Silent success
    pub fn allow() -> Self {
        HookOutput {
            exit_code: EXIT_ALLOW,
            message: None,
        }
    }

    pub fn from_decision(decision: &Decision) -> Self {
        match decision {
            Decision::Allow { .. } | Decision::Acknowledged { .. } => HookOutput::allow(),
            Decision::Block { warnings } => HookOutput {
                exit_code: EXIT_BLOCK,
                message: Some(compose(warnings)),
            },
            Decision::Warn { warnings } => HookOutput {
                exit_code: EXIT_ALLOW,
                message: Some(compose(warnings)),
            },
        }
    }

    /// Write the message to `err` and return the exit status
    pub fn emit(&self, err: &mut impl Write) -> i32 {
        if let Some(message) = &self.message {
            let _ = writeln!(err, "{}", message);
            let _ = err.flush();
        }
        self.exit_code
    }
}

/// Join reminders in order, one tagged paragraph per rule
pub fn compose(warnings: &[Warning]) -> String {
    warnings
        .iter()
        .map(|w| format!("[security-guard:{}] {}", w.rule_id, w.message))
        .collect::<Vec<_>>()
        .join("\n\n")
}
