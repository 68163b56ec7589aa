//! Security rules for claude-security-guard
//!
//! Defines the reminder catalog: content patterns for injection and XSS sinks,
//! and path rules for file categories that need care regardless of content.

pub mod allowlist;
pub mod injection;
pub mod web;
pub mod workflow;

use once_cell::sync::Lazy;

/// How a rule decides whether an edit triggers it
#[derive(Clone, Copy)]
pub enum Predicate {
    /// Any one of these literal, case-sensitive substrings in the content
    Substrings(&'static [&'static str]),

    /// A pure function over the target file path; content is ignored
    Path(fn(&str) -> bool),
}

impl std::fmt::Debug for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Substrings(needles) => f.debug_tuple("Substrings").field(needles).finish(),
            Predicate::Path(_) => f.write_str("Path(<fn>)"),
        }
    }
}

/// A security reminder rule
#[derive(Debug, Clone)]
pub struct Rule {
    /// Unique identifier for this rule
    pub id: &'static str,

    /// Detection predicate
    pub predicate: Predicate,

    /// Explanation shown when the rule first fires, with a remediation example
    pub message: &'static str,
}

impl Rule {
    /// Create a content rule matching any of `substrings`
    pub const fn substrings(
        id: &'static str,
        substrings: &'static [&'static str],
        message: &'static str,
    ) -> Self {
        Self {
            id,
            predicate: Predicate::Substrings(substrings),
            message,
        }
    }

    /// Create a rule scoped to a category of file paths
    pub const fn path(id: &'static str, check: fn(&str) -> bool, message: &'static str) -> Self {
        Self {
            id,
            predicate: Predicate::Path(check),
            message,
        }
    }

    /// Evaluate the predicate against an edit's path and content
    pub fn matches(&self, file_path: &str, content: &str) -> bool {
        match self.predicate {
            Predicate::Substrings(needles) => needles.iter().any(|n| content.contains(n)),
            Predicate::Path(check) => check(&file_path.replace('\\', "/")),
        }
    }
}

static BUILTIN: Lazy<Vec<&'static Rule>> = Lazy::new(|| {
    workflow::WORKFLOW_RULES
        .iter()
        .chain(injection::INJECTION_RULES.iter())
        .chain(web::WEB_RULES.iter())
        .collect()
});

/// Ordered, read-only collection of rules
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<&'static Rule>,
}

impl RuleCatalog {
    /// The built-in catalog, in evaluation order
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN.clone(),
        }
    }

    /// A catalog with the given rule ids removed
    pub fn without(mut self, disabled: &[String]) -> Self {
        self.rules.retain(|r| !disabled.iter().any(|d| d == r.id));
        self
    }

    /// Look up a rule by id
    pub fn get(&self, id: &str) -> Option<&'static Rule> {
        self.rules.iter().copied().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Rule> + '_ {
        self.rules.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
