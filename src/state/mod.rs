//! Per-session warning state
//!
//! Records which (rule, file) pairs have already been surfaced in a session so
//! that a repeated edit is not interrupted twice. Storage is pluggable: the
//! hook binary uses [`FileBackend`], tests use [`MemoryBackend`].

pub mod file;
pub mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default retention for session records
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Environment variable consulted when the hook payload has no session id
pub const ENV_SESSION_ID: &str = "CLAUDE_SESSION_ID";

/// Errors raised by a state backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("state I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("state backend poisoned")]
    Poisoned,
}

/// Opaque session identifier supplied by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Use the payload's id, then `CLAUDE_SESSION_ID`, then "default"
    pub fn resolve(from_input: Option<&str>) -> Self {
        from_input
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| {
                std::env::var(ENV_SESSION_ID)
                    .ok()
                    .filter(|s| !s.trim().is_empty())
            })
            .map(Self)
            .unwrap_or_else(|| Self("default".to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe form; bytes outside `[A-Za-z0-9_-]` become `%XX`
    pub fn file_stem(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        for b in self.0.bytes() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' {
                out.push(b as char);
            } else {
                out.push_str(&format!("%{:02X}", b));
            }
        }
        out
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything remembered about one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub session_id: String,

    /// Time of the most recent write
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    /// rule id -> file path -> first warned at
    #[serde(default)]
    pub warnings: BTreeMap<String, BTreeMap<String, DateTime<Utc>>>,
}

impl SessionState {
    pub fn new(session: &SessionId) -> Self {
        Self {
            session_id: session.as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn contains(&self, rule_id: &str, file_path: &str) -> bool {
        self.warnings
            .get(rule_id)
            .is_some_and(|paths| paths.contains_key(file_path))
    }

    /// Insert the pair unless present; an existing timestamp is kept
    pub fn insert(&mut self, rule_id: &str, file_path: &str, now: DateTime<Utc>) -> bool {
        let paths = self.warnings.entry(rule_id.to_string()).or_default();
        if paths.contains_key(file_path) {
            return false;
        }
        paths.insert(file_path.to_string(), now);
        self.updated_at = Some(now);
        true
    }

    pub fn len(&self) -> usize {
        self.warnings.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the record was last written before `cutoff`
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.updated_at.map_or(true, |t| t < cutoff)
    }
}

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Durable storage for session records
///
/// `update` must run the closure with exclusive access to the session's record
/// and persist the result when the closure reports a change.
pub trait StateBackend {
    /// Current record for a session, if one exists
    fn read(&self, session: &SessionId) -> Result<Option<SessionState>, StoreError>;

    /// Exclusive read-modify-write; `apply` returns true if it changed the record
    fn update(
        &self,
        session: &SessionId,
        apply: &mut dyn FnMut(&mut SessionState) -> bool,
    ) -> Result<(), StoreError>;

    /// Delete records last written before `cutoff`; returns how many were removed
    fn prune(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError>;
}

/// Warning bookkeeping on top of a backend and a clock
pub struct WarningStore<B, C = SystemClock> {
    backend: B,
    clock: C,
}

impl<B: StateBackend> WarningStore<B, SystemClock> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            clock: SystemClock,
        }
    }
}

impl<B: StateBackend, C: Clock> WarningStore<B, C> {
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self { backend, clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// True iff this exact (session, rule, path) triple was recorded
    pub fn has_been_warned(
        &self,
        session: &SessionId,
        rule_id: &str,
        file_path: &str,
    ) -> Result<bool, StoreError> {
        Ok(self
            .backend
            .read(session)?
            .is_some_and(|state| state.contains(rule_id, file_path)))
    }

    /// Record the triple; returns false if it was already present
    pub fn record_warning(
        &self,
        session: &SessionId,
        rule_id: &str,
        file_path: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut inserted = false;
        self.backend.update(session, &mut |state| {
            inserted = state.insert(rule_id, file_path, now);
            inserted
        })?;
        Ok(inserted)
    }

    /// Check and record several rules for one file in a single transaction
    ///
    /// The result is parallel to `rule_ids`: true where the rule was new.
    pub fn claim(
        &self,
        session: &SessionId,
        file_path: &str,
        rule_ids: &[&str],
        now: DateTime<Utc>,
    ) -> Result<Vec<bool>, StoreError> {
        let mut fresh = Vec::new();
        self.backend.update(session, &mut |state| {
            fresh = rule_ids
                .iter()
                .map(|id| state.insert(id, file_path, now))
                .collect();
            fresh.iter().any(|&f| f)
        })?;
        Ok(fresh)
    }

    /// Remove session records older than `retention`
    pub fn prune(&self, now: DateTime<Utc>, retention: Duration) -> Result<usize, StoreError> {
        self.backend.prune(now - retention)
    }
}
