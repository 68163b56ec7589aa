//! Decision engine for claude-security-guard
//!
//! Matches an edit against the rule catalog and decides, per (rule, file)
//! pair, whether this is the first time the session sees it. First
//! encounters block with an explanation; repeats pass silently.

pub mod matcher;

use crate::config::{Config, ENV_ENABLED};
use crate::input::{EditEvent, HookInput};
use crate::output::{Decision, Warning};
use crate::rules::allowlist::CompiledAllowlist;
use crate::rules::RuleCatalog;
use crate::state::{Clock, FileBackend, SessionId, StateBackend, SystemClock, WarningStore};

/// The main security guard
pub struct SecurityGuard<B: StateBackend = FileBackend, C: Clock = SystemClock> {
    config: Config,
    catalog: RuleCatalog,
    allowlist: CompiledAllowlist,
    store: WarningStore<B, C>,
}

impl SecurityGuard {
    /// Create a guard persisting state under the configured directory
    pub fn new(config: Config) -> Self {
        let store = WarningStore::new(FileBackend::new(config.state_dir()));
        Self::with_store(config, store)
    }
}

impl<B: StateBackend, C: Clock> SecurityGuard<B, C> {
    /// Create a guard over an explicit store
    pub fn with_store(config: Config, store: WarningStore<B, C>) -> Self {
        let catalog = RuleCatalog::builtin().without(&config.rules.disabled);

        let allowlist = config
            .allowlist_path()
            .filter(|path| path.exists())
            .and_then(|path| match CompiledAllowlist::from_file(&path) {
                Ok(allowlist) => Some(allowlist),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable allowlist");
                    None
                }
            })
            .unwrap_or_else(CompiledAllowlist::empty);

        Self {
            config,
            catalog,
            allowlist,
            store,
        }
    }

    /// Replace the allowlist
    pub fn with_allowlist(mut self, allowlist: CompiledAllowlist) -> Self {
        self.allowlist = allowlist;
        self
    }

    /// Check whether the global switch is on
    pub fn is_enabled(&self) -> bool {
        self.config.general.enabled
    }

    pub fn is_warn_only(&self) -> bool {
        self.config.general.warn_only
    }

    /// Main entry point: check an input and return a decision
    pub fn check(&self, input: &HookInput) -> Decision {
        if !self.is_enabled() {
            return Decision::allow(format!("disabled via {}", ENV_ENABLED));
        }

        let Some(event) = input.edit_event() else {
            return Decision::allow("not a file operation");
        };

        let session = SessionId::resolve(input.session_id.as_deref());
        let decision = self.evaluate(&session, &event);

        if self.is_warn_only() {
            if let Decision::Block { warnings } = decision {
                return Decision::Warn { warnings };
            }
        }

        decision
    }

    /// Decide one edit within a session, recording first encounters
    pub fn evaluate(&self, session: &SessionId, event: &EditEvent<'_>) -> Decision {
        let matches: Vec<_> = matcher::find_matches(&self.catalog, event)
            .into_iter()
            .filter(|rule| match self.allowlist.matches(rule.id, event.file_path) {
                Some(reason) => {
                    tracing::debug!(rule = rule.id, file = event.file_path, reason, "allowlisted");
                    false
                }
                None => true,
            })
            .collect();

        if matches.is_empty() {
            return Decision::allow("no rule matched");
        }

        let now = self.store.now();
        match self.store.prune(now, self.config.retention()) {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(removed, "pruned stale session state"),
            Err(e) => tracing::warn!(error = %e, "state pruning failed"),
        }

        let ids: Vec<&str> = matches.iter().map(|rule| rule.id).collect();
        let fresh = match self.store.claim(session, event.file_path, &ids, now) {
            Ok(fresh) => fresh,
            Err(e) => {
                // Unrecorded matches never block
                tracing::warn!(session = %session, error = %e, "state unavailable, reporting without blocking");
                let warnings = matches
                    .iter()
                    .map(|rule| Warning::new(rule.id, rule.message))
                    .collect();
                return Decision::Warn { warnings };
            }
        };

        let mut warnings = Vec::new();
        let mut acknowledged = Vec::new();
        for (rule, is_new) in matches.iter().zip(fresh) {
            if is_new {
                warnings.push(Warning::new(rule.id, rule.message));
            } else {
                acknowledged.push(rule.id.to_string());
            }
        }

        if warnings.is_empty() {
            Decision::Acknowledged {
                rule_ids: acknowledged,
            }
        } else {
            Decision::Block { warnings }
        }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &WarningStore<B, C> {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
