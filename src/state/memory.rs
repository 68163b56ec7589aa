//! In-memory state backend for tests and benchmarks

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use super::{SessionId, SessionState, StateBackend, StoreError};

#[derive(Debug, Default)]
pub struct MemoryBackend {
    sessions: Mutex<HashMap<SessionId, SessionState>>,
}

impl MemoryBackend {
    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl StateBackend for MemoryBackend {
    fn read(&self, session: &SessionId) -> Result<Option<SessionState>, StoreError> {
        let sessions = self.sessions.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(sessions.get(session).cloned())
    }

    fn update(
        &self,
        session: &SessionId,
        apply: &mut dyn FnMut(&mut SessionState) -> bool,
    ) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().map_err(|_| StoreError::Poisoned)?;
        let mut state = sessions
            .get(session)
            .cloned()
            .unwrap_or_else(|| SessionState::new(session));
        if apply(&mut state) {
            sessions.insert(session.clone(), state);
        }
        Ok(())
    }

    fn prune(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut sessions = self.sessions.lock().map_err(|_| StoreError::Poisoned)?;
        let before = sessions.len();
        sessions.retain(|_, state| !state.is_stale(cutoff));
        Ok(before - sessions.len())
    }
}
