//! In-memory chat session store.
//!
//! `InMemorySessionStore` keeps each session's bounded history in a
//! `DashMap`. Reads clone the stored turns so no map guard outlives the call,
//! and `append_exchange` appends and trims while holding the entry lock for
//! that one key only. Sessions live until cleared or the process exits.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use notes_core::{trim_to_window, ChatTurn, Result, SessionStore};

/// Process-local session store backed by a sharded concurrent map.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<DashMap<String, Vec<ChatTurn>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn history(&self, session_id: &str) -> Result<Vec<ChatTurn>> {
        Ok(self
            .sessions
            .get(session_id)
            .map(|turns| turns.value().clone())
            .unwrap_or_default())
    }

    async fn put_history(&self, session_id: &str, turns: Vec<ChatTurn>) -> Result<()> {
        self.sessions.insert(session_id.to_string(), turns);
        Ok(())
    }

    async fn append_exchange(
        &self,
        session_id: &str,
        turns: Vec<ChatTurn>,
        cap: usize,
    ) -> Result<usize> {
        let mut entry = self.sessions.entry(session_id.to_string()).or_default();
        entry.extend(turns);
        trim_to_window(&mut entry, cap);
        let len = entry.len();
        drop(entry);

        debug!(
            subsystem = "session_store",
            op = "append",
            session_id,
            history_len = len,
            "Session history updated"
        );
        Ok(len)
    }

    async fn clear(&self, session_id: &str) -> Result<()> {
        let removed = self.sessions.remove(session_id).is_some();
        debug!(
            subsystem = "session_store",
            op = "clear",
            session_id,
            removed,
            "Session cleared"
        );
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.sessions.len())
    }
}
