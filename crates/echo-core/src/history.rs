//! Session history manager.
//!
//! Owns the ordered list of sessions (newest-created first) and is the
//! sole writer of the persisted history key. Storage failures degrade to
//! an empty history on load and are logged on save; they never reach the
//! caller.

use std::sync::Arc;

use echo_types::message::{Message, Role};
use echo_types::session::Session;

use crate::ports::StoragePort;

/// Storage key holding the serialized array of sessions.
pub const HISTORY_KEY: &str = "chat:history";

/// Titles are cut at this many characters.
const TITLE_MAX_CHARS: usize = 35;

pub struct HistoryStore {
    storage: Arc<dyn StoragePort>,
    sessions: Vec<Session>,
}

impl HistoryStore {
    /// Load history from storage. Absent, corrupt, or non-array content
    /// yields an empty history.
    pub async fn load(storage: Arc<dyn StoragePort>) -> Self {
        let sessions = match storage.get(HISTORY_KEY).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<Session>>(&bytes) {
                Ok(sessions) => sessions,
                Err(e) => {
                    log::error!("Failed to parse stored history, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::error!("Failed to load history from {}: {}", storage.backend_name(), e);
                Vec::new()
            }
        };
        Self { storage, sessions }
    }

    /// All sessions, newest-created first.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Allocate a fresh session, prepend it to the history, persist,
    /// and return it.
    pub async fn create_session(&mut self) -> Session {
        let session = Session::new();
        self.sessions.insert(0, session.clone());
        self.persist().await;
        session
    }

    /// Replace the message list of the session with `id` and recompute its
    /// title from the first user message. Unknown ids are a logged no-op.
    pub async fn update_session(&mut self, id: &str, messages: Vec<Message>) -> Option<Session> {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            log::warn!("Session {} not found for update", id);
            return None;
        };

        if let Some(title) = derive_title(&messages) {
            session.title = title;
        }
        session.messages = messages;
        let updated = session.clone();

        self.persist().await;
        Some(updated)
    }

    /// Remove the session with `id` (absent ids are a no-op), persist, and
    /// return the resulting history.
    pub async fn delete_session(&mut self, id: &str) -> &[Session] {
        self.sessions.retain(|s| s.id != id);
        self.persist().await;
        &self.sessions
    }

    /// Pure lookup against the current history.
    pub fn get_session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Best-effort write of the full history.
    async fn persist(&self) {
        match serde_json::to_vec(&self.sessions) {
            Ok(bytes) => {
                if let Err(e) = self.storage.set(HISTORY_KEY, &bytes).await {
                    log::error!("Failed to save history to {}: {}", self.storage.backend_name(), e);
                }
            }
            Err(e) => log::error!("Failed to serialize history: {}", e),
        }
    }
}

/// Derive a session title from the first user message: content as-is up to
/// 35 characters, otherwise the first 35 characters plus "...". Returns
/// `None` when no user message exists, in which case the prior title is
/// kept. Truncation counts characters, not bytes.
pub fn derive_title(messages: &[Message]) -> Option<String> {
    let first_user = messages.iter().find(|m| m.role == Role::User)?;
    let mut title: String = first_user.content.chars().take(TITLE_MAX_CHARS).collect();
    if first_user.content.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    Some(title)
}
