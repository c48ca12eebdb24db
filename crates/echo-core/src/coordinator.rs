//! Active session coordinator.
//!
//! Tracks which session is current, keeps its working message list in
//! sync with the history manager, and owns the exchange lifecycle. The UI
//! layer only dispatches commands and reads [`ChatSnapshot`]s; exchange
//! tasks report back through the event bus and their results are applied
//! by [`SessionCoordinator::process_events`] on the caller's loop.

use std::sync::Arc;
use std::time::Duration;

use echo_types::event::ChatEvent;
use echo_types::message::Message;

use crate::event_bus::EventBus;
use crate::exchange::{run_exchange, GUARD_TIMEOUT};
use crate::history::HistoryStore;
use crate::ports::{GeneratePort, StoragePort};

/// Storage key holding the bare id of the last-active session.
pub const ACTIVE_KEY: &str = "chat:active";

/// Synthetic reply appended when the guard timer fires.
pub const TIMEOUT_REPLY: &str =
    "The server is taking too long to respond. Please check your connection or API key and try again.";

/// Synthetic reply appended when an exchange fails.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Lifecycle of the current exchange. At most one exchange is in flight
/// per session view; submissions are rejected unless `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePhase {
    Idle,
    /// Request issued, no fragment received yet
    Loading,
    /// Fragments are arriving
    Streaming,
}

pub struct SessionCoordinator {
    history: HistoryStore,
    storage: Arc<dyn StoragePort>,
    generator: Arc<dyn GeneratePort>,
    bus: EventBus,
    active_id: String,
    messages: Vec<Message>,
    live_reply: String,
    phase: ExchangePhase,
    guard_timeout: Duration,
}

/// Read-only projection of coordinator state for rendering.
#[derive(Debug, Clone)]
pub struct ChatSnapshot {
    pub active_id: String,
    pub sessions: Vec<SessionEntry>,
    pub messages: Vec<Message>,
    pub live_reply: String,
    pub phase: ExchangePhase,
}

/// Sidebar entry for one session.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub id: String,
    pub title: String,
}

impl SessionCoordinator {
    /// Load history and restore the last-active session. If the persisted
    /// pointer no longer matches a session, fall back to the first session
    /// in history; if history is empty, create a fresh session. Always
    /// terminates with a valid active session.
    pub async fn start(
        storage: Arc<dyn StoragePort>,
        generator: Arc<dyn GeneratePort>,
        bus: EventBus,
    ) -> Self {
        let mut history = HistoryStore::load(storage.clone()).await;

        let stored_id = match storage.get(ACTIVE_KEY).await {
            Ok(Some(bytes)) => String::from_utf8(bytes).ok(),
            Ok(None) => None,
            Err(e) => {
                log::error!("Failed to load active session id: {}", e);
                None
            }
        };

        let restored = stored_id.and_then(|id| history.get_session(&id).cloned());
        let active = match restored {
            Some(session) => session,
            None => match history.sessions().first().cloned() {
                Some(first) => first,
                None => history.create_session().await,
            },
        };

        let mut coordinator = Self {
            history,
            storage,
            generator,
            bus,
            active_id: active.id,
            messages: active.messages,
            live_reply: String::new(),
            phase: ExchangePhase::Idle,
            guard_timeout: GUARD_TIMEOUT,
        };
        coordinator.persist_active_id().await;
        coordinator
    }

    /// Override the guard timer (mainly for tests).
    pub fn with_guard_timeout(mut self, guard: Duration) -> Self {
        self.guard_timeout = guard;
        self
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    /// Snapshot of everything the UI needs to render.
    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            active_id: self.active_id.clone(),
            sessions: self
                .history
                .sessions()
                .iter()
                .map(|s| SessionEntry {
                    id: s.id.clone(),
                    title: s.title.clone(),
                })
                .collect(),
            messages: self.messages.clone(),
            live_reply: self.live_reply.clone(),
            phase: self.phase,
        }
    }

    /// Switch to the session with `id`, discarding any in-flight streaming
    /// state. Unknown ids leave the coordinator unchanged.
    pub async fn switch_to(&mut self, id: &str) {
        let Some(session) = self.history.get_session(id).cloned() else {
            log::warn!("Session {} not found, staying on {}", id, self.active_id);
            return;
        };
        self.active_id = session.id;
        self.messages = session.messages;
        self.live_reply.clear();
        self.phase = ExchangePhase::Idle;
        self.persist_active_id().await;
    }

    /// Create a fresh session and make it active.
    pub async fn new_session(&mut self) {
        let session = self.history.create_session().await;
        self.active_id = session.id;
        self.messages = session.messages;
        self.live_reply.clear();
        self.phase = ExchangePhase::Idle;
        self.persist_active_id().await;
    }

    /// Delete the session with `id`. If it was active, the first remaining
    /// session becomes active; with nothing left a fresh session is
    /// created.
    pub async fn delete_session(&mut self, id: &str) {
        self.history.delete_session(id).await;
        if self.active_id != id {
            return;
        }

        let next = match self.history.sessions().first().cloned() {
            Some(first) => first,
            None => self.history.create_session().await,
        };
        self.active_id = next.id;
        self.messages = next.messages;
        self.live_reply.clear();
        self.phase = ExchangePhase::Idle;
        self.persist_active_id().await;
    }

    /// Submit a user message and spawn the exchange. Returns `false`
    /// without side effects when the trimmed input is empty or an exchange
    /// is already in flight. The stored message keeps the original,
    /// untrimmed text.
    pub async fn submit(&mut self, input: &str) -> bool {
        if input.trim().is_empty() {
            return false;
        }
        if self.phase != ExchangePhase::Idle {
            log::debug!("Exchange already in flight, ignoring submission");
            return false;
        }

        self.messages.push(Message::user(input));
        self.write_through().await;

        self.phase = ExchangePhase::Loading;
        self.live_reply.clear();

        tokio::spawn(run_exchange(
            self.generator.clone(),
            self.bus.clone(),
            self.active_id.clone(),
            self.messages.clone(),
            self.guard_timeout,
        ));
        true
    }

    /// Drain the event bus and fold exchange results into the active
    /// session. Events bound to a session that is no longer active are
    /// discarded so a stale completion can never corrupt a newer session.
    pub async fn process_events(&mut self) {
        for event in self.bus.drain() {
            if event.session_id() != self.active_id {
                log::debug!("Discarding event for inactive session {}", event.session_id());
                continue;
            }
            match event {
                ChatEvent::Chunk { text, .. } => {
                    self.phase = ExchangePhase::Streaming;
                    self.live_reply.push_str(&text);
                }
                ChatEvent::Complete { text, .. } => {
                    self.messages.push(Message::model(text));
                    self.write_through().await;
                    self.finish_exchange();
                }
                ChatEvent::TimedOut { .. } => {
                    self.messages.push(Message::model(TIMEOUT_REPLY));
                    self.write_through().await;
                    self.finish_exchange();
                }
                ChatEvent::Failed { .. } => {
                    self.messages.push(Message::model(ERROR_REPLY));
                    self.write_through().await;
                    self.finish_exchange();
                }
            }
        }
    }

    fn finish_exchange(&mut self) {
        self.live_reply.clear();
        self.phase = ExchangePhase::Idle;
    }

    /// Push the working message list into the history manager. A session
    /// that has never held a message keeps its default persisted state.
    async fn write_through(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let messages = self.messages.clone();
        self.history.update_session(&self.active_id, messages).await;
    }

    /// Fire-and-forget persist of the active session pointer, kept under
    /// its own key so a reload resumes the same session.
    async fn persist_active_id(&self) {
        if let Err(e) = self.storage.set(ACTIVE_KEY, self.active_id.as_bytes()).await {
            log::error!("Failed to save active session id: {}", e);
        }
    }
}
