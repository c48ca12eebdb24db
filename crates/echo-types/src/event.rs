use serde::{Deserialize, Serialize};

/// Events emitted by an in-flight exchange.
/// Every event carries the id of the session it was started for, so the
/// coordinator can discard results that arrive after a session switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatEvent {
    /// A text fragment arrived from the response stream
    Chunk { session_id: String, text: String },

    /// The stream finished; `text` is the full accumulated reply
    Complete { session_id: String, text: String },

    /// The exchange failed (network error, bad status, broken stream)
    Failed { session_id: String, error: String },

    /// The guard timer fired before the response headers arrived
    TimedOut { session_id: String },
}

impl ChatEvent {
    /// Id of the session this event belongs to.
    pub fn session_id(&self) -> &str {
        match self {
            ChatEvent::Chunk { session_id, .. }
            | ChatEvent::Complete { session_id, .. }
            | ChatEvent::Failed { session_id, .. }
            | ChatEvent::TimedOut { session_id } => session_id,
        }
    }
}
