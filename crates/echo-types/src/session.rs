use serde::{Deserialize, Serialize};
use crate::message::Message;

/// Title given to a session before any user message exists.
pub const DEFAULT_TITLE: &str = "New Chat";

/// A persisted conversation session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
}

impl Session {
    /// Create an empty session with a fresh unique id.
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
