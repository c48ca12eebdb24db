//! Simple event bus for decoupled communication between exchange tasks
//! and the session coordinator.
//!
//! Events are buffered and drained by the owner of the coordinator on each
//! tick of its loop, so chunk application preserves arrival order.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use echo_types::event::ChatEvent;

/// Shared event bus — clone-cheap via Arc.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Mutex<VecDeque<ChatEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Publish an event. Called by exchange tasks.
    pub fn emit(&self, event: ChatEvent) {
        self.inner.lock().unwrap().push_back(event);
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&self) -> Vec<ChatEvent> {
        self.inner.lock().unwrap().drain(..).collect()
    }

    /// Check if there are pending events.
    pub fn has_pending(&self) -> bool {
        !self.inner.lock().unwrap().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
