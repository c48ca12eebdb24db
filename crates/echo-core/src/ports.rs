//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `echo-core` (pure Rust).
//! Implementations live in `echo-platform` (HTTP and storage adapters).
//! The core never imports platform code; it only depends on these traits.

use std::pin::Pin;
use async_trait::async_trait;
use futures::Stream;
use echo_types::{message::Message, Result};

// ─── Generation Port ─────────────────────────────────────────

/// Streaming event from the generation service
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A partial text fragment
    Delta(String),
    /// Stream finished
    Done,
    /// Error during streaming
    Error(String),
}

/// A push-based sequence of text fragments, terminated by `Done` or `Error`.
pub type ReplyStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

#[async_trait]
pub trait GeneratePort: Send + Sync {
    /// Issue one generation request carrying the full message history.
    /// The last message is the new prompt. The returned future resolves
    /// once response headers arrive; fragments are pushed afterwards, and
    /// concatenating `Delta` payloads in arrival order reconstructs the
    /// full reply.
    async fn open_stream(&self, history: &[Message]) -> Result<ReplyStream>;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
