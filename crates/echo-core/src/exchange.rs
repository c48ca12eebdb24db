//! Streaming response assembler — one spawned task per exchange.
//!
//! The task opens the generation stream, folds incoming fragments, and
//! reports progress through the event bus. Every event carries the id of
//! the session the exchange was started for; the coordinator discards
//! events whose session is no longer active.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use echo_types::event::ChatEvent;
use echo_types::message::Message;

use crate::event_bus::EventBus;
use crate::ports::{GeneratePort, StreamEvent};

/// How long to wait for response headers before giving up on an exchange.
/// The guard is disarmed as soon as the stream opens, even if no fragment
/// has arrived yet.
pub const GUARD_TIMEOUT: Duration = Duration::from_secs(15);

pub(crate) async fn run_exchange(
    generator: Arc<dyn GeneratePort>,
    bus: EventBus,
    session_id: String,
    history: Vec<Message>,
    guard: Duration,
) {
    let mut stream = match tokio::time::timeout(guard, generator.open_stream(&history)).await {
        Err(_) => {
            log::warn!("No response within {:?}, abandoning exchange", guard);
            bus.emit(ChatEvent::TimedOut { session_id });
            return;
        }
        Ok(Err(e)) => {
            log::error!("Failed to open response stream: {}", e);
            bus.emit(ChatEvent::Failed {
                session_id,
                error: e.to_string(),
            });
            return;
        }
        Ok(Ok(stream)) => stream,
    };

    let mut accumulated = String::new();
    while let Some(event) = stream.next().await {
        match event {
            StreamEvent::Delta(text) => {
                accumulated.push_str(&text);
                bus.emit(ChatEvent::Chunk {
                    session_id: session_id.clone(),
                    text,
                });
            }
            // A stream that ends without an explicit Done is still a
            // complete reply.
            StreamEvent::Done => break,
            StreamEvent::Error(error) => {
                log::error!("Response stream failed: {}", error);
                bus.emit(ChatEvent::Failed { session_id, error });
                return;
            }
        }
    }

    bus.emit(ChatEvent::Complete {
        session_id,
        text: accumulated,
    });
}
