//! Relay generation client.
//!
//! Sends the full message history to the relay server and treats the
//! plain-text response body as the reply stream: every byte chunk is a
//! fragment. Chunks can split multi-byte characters, so incomplete UTF-8
//! tails are carried over to the next chunk.

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{json, Value};

use echo_core::ports::{GeneratePort, ReplyStream, StreamEvent};
use echo_types::config::RelayConfig;
use echo_types::message::Message;
use echo_types::{ChatError, Result};

pub struct RelayClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
        }
    }
}

pub(crate) fn relay_request_body(history: &[Message]) -> Value {
    json!({ "history": history })
}

#[async_trait]
impl GeneratePort for RelayClient {
    async fn open_stream(&self, history: &[Message]) -> Result<ReplyStream> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&relay_request_body(history))
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ChatError::Generate(format!("HTTP {}: {}", status, text)));
        }

        let stream = async_stream::stream! {
            let mut body = response.bytes_stream();
            let mut pending: Vec<u8> = Vec::new();
            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(bytes) => {
                        pending.extend_from_slice(&bytes);
                        let text = super::take_decoded(&mut pending);
                        if !text.is_empty() {
                            yield StreamEvent::Delta(text);
                        }
                    }
                    Err(e) => {
                        yield StreamEvent::Error(e.to_string());
                        return;
                    }
                }
            }
            // A truncated multi-byte sequence at stream end is flushed
            // lossily rather than dropped
            if !pending.is_empty() {
                yield StreamEvent::Delta(String::from_utf8_lossy(&pending).into_owned());
            }
            yield StreamEvent::Done;
        };
        Ok(Box::pin(stream))
    }
}
