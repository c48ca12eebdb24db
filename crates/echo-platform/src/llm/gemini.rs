//! Gemini generation client.
//!
//! Talks to the `streamGenerateContent` endpoint with `alt=sse` and turns
//! the SSE `data:` lines into text fragments. The output-length cap and
//! safety thresholds are fixed policy, not configuration.

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{json, Value};

use echo_core::ports::{GeneratePort, ReplyStream, StreamEvent};
use echo_types::config::UpstreamConfig;
use echo_types::message::{Message, Role};
use echo_types::{ChatError, Result};

const SYSTEM_INSTRUCTION: &str = "You are a helpful AI assistant.";
const MAX_OUTPUT_TOKENS: u32 = 2048;
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

pub struct GeminiClient {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl GeminiClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse&key={}",
            self.config.base_url(),
            self.config.model,
            self.config.api_key,
        )
    }
}

pub(crate) fn gemini_request_body(history: &[Message]) -> Value {
    let contents: Vec<Value> = history
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::User => "user",
                Role::Model => "model",
            };
            json!({ "role": role, "parts": [{ "text": m.content }] })
        })
        .collect();

    let safety: Vec<Value> = SAFETY_CATEGORIES
        .iter()
        .map(|category| json!({ "category": category, "threshold": SAFETY_THRESHOLD }))
        .collect();

    json!({
        "contents": contents,
        "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
        "generationConfig": { "maxOutputTokens": MAX_OUTPUT_TOKENS },
        "safetySettings": safety,
    })
}

/// Parse one SSE line, returning its text fragment if it carries one.
fn parse_sse_line(line: &str) -> Option<String> {
    let payload = line.trim().strip_prefix("data: ")?;
    sse_data_text(payload).filter(|text| !text.is_empty())
}

/// Extract the text fragment from one SSE `data:` payload. Payloads
/// without candidate text (safety blocks, usage-only frames) yield `None`.
pub(crate) fn sse_data_text(payload: &str) -> Option<String> {
    let value: Value = serde_json::from_str(payload).ok()?;
    value["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(String::from)
}

#[async_trait]
impl GeneratePort for GeminiClient {
    async fn open_stream(&self, history: &[Message]) -> Result<ReplyStream> {
        let response = self
            .client
            .post(self.url())
            .json(&gemini_request_body(history))
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
            let mut buf = String::new();
            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(bytes) => {
                        // Chunk boundaries can split multi-byte characters;
                        // carry the incomplete tail to the next chunk.
                        pending.extend_from_slice(&bytes);
                        buf.push_str(&super::take_decoded(&mut pending));
                        while let Some(pos) = buf.find('\n') {
                            let line: String = buf.drain(..=pos).collect();
                            if let Some(text) = parse_sse_line(&line) {
                                yield StreamEvent::Delta(text);
                            }
                        }
                    }
                    Err(e) => {
                        yield StreamEvent::Error(e.to_string());
                        return;
                    }
                }
            }
            // A final data line may arrive without a trailing newline
            buf.push_str(&String::from_utf8_lossy(&pending));
            if let Some(text) = parse_sse_line(&buf) {
                yield StreamEvent::Delta(text);
            }
            yield StreamEvent::Done;
        };
        Ok(Box::pin(stream))
    }
}
