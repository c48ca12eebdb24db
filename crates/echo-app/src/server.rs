//! Relay server.
//!
//! A single endpoint, `POST /api/chat`, takes the full message history and
//! streams the generated reply back as plain text. The upstream API key
//! lives here, never in the chat client.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use futures::StreamExt;
use serde::Deserialize;

use echo_core::ports::{GeneratePort, StreamEvent};
use echo_types::message::{Message, Role};
use echo_types::{ChatError, Result};

#[derive(Deserialize)]
struct ChatRequest {
    history: Vec<Message>,
}

pub fn router(generator: Arc<dyn GeneratePort>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .with_state(generator)
}

pub async fn serve(addr: SocketAddr, generator: Arc<dyn GeneratePort>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ChatError::Network(format!("Cannot bind {}: {}", addr, e)))?;
    log::info!("Relay listening on http://{}", addr);
    axum::serve(listener, router(generator))
        .await
        .map_err(|e| ChatError::Network(e.to_string()))
}

async fn chat(
    State(generator): State<Arc<dyn GeneratePort>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    if let Err(reason) = validate_history(&request.history) {
        return (StatusCode::BAD_REQUEST, reason).into_response();
    }

    let stream = match generator.open_stream(&request.history).await {
        Ok(stream) => stream,
        Err(e) => {
            log::error!("Upstream request failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
        }
    };

    let body = stream.map(|event| match event {
        StreamEvent::Delta(text) => Ok(Bytes::from(text)),
        StreamEvent::Done => Ok(Bytes::new()),
        StreamEvent::Error(msg) => {
            log::error!("Upstream stream failed: {}", msg);
            Err(std::io::Error::other(msg))
        }
    });

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response()
}

/// A request is valid only when it ends with a non-empty user prompt.
fn validate_history(history: &[Message]) -> std::result::Result<(), &'static str> {
    match history.last() {
        Some(last) if last.role == Role::User && !last.content.is_empty() => Ok(()),
        Some(last) if last.role == Role::User => Err("Prompt is empty"),
        Some(_) => Err("Last message must be a user prompt"),
        None => Err("No messages provided"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_empty_history() {
        assert!(validate_history(&[]).is_err());
    }

    #[test]
    fn test_validate_rejects_trailing_model_message() {
        let history = vec![Message::user("hi"), Message::model("hello")];
        assert!(validate_history(&history).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_trailing_prompt() {
        assert!(validate_history(&[Message::user("")]).is_err());

        let history = vec![Message::user("hi"), Message::model("hello"), Message::user("")];
        assert!(validate_history(&history).is_err());
    }

    #[test]
    fn test_validate_accepts_trailing_user_prompt() {
        let history = vec![
            Message::user("hi"),
            Message::model("hello"),
            Message::user("how are you?"),
        ];
        assert!(validate_history(&history).is_ok());
    }
}
