#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::error::*;
    use crate::event::*;
    use crate::message::*;
    use crate::session::*;

    // ─── Message Tests ───────────────────────────────────────

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
    }

    #[test]
    fn test_message_model() {
        let msg = Message::model("Hi there");
        assert_eq!(msg.role, Role::Model);
        assert_eq!(msg.content, "Hi there");
    }

    #[test]
    fn test_message_preserves_whitespace() {
        // Submission gating trims, storage must not
        let msg = Message::user("  padded  ");
        assert_eq!(msg.content, "  padded  ");
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::User).unwrap();
        assert_eq!(json, r#""user""#);

        let json = serde_json::to_string(&Role::Model).unwrap();
        assert_eq!(json, r#""model""#);
    }

    #[test]
    fn test_role_deserialization() {
        let role: Role = serde_json::from_str(r#""model""#).unwrap();
        assert_eq!(role, Role::Model);
    }

    #[test]
    fn test_message_serialization_roundtrip() {
        let msg = Message::user("test input");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, msg);
    }

    // ─── Session Tests ───────────────────────────────────────

    #[test]
    fn test_session_new() {
        let session = Session::new();
        assert!(!session.id.is_empty());
        assert_eq!(session.title, DEFAULT_TITLE);
        assert!(session.messages.is_empty());
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = Session::new();
        let b = Session::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_session_serialization_roundtrip() {
        let mut session = Session::new();
        session.messages.push(Message::user("hi"));
        session.messages.push(Message::model("hello"));

        let json = serde_json::to_string(&session).unwrap();
        let deserialized: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, session);
    }

    #[test]
    fn test_session_wire_format() {
        // Persisted layout must stay readable across versions:
        // { id, title, messages: [{ role, content }] }
        let json = r#"{"id":"s1","title":"Hi","messages":[{"role":"user","content":"Hi"}]}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.id, "s1");
        assert_eq!(session.messages[0].role, Role::User);
    }

    // ─── Event Tests ─────────────────────────────────────────

    #[test]
    fn test_event_session_id() {
        let events = [
            ChatEvent::Chunk {
                session_id: "s1".to_string(),
                text: "a".to_string(),
            },
            ChatEvent::Complete {
                session_id: "s1".to_string(),
                text: "ab".to_string(),
            },
            ChatEvent::Failed {
                session_id: "s1".to_string(),
                error: "boom".to_string(),
            },
            ChatEvent::TimedOut {
                session_id: "s1".to_string(),
            },
        ];
        for event in &events {
            assert_eq!(event.session_id(), "s1");
        }
    }

    #[test]
    fn test_event_serialization() {
        let event = ChatEvent::Chunk {
            session_id: "s1".to_string(),
            text: "Hel".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("Chunk"));
        assert!(json.contains("Hel"));
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_default_config() {
        let config = ChatConfig::default();
        assert_eq!(config.storage.backend, StorageBackendType::Auto);
        assert!(config.relay.endpoint.ends_with("/api/chat"));
    }

    #[test]
    fn test_upstream_base_url() {
        let mut upstream = UpstreamConfig::default();
        assert_eq!(upstream.base_url(), UpstreamConfig::DEFAULT_API_BASE);

        upstream.api_base = Some("http://localhost:9999".to_string());
        assert_eq!(upstream.base_url(), "http://localhost:9999");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = ChatConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: ChatConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.storage.backend, StorageBackendType::Auto);
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_error_display() {
        let err = ChatError::Storage("disk full".to_string());
        assert_eq!(err.to_string(), "Storage error: disk full");

        let err = ChatError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");

        let err = ChatError::Timeout(15000);
        assert_eq!(err.to_string(), "Timeout after 15000ms");
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{{invalid}}").unwrap_err();
        let chat_err: ChatError = serde_err.into();
        assert!(matches!(chat_err, ChatError::Serialization(_)));
    }
}
