//! Chat transcript persistence.
//!
//! One JSON file per session (`chat_<session_id>.json`) under a histories
//! directory. Session ids are timestamp strings, so lexicographic order is
//! chronological.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters of the first message shown in a session listing.
const PREVIEW_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse transcript: {0}")]
    MalformedTranscript(#[from] serde_json::Error),

    #[error("invalid session id: {id}")]
    InvalidSessionId { id: String },
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Listing entry for a stored session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub timestamp: String,
    pub preview: String,
}

/// Directory-backed transcript store.
#[derive(Debug, Clone)]
pub struct ChatHistoryStore {
    dir: PathBuf,
}

impl ChatHistoryStore {
    /// Opens (and creates if needed) the histories directory.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<Self, HistoryError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Returns a fresh timestamp-derived session id.
    pub fn new_session_id() -> String {
        Local::now().format("%Y%m%d_%H%M%S").to_string()
    }

    /// Persists the full transcript of a session, overwriting any previous
    /// file.
    pub fn save(&self, session_id: &str, messages: &[ChatMessage]) -> Result<(), HistoryError> {
        let path = self.session_path(session_id)?;
        let content = serde_json::to_string_pretty(messages)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Loads a session transcript; an unknown session is an empty one.
    pub fn load(&self, session_id: &str) -> Result<Vec<ChatMessage>, HistoryError> {
        let path = self.session_path(session_id)?;
        if !path.exists() {
            return Ok(vec![]);
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Lists stored sessions, newest first, with a preview of the opening
    /// message. Unreadable transcript files are skipped.
    pub fn list_sessions(&self) -> Result<Vec<SessionSummary>, HistoryError> {
        let mut sessions = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(session_id) = name
                .strip_prefix("chat_")
                .and_then(|n| n.strip_suffix(".json"))
            else {
                continue;
            };

            let messages: Vec<ChatMessage> = match std::fs::read_to_string(&path)
                .map_err(HistoryError::from)
                .and_then(|c| Ok(serde_json::from_str(&c)?))
            {
                Ok(messages) => messages,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable transcript");
                    continue;
                }
            };

            let preview = messages
                .first()
                .map(|m| truncate_chars(&m.content, PREVIEW_LEN))
                .unwrap_or_else(|| "Cuộc hội thoại trống".to_string());

            sessions.push(SessionSummary {
                id: session_id.to_string(),
                timestamp: session_id.to_string(),
                preview,
            });
        }

        sessions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(sessions)
    }

    /// Returns the histories directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn session_path(&self, session_id: &str) -> Result<PathBuf, HistoryError> {
        // Session ids become file names; reject anything path-like.
        if session_id.is_empty()
            || !session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(HistoryError::InvalidSessionId {
                id: session_id.to_string(),
            });
        }
        Ok(self.dir.join(format!("chat_{session_id}.json")))
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ChatHistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ChatHistoryStore::new(dir.path().join("chat_histories")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_save_load_roundtrip() {
        let (_guard, store) = store();
        let messages = vec![
            ChatMessage::user("Xin chào"),
            ChatMessage::assistant("Chào bạn, tôi giúp gì được?"),
        ];

        store.save("20250101_080000", &messages).unwrap();

        assert_eq!(store.load("20250101_080000").unwrap(), messages);
    }

    #[test]
    fn test_unknown_session_loads_empty() {
        let (_guard, store) = store();
        assert!(store.load("20990101_000000").unwrap().is_empty());
    }

    #[test]
    fn test_list_sessions_newest_first_with_preview() {
        let (_guard, store) = store();
        store
            .save("20250101_080000", &[ChatMessage::user("câu hỏi đầu tiên")])
            .unwrap();
        store
            .save("20250102_090000", &[ChatMessage::user("câu hỏi thứ hai")])
            .unwrap();

        let sessions = store.list_sessions().unwrap();

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, "20250102_090000");
        assert_eq!(sessions[0].preview, "câu hỏi thứ hai");
        assert_eq!(sessions[1].id, "20250101_080000");
    }

    #[test]
    fn test_long_preview_is_truncated() {
        let (_guard, store) = store();
        let long = "x".repeat(80);
        store
            .save("20250103_000000", &[ChatMessage::user(long)])
            .unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions[0].preview.chars().count(), PREVIEW_LEN + 3);
        assert!(sessions[0].preview.ends_with("..."));
    }

    #[test]
    fn test_empty_session_preview() {
        let (_guard, store) = store();
        store.save("20250104_000000", &[]).unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions[0].preview, "Cuộc hội thoại trống");
    }

    #[test]
    fn test_path_like_session_id_rejected() {
        let (_guard, store) = store();

        let err = store.save("../escape", &[]).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidSessionId { .. }));

        let err = store.load("a/b").unwrap_err();
        assert!(matches!(err, HistoryError::InvalidSessionId { .. }));
    }

    #[test]
    fn test_new_session_id_shape() {
        let id = ChatHistoryStore::new_session_id();
        assert_eq!(id.len(), 15);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c == '_'));
    }

    #[test]
    fn test_unreadable_transcript_is_skipped_in_listing() {
        let (_guard, store) = store();
        store
            .save("20250105_000000", &[ChatMessage::user("ok")])
            .unwrap();
        std::fs::write(store.dir().join("chat_broken.json"), "{nope").unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, "20250105_000000");
    }
}
