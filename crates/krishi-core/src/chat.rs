//! Chat assistant request/response types

use crate::{Language, PREVIEW_CHARS};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Chat session identifier.
///
/// Accepts either a JSON string or number on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ChatId(pub String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for ChatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CreateChatRequest {
    pub language: Language,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextRequest {
    pub message: String,
    pub chat_id: ChatId,
    pub language: Language,
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateChatResponse {
    pub chat_id: Option<ChatId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatHistory {
    #[serde(default)]
    pub chats: Vec<ChatSummary>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredMessage {
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// `user` or `bot`; history bodies that omit it are treated as bot text
    #[serde(default)]
    pub sender: Option<String>,
}

impl StoredMessage {
    pub fn from_user(&self) -> bool {
        self.sender.as_deref() == Some("user")
    }

    /// `HH:MM` of the stored timestamp, if it parses
    pub fn time_label(&self) -> Option<String> {
        let raw = self.timestamp.as_deref()?;
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|dt| dt.format("%H:%M").to_string())
    }
}

/// One past chat session in the history sidebar
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatSummary {
    pub id: ChatId,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub messages: Vec<StoredMessage>,
}

impl ChatSummary {
    /// Last message truncated for the sidebar, or "New chat"
    pub fn preview(&self) -> String {
        match self.messages.last() {
            Some(msg) => truncate_preview(&msg.text),
            None => "New chat".to_string(),
        }
    }

    /// Creation time for display; falls back to the raw value
    pub fn created_label(&self) -> String {
        NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|dt| dt.format("%d/%m/%Y, %H:%M:%S").to_string())
            .unwrap_or_else(|_| self.created_at.clone())
    }

    /// Language recorded for the session
    pub fn language(&self) -> Language {
        Language::from_query(Some(&self.language))
    }
}

/// Sidebar entry derived from a `ChatSummary`
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: ChatId,
    pub title: String,
    pub created: String,
    pub language: String,
    pub preview: String,
    pub active: bool,
}

impl HistoryEntry {
    /// Link that reopens this chat in its own language
    pub fn href(&self) -> String {
        format!("/chat?chat_id={}&language={}", self.id, self.language)
    }
}

/// Build sidebar entries, numbering chats in server order
pub fn history_entries(chats: &[ChatSummary], current: Option<&ChatId>) -> Vec<HistoryEntry> {
    chats
        .iter()
        .enumerate()
        .map(|(index, chat)| HistoryEntry {
            id: chat.id.clone(),
            title: format!("Chat #{}", index + 1),
            created: chat.created_label(),
            language: chat.language.clone(),
            preview: chat.preview(),
            active: current == Some(&chat.id),
        })
        .collect()
}

fn truncate_preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextReply {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceReply {
    #[serde(default)]
    pub transcribed_text: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageReply {
    #[serde(default)]
    pub result: Option<Diagnosis>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Plant disease classification returned for an uploaded image
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Diagnosis {
    pub plant_type: String,
    pub disease: String,
    pub confidence: f64,
    pub recommendation: String,
}

impl Diagnosis {
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    /// Multi-line summary posted as the assistant reply
    pub fn summary(&self) -> String {
        format!(
            "Plant type: {}\nDisease: {}\nConfidence: {}\nRecommendation: {}",
            self.plant_type,
            self.disease,
            self.confidence_percent(),
            self.recommendation
        )
    }

    pub fn is_healthy(&self) -> bool {
        let disease = self.disease.to_lowercase();
        disease.contains("healthy") || disease.contains("स्वस्थ")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteChatResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error text that points at a broken chat session
pub fn is_session_problem(message: &str) -> bool {
    message.contains("session") || message.contains("chat_id")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_problem_detection() {
        assert!(is_session_problem("No active chat session"));
        assert!(is_session_problem("invalid chat_id"));
        assert!(!is_session_problem("Session expired"));
    }

    fn summary(id: &str, messages: &[&str]) -> ChatSummary {
        ChatSummary {
            id: ChatId::new(id),
            language: "hindi".into(),
            created_at: "2025-03-04T09:15:30.123456".into(),
            messages: messages
                .iter()
                .map(|m| StoredMessage { text: m.to_string(), timestamp: None, sender: None })
                .collect(),
        }
    }

    #[test]
    fn test_chat_id_accepts_number_or_string() {
        let a: CreateChatResponse = serde_json::from_str(r#"{"chat_id": 42}"#).unwrap();
        let b: CreateChatResponse = serde_json::from_str(r#"{"chat_id": "abc-1"}"#).unwrap();
        assert_eq!(a.chat_id, Some(ChatId::new("42")));
        assert_eq!(b.chat_id, Some(ChatId::new("abc-1")));
    }

    #[test]
    fn test_preview_truncates_long_messages() {
        let long = "a".repeat(60);
        let chat = summary("1", &["hello", &long]);
        assert_eq!(chat.preview(), format!("{}...", "a".repeat(50)));
        assert_eq!(summary("2", &[]).preview(), "New chat");
        assert_eq!(summary("3", &["short"]).preview(), "short");
    }

    #[test]
    fn test_history_entries_mark_active() {
        let chats = vec![summary("a", &[]), summary("b", &["hi"])];
        let current = ChatId::new("b");
        let entries = history_entries(&chats, Some(&current));
        assert_eq!(entries[0].title, "Chat #1");
        assert!(!entries[0].active);
        assert!(entries[1].active);
        assert_eq!(entries[1].href(), "/chat?chat_id=b&language=hindi");
        assert_eq!(entries[0].created, "04/03/2025, 09:15:30");
    }

    #[test]
    fn test_stored_message_sender_and_time() {
        let msgs: Vec<StoredMessage> = serde_json::from_str(
            r#"[{"text": "hi", "sender": "user", "timestamp": "2025-03-04T09:15:30.123456"},
                {"text": "hello"}]"#,
        )
        .unwrap();
        assert!(msgs[0].from_user());
        assert_eq!(msgs[0].time_label().as_deref(), Some("09:15"));
        assert!(!msgs[1].from_user());
        assert_eq!(msgs[1].time_label(), None);
    }

    #[test]
    fn test_diagnosis_summary() {
        let d = Diagnosis {
            plant_type: "Tomato".into(),
            disease: "Tomato healthy".into(),
            confidence: 0.9731,
            recommendation: "No action needed".into(),
        };
        assert_eq!(
            d.summary(),
            "Plant type: Tomato\nDisease: Tomato healthy\nConfidence: 97.3%\nRecommendation: No action needed"
        );
        assert!(d.is_healthy());
    }

    #[test]
    fn test_text_request_serialization() {
        let req = TextRequest {
            message: "hello".into(),
            chat_id: ChatId::new("7"),
            language: Language::English,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["chat_id"], "7");
        assert_eq!(json["language"], "english");
    }
}
