//! Chat session view model
//!
//! Bubbles are pre-rendered to HTML here so views only inject markup.
//! At most one reply is pending at a time; the typing indicator marks it.

use krishi_core::{
    escape_html, format_message, history_entries, is_session_problem, ChatId, ChatSummary,
    HistoryEntry, ImageReply, Language, Text, TextReply, TextRequest, ValidationError, VoiceReply,
};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatBubble {
    pub id: usize,
    pub sender: Sender,
    /// Sanitised markup for the bubble body
    pub html: String,
    pub image_url: Option<String>,
    /// `HH:MM` when the bubble was added
    pub time: String,
}

impl ChatBubble {
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Input tab of the chat page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputTab {
    #[default]
    Text,
    Voice,
    Image,
}

impl InputTab {
    pub const ALL: [InputTab; 3] = [Self::Text, Self::Voice, Self::Image];

    pub fn label(&self, lang: Language) -> &'static str {
        match self {
            Self::Text => lang.t(Text::TextTab),
            Self::Voice => lang.t(Text::VoiceTab),
            Self::Image => lang.t(Text::ImageTab),
        }
    }
}

/// Microphone recorder status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording,
    Processing,
    MicrophoneError,
    AudioError,
}

impl RecorderState {
    pub fn status(&self, lang: Language) -> &'static str {
        let text = match self {
            Self::Idle => Text::RecordIdle,
            Self::Recording => Text::Recording,
            Self::Processing => Text::ProcessingAudio,
            Self::MicrophoneError => Text::MicrophoneError,
            Self::AudioError => Text::AudioError,
        };
        lang.t(text)
    }

    pub fn is_recording(&self) -> bool {
        *self == Self::Recording
    }
}

/// What the page does after a reply settles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyOutcome {
    pub audio_url: Option<String>,
    /// Ask whether to start a new chat
    pub offer_new_chat: bool,
    /// Healthy plant diagnosis
    pub celebrate: bool,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    pub chat_id: Option<ChatId>,
    pub language: Language,
    pub tab: InputTab,
    pub recorder: RecorderState,
    bubbles: Vec<ChatBubble>,
    typing: bool,
    next_id: usize,
    history: Vec<HistoryEntry>,
    /// Stored messages of the current chat were turned into bubbles
    restored: bool,
}

impl ChatSession {
    pub fn new(chat_id: Option<ChatId>, language: Language) -> Self {
        Self {
            chat_id,
            language,
            tab: InputTab::default(),
            recorder: RecorderState::default(),
            bubbles: Vec::new(),
            typing: false,
            next_id: 0,
            history: Vec::new(),
            restored: false,
        }
    }

    pub fn bubbles(&self) -> &[ChatBubble] {
        &self.bubbles
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Refresh the sidebar. The first load that contains the current chat
    /// also replays its stored messages ahead of anything sent since.
    pub fn set_history(&mut self, chats: &[ChatSummary]) {
        self.history = history_entries(chats, self.chat_id.as_ref());
        if self.restored {
            return;
        }
        let Some(current) = chats.iter().find(|c| self.chat_id.as_ref() == Some(&c.id)) else {
            return;
        };
        self.restored = true;

        let live = std::mem::take(&mut self.bubbles);
        for stored in &current.messages {
            let html = if stored.from_user() {
                user_html(&stored.text)
            } else {
                format_message(&stored.text)
            };
            let sender = if stored.from_user() { Sender::User } else { Sender::Bot };
            let time = stored.time_label().unwrap_or_default();
            self.push_at(sender, html, None, time);
        }
        self.bubbles.extend(live);
    }

    /// Take over a chat created for this page and greet the farmer
    pub fn adopt(&mut self, chat_id: ChatId) {
        self.chat_id = Some(chat_id);
        self.restored = true;
        let welcome = self.language.t(Text::Welcome);
        self.push_bot(welcome);
    }

    pub fn is_current(&self, id: &ChatId) -> bool {
        self.chat_id.as_ref() == Some(id)
    }

    fn session(&self) -> Result<ChatId, ValidationError> {
        self.chat_id.clone().ok_or(ValidationError::NoChatSession)
    }

    // ========================================================================
    // Bubbles
    // ========================================================================

    /// User text is escaped unless it already carries markup
    pub fn push_user(&mut self, text: &str, image_url: Option<String>) -> usize {
        self.push(Sender::User, user_html(text), image_url)
    }

    /// Bot replies go through the message formatter
    pub fn push_bot(&mut self, text: &str) -> usize {
        self.push(Sender::Bot, format_message(text), None)
    }

    fn push(&mut self, sender: Sender, html: String, image_url: Option<String>) -> usize {
        let time = chrono::Local::now().format("%H:%M").to_string();
        self.push_at(sender, html, image_url, time)
    }

    fn push_at(&mut self, sender: Sender, html: String, image_url: Option<String>, time: String) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.bubbles.push(ChatBubble {
            id,
            sender,
            html,
            image_url,
            time,
        });
        id
    }

    fn error_bubble(&mut self, message: &str) {
        let text = format!("{}{}", self.language.t(Text::ChatErrorPrefix), message);
        self.push_bot(&text);
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Validate and post the user's text; shows the typing indicator
    pub fn begin_text(&mut self, raw: &str) -> Result<TextRequest, ValidationError> {
        let message = raw.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        let chat_id = self.session()?;

        self.push_user(message, None);
        self.typing = true;
        Ok(TextRequest {
            message: message.to_string(),
            chat_id,
            language: self.language,
        })
    }

    /// Settle a text request; `Err` carries the transport error message
    pub fn finish_text(&mut self, result: Result<TextReply, String>) -> ReplyOutcome {
        self.typing = false;

        let failure = match result {
            Ok(TextReply { error: Some(e), .. }) | Err(e) => e,
            Ok(reply) => {
                self.push_bot(&reply.response);
                return ReplyOutcome {
                    audio_url: reply.audio_url.filter(|u| !u.is_empty()),
                    ..ReplyOutcome::default()
                };
            }
        };

        warn!(error = %failure, "text reply failed");
        self.error_bubble(&failure);
        ReplyOutcome {
            offer_new_chat: is_session_problem(&failure),
            ..ReplyOutcome::default()
        }
    }

    // ========================================================================
    // Voice
    // ========================================================================

    pub fn start_recording(&mut self) -> Result<(), ValidationError> {
        self.session()?;
        self.recorder = RecorderState::Recording;
        Ok(())
    }

    pub fn microphone_failed(&mut self) {
        self.recorder = RecorderState::MicrophoneError;
    }

    /// Recording stopped; the assembled clip is on its way
    pub fn stop_recording(&mut self) {
        self.recorder = RecorderState::Processing;
        self.typing = true;
    }

    pub fn finish_voice(&mut self, result: Result<VoiceReply, String>) -> ReplyOutcome {
        self.typing = false;

        match result {
            Ok(reply) if reply.error.is_none() || reply.response.is_some() => {
                if let Some(text) = reply.transcribed_text.filter(|t| !t.is_empty()) {
                    self.push_user(&text, None);
                }
                if let Some(response) = reply.response {
                    self.push_bot(&response);
                }
                self.recorder = RecorderState::Idle;
                ReplyOutcome {
                    audio_url: reply.audio_url.filter(|u| !u.is_empty()),
                    ..ReplyOutcome::default()
                }
            }
            Ok(VoiceReply { error, .. }) => {
                warn!(error = ?error, "voice reply failed");
                self.voice_failed()
            }
            Err(e) => {
                warn!(error = %e, "voice request failed");
                self.voice_failed()
            }
        }
    }

    fn voice_failed(&mut self) -> ReplyOutcome {
        self.recorder = RecorderState::AudioError;
        let text = self.language.t(Text::VoiceFailed);
        self.push_bot(text);
        ReplyOutcome::default()
    }

    // ========================================================================
    // Image
    // ========================================================================

    /// Post the plant photo; `preview_url` is a local object URL
    pub fn begin_image(&mut self, preview_url: Option<String>) -> Result<(), ValidationError> {
        let preview_url = preview_url.ok_or(ValidationError::NoImageSelected)?;
        self.session()?;

        let caption = self.language.t(Text::ImageUploaded);
        self.push_user(caption, Some(preview_url));
        self.typing = true;
        Ok(())
    }

    pub fn finish_image(&mut self, result: Result<ImageReply, String>) -> ReplyOutcome {
        self.typing = false;

        match result {
            Ok(ImageReply { result: Some(diagnosis), audio_url, .. }) => {
                self.push_bot(&diagnosis.summary());
                ReplyOutcome {
                    audio_url: audio_url.filter(|u| !u.is_empty()),
                    celebrate: diagnosis.is_healthy(),
                    ..ReplyOutcome::default()
                }
            }
            Ok(ImageReply { error: Some(e), .. }) => {
                self.push_bot(&format!("Error: {}", e));
                ReplyOutcome::default()
            }
            Ok(_) => ReplyOutcome::default(),
            Err(e) => {
                warn!(error = %e, "image request failed");
                let text = self.language.t(Text::ImageFailed);
                self.push_bot(text);
                ReplyOutcome::default()
            }
        }
    }
}

fn user_html(text: &str) -> String {
    if text.contains("<img") || text.contains("<br>") {
        text.to_string()
    } else {
        escape_html(text)
    }
}

/// Target of the chat page for a freshly created or selected chat
pub fn chat_href(chat_id: &ChatId, language: Language) -> String {
    format!("/chat?chat_id={}&language={}", chat_id, language.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_core::Diagnosis;

    fn session() -> ChatSession {
        ChatSession::new(Some(ChatId::new("7")), Language::English)
    }

    #[test]
    fn test_text_requires_message_and_session() {
        let mut chat = session();
        assert_eq!(chat.begin_text("   ").err(), Some(ValidationError::EmptyMessage));

        let mut orphan = ChatSession::new(None, Language::English);
        assert_eq!(orphan.begin_text("hi").err(), Some(ValidationError::NoChatSession));
        assert!(orphan.bubbles().is_empty());

        let request = chat.begin_text("  <b>hi</b> ").unwrap();
        assert_eq!(request.message, "<b>hi</b>");
        assert_eq!(request.chat_id, ChatId::new("7"));
        assert!(chat.is_typing());
        assert_eq!(chat.bubbles()[0].html, "&lt;b&gt;hi&lt;/b&gt;");
    }

    #[test]
    fn test_text_reply_replaces_typing() {
        let mut chat = session();
        chat.begin_text("hello").unwrap();
        let reply = TextReply {
            response: "**Sow** now".into(),
            audio_url: Some("/static/a.mp3".into()),
            error: None,
        };
        let outcome = chat.finish_text(Ok(reply));

        assert!(!chat.is_typing());
        assert_eq!(outcome.audio_url.as_deref(), Some("/static/a.mp3"));
        let bot = &chat.bubbles()[1];
        assert_eq!(bot.sender, Sender::Bot);
        assert!(bot.html.contains("<strong>Sow</strong>"));
    }

    #[test]
    fn test_session_errors_offer_new_chat() {
        let mut chat = ChatSession::new(Some(ChatId::new("7")), Language::Hindi);
        chat.begin_text("hello").unwrap();
        let outcome = chat.finish_text(Err("invalid chat_id".into()));

        assert!(outcome.offer_new_chat);
        assert!(chat.bubbles()[1].html.starts_with("मुझे खेद है"));

        chat.begin_text("again").unwrap();
        let inline = TextReply { error: Some("model offline".into()), ..TextReply::default() };
        assert!(!chat.finish_text(Ok(inline)).offer_new_chat);
        assert_eq!(chat.bubbles().len(), 4);
    }

    #[test]
    fn test_voice_round_trip() {
        let mut chat = session();
        chat.start_recording().unwrap();
        assert!(chat.recorder.is_recording());
        chat.stop_recording();
        assert_eq!(chat.recorder, RecorderState::Processing);
        assert!(chat.is_typing());

        let reply = VoiceReply {
            transcribed_text: Some("when to sow wheat".into()),
            response: Some("November".into()),
            audio_url: None,
            error: None,
        };
        chat.finish_voice(Ok(reply));
        assert_eq!(chat.recorder, RecorderState::Idle);
        assert!(chat.bubbles()[0].is_user());
        assert!(!chat.bubbles()[1].is_user());

        chat.finish_voice(Err("offline".into()));
        assert_eq!(chat.recorder, RecorderState::AudioError);
        assert_eq!(chat.recorder.status(Language::English), "Error processing audio");
    }

    #[test]
    fn test_image_diagnosis() {
        let mut chat = session();
        assert_eq!(chat.begin_image(None).err(), Some(ValidationError::NoImageSelected));

        chat.begin_image(Some("blob:1".into())).unwrap();
        assert_eq!(chat.bubbles()[0].image_url.as_deref(), Some("blob:1"));

        let reply = ImageReply {
            result: Some(Diagnosis {
                plant_type: "Tomato".into(),
                disease: "Healthy".into(),
                confidence: 0.9876,
                recommendation: "None".into(),
            }),
            audio_url: None,
            error: None,
        };
        let outcome = chat.finish_image(Ok(reply));
        assert!(outcome.celebrate);
        assert!(chat.bubbles()[1].html.contains("Confidence: 98.8%"));
    }

    fn stored_chat(id: u32, messages: &str) -> Vec<ChatSummary> {
        serde_json::from_str(&format!(
            r#"[{{"id": {}, "language": "english", "created_at": "", "messages": {}}}]"#,
            id, messages
        ))
        .unwrap()
    }

    #[test]
    fn test_reopened_chat_replays_stored_messages() {
        let mut chat = session();
        let chats = stored_chat(
            7,
            r#"[{"text": "when to sow?", "sender": "user", "timestamp": "2025-03-04T09:15:30"},
                {"text": "**November**", "sender": "bot"}]"#,
        );
        chat.set_history(&chats);

        assert_eq!(chat.bubbles().len(), 2);
        assert!(chat.bubbles()[0].is_user());
        assert_eq!(chat.bubbles()[0].time, "09:15");
        assert!(chat.bubbles()[1].html.contains("<strong>November</strong>"));

        // later history reloads only refresh the sidebar
        chat.begin_text("and rice?").unwrap();
        chat.set_history(&chats);
        assert_eq!(chat.bubbles().len(), 3);
    }

    #[test]
    fn test_history_of_other_chats_leaves_bubbles_alone() {
        let mut chat = session();
        chat.set_history(&stored_chat(8, r#"[{"text": "elsewhere"}]"#));
        assert!(chat.bubbles().is_empty());

        chat.set_history(&stored_chat(7, r#"[{"text": "earlier"}]"#));
        assert_eq!(chat.bubbles().len(), 1);
    }

    #[test]
    fn test_adopted_chat_gets_welcome() {
        let mut chat = ChatSession::new(None, Language::Hindi);
        assert!(chat.begin_text("hi").is_err());

        chat.adopt(ChatId::new("9"));
        assert!(chat.is_current(&ChatId::new("9")));
        assert_eq!(chat.bubbles().len(), 1);
        assert!(chat.bubbles()[0].html.starts_with("नमस्ते"));

        // the server copy of the fresh chat must not duplicate the greeting
        chat.set_history(&stored_chat(9, r#"[]"#));
        assert_eq!(chat.bubbles().len(), 1);
        assert!(chat.begin_text("hi").is_ok());
    }

    #[test]
    fn test_history_marks_current_chat() {
        let mut chat = session();
        let chats: Vec<ChatSummary> = serde_json::from_str(
            r#"[{"id": 7, "language": "english", "created_at": "", "messages": []},
                {"id": 8, "language": "hindi", "created_at": "", "messages": []}]"#,
        )
        .unwrap();
        chat.set_history(&chats);
        let active: Vec<bool> = chat.history().iter().map(|h| h.active).collect();
        assert_eq!(active, vec![true, false]);
        assert_eq!(chat_href(&ChatId::new("8"), Language::Hindi), "/chat?chat_id=8&language=hindi");
    }
}
