//! Dialogue messages as exchanged with the mobile client.
//!
//! The client sends history in two shapes depending on the screen:
//! `{ "role": "user", "content": "…" }` and
//! `{ "speaker": "ai", "text": "…" }`. Both deserialize into [`ChatMessage`];
//! serialization always uses the `role`/`content` shape the LLM API expects.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    /// Missing or unrecognized role. Never counted as an answer and never
    /// sent to the LLM.
    Other,
}

impl Role {
    fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" => Role::User,
            "assistant" | "ai" => Role::Assistant,
            "system" => Role::System,
            _ => Role::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireMessage")]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Union of both client shapes. Missing fields default to empty.
#[derive(Deserialize, Default)]
#[serde(default)]
struct WireMessage {
    role: Option<String>,
    content: Option<String>,
    speaker: Option<String>,
    text: Option<String>,
}

impl From<WireMessage> for ChatMessage {
    fn from(w: WireMessage) -> Self {
        let role = w
            .role
            .or(w.speaker)
            .map(|r| Role::from_wire(&r))
            .unwrap_or(Role::Other);
        let content = w.content.or(w.text).unwrap_or_default();
        Self { role, content }
    }
}

/// Non-blank user contents, in dialogue order.
pub fn user_utterances(messages: &[ChatMessage]) -> Vec<&str> {
    messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.trim())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Turns the LLM understands, in order.
pub fn dialogue_turns(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    messages.iter().filter(|m| m.role != Role::Other).cloned().collect()
}

/// Number of user turns, blank ones included, since each recorded answer advances
/// the dialogue even if transcription came back empty.
pub fn count_user_answers(messages: &[ChatMessage]) -> usize {
    messages.iter().filter(|m| m.role == Role::User).count()
}
