//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete backends. Each backend answers the
//! three kinds of `/api/chat` request directly: the next interview question,
//! a finished memoir, and a free-form reply. The template backend answers
//! them from static tables; the OpenAI-compatible backend builds prompts and
//! calls the vendor.
//!
//! Provider instances are shared immutable capabilities: clone them freely.

pub mod providers;

use thiserror::Error;

use crate::memoir::conversation::dialogue_turns;
use crate::memoir::{ChatMessage, GeneratedMemoir};

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("provider request failed: {0}")]
    Request(String),
}

// ── Response ──────────────────────────────────────────────────────────────────

/// Token usage reported by the vendor, when it reports any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LlmUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Option<LlmUsage>,
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
///
/// Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency.
/// Adding a backend = new module + new variant + new match arms.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Template(providers::template::TemplateProvider),
    OpenAiCompatible(providers::openai_compatible::OpenAiCompatibleProvider),
}

impl LlmProvider {
    /// Short backend name for health output and logs.
    pub fn name(&self) -> &'static str {
        match self {
            LlmProvider::Template(_) => "template",
            LlmProvider::OpenAiCompatible(_) => "openai",
        }
    }

    pub fn is_template(&self) -> bool {
        matches!(self, LlmProvider::Template(_))
    }

    /// Next guiding question for `theme` given the dialogue so far.
    pub async fn next_question(
        &self,
        theme: &str,
        history: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        match self {
            LlmProvider::Template(p) => p.next_question(theme, history).await,
            LlmProvider::OpenAiCompatible(p) => p.next_question(theme, history).await,
        }
    }

    /// Memoir article written from the user's side of the dialogue.
    pub async fn write_memoir(
        &self,
        theme: &str,
        style: &str,
        history: &[ChatMessage],
    ) -> Result<GeneratedMemoir, ProviderError> {
        match self {
            LlmProvider::Template(p) => p.write_memoir(theme, style, history).await,
            LlmProvider::OpenAiCompatible(p) => p.write_memoir(theme, style, history).await,
        }
    }

    /// Untyped chat turn: the history is forwarded as sent, minus turns
    /// with an unrecognized role.
    pub async fn reply(&self, theme: &str, history: &[ChatMessage]) -> Result<String, ProviderError> {
        match self {
            LlmProvider::Template(p) => p.reply(theme, history).await,
            LlmProvider::OpenAiCompatible(p) => {
                p.complete_chat(&dialogue_turns(history)).await.map(|r| r.text)
            }
        }
    }
}
