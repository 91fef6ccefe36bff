//! Template generator: the offline stand-in for the LLM.
//!
//! Pure functions over the static [`Theme`] and [`WritingStyle`] tables.
//! Lookups never fail: unknown themes use 童年时光, unknown styles use `warm`.

use serde::Serialize;

use super::conversation::{ChatMessage, count_user_answers};
use super::styles::WritingStyle;
use super::themes::Theme;

/// Longest slice of a single answer quoted into the memoir body.
pub const MAX_QUOTE_CHARS: usize = 80;

const ELLIPSIS: &str = "……";
const SENTENCE_ENDINGS: &[char] = &['。', '！', '？', '…', '!', '?', '.', '”', '"'];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedMemoir {
    pub title: String,
    pub content: String,
}

/// First question of a dialogue: a short greeting carrying the theme's
/// first guiding question.
pub fn opening_question(theme: &str) -> String {
    let t = Theme::lookup(theme);
    format!("好的，让我们来聊聊关于“{}”的故事吧。{}", t.name, t.questions[0])
}

/// Next guiding question given the dialogue so far.
///
/// The question at index `answered` is asked, index 0 inside the opening.
/// Once `max_questions` answers are in, the closing invitation is returned.
pub fn next_question(theme: &str, messages: &[ChatMessage]) -> String {
    let t = Theme::lookup(theme);
    let answered = count_user_answers(messages);
    if answered == 0 {
        return opening_question(t.name);
    }
    if answered >= t.max_questions {
        return t.closing_question.to_string();
    }
    t.questions
        .get(answered)
        .copied()
        .unwrap_or(t.closing_question)
        .to_string()
}

/// Assemble a memoir from fixed phrase templates and the user's answers.
pub fn generate_memoir(theme: &str, style: &str, utterances: &[&str]) -> GeneratedMemoir {
    let t = Theme::lookup(theme);
    let s = WritingStyle::lookup(style);

    let title = t.titles[utterances.len() % t.titles.len()].to_string();

    let mut paragraphs = Vec::with_capacity(utterances.len() + 2);
    paragraphs.push(s.opening.replace("{theme}", t.name));

    if utterances.is_empty() {
        paragraphs.push(format!("{}{}", t.generic_body, s.reflections[0]));
    } else {
        for (i, utterance) in utterances.iter().enumerate() {
            let connector = s.connectors[i % s.connectors.len()];
            let reflection = s.reflections[i % s.reflections.len()];
            paragraphs.push(format!(
                "{connector}{}{reflection}",
                close_sentence(truncate_chars(utterance.trim(), MAX_QUOTE_CHARS))
            ));
        }
    }

    paragraphs.push(s.closing.replace("{theme}", t.name));

    GeneratedMemoir {
        title,
        content: paragraphs.join("\n\n"),
    }
}

/// Keep at most `max` characters, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str(ELLIPSIS);
    out
}

fn close_sentence(mut text: String) -> String {
    if !text.ends_with(SENTENCE_ENDINGS) {
        text.push('。');
    }
    text
}
