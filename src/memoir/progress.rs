//! Dialogue progress counters shown in the client's progress bar.

use serde::Serialize;

use super::conversation::{ChatMessage, count_user_answers};
use super::themes::Theme;

/// Share of `max_questions` after which a memoir may be generated.
const GENERATE_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionProgress {
    pub theme: String,
    pub current_count: usize,
    pub max_questions: usize,
    /// Percentage in `0.0..=100.0`.
    pub progress: f64,
    pub can_generate_memoir: bool,
    pub is_complete: bool,
}

pub fn question_progress(theme: &str, messages: &[ChatMessage]) -> QuestionProgress {
    let t = Theme::lookup(theme);
    let current = count_user_answers(messages);
    let max = t.max_questions;

    let progress = (current as f64 / max as f64 * 100.0).min(100.0);
    let threshold = (max as f64 * GENERATE_THRESHOLD).ceil() as usize;

    QuestionProgress {
        theme: t.name.to_string(),
        current_count: current,
        max_questions: max,
        progress,
        can_generate_memoir: current >= threshold,
        is_complete: current >= max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(n: usize) -> Vec<ChatMessage> {
        (0..n).map(|i| ChatMessage::user(format!("answer {i}"))).collect()
    }

    #[test]
    fn empty_dialogue_is_zero() {
        let p = question_progress("童年时光", &[]);
        assert_eq!(p.current_count, 0);
        assert_eq!(p.max_questions, 8);
        assert_eq!(p.progress, 0.0);
        assert!(!p.can_generate_memoir);
        assert!(!p.is_complete);
    }

    #[test]
    fn sixty_percent_unlocks_generation() {
        // ceil(8 * 0.6) = 5
        assert!(!question_progress("童年时光", &answers(4)).can_generate_memoir);
        assert!(question_progress("童年时光", &answers(5)).can_generate_memoir);
        // ceil(6 * 0.6) = 4
        assert!(question_progress("人生感悟", &answers(4)).can_generate_memoir);
    }

    #[test]
    fn progress_caps_at_hundred() {
        let p = question_progress("人生感悟", &answers(9));
        assert_eq!(p.progress, 100.0);
        assert!(p.is_complete);
    }

    #[test]
    fn only_user_turns_count() {
        let mut history = answers(2);
        history.push(ChatMessage::assistant("下一个问题"));
        history.push(ChatMessage::system("prompt"));
        let p = question_progress("工作经历", &history);
        assert_eq!(p.current_count, 2);
        assert_eq!(p.progress, 20.0);
    }

    #[test]
    fn roleless_turns_do_not_count() {
        let history: Vec<ChatMessage> =
            serde_json::from_str(r#"[{"role":"tool","content":"x"},{}]"#).unwrap();
        let p = question_progress("童年时光", &history);
        assert_eq!(p.current_count, 0);
        assert!(!p.can_generate_memoir);
    }

    #[test]
    fn unknown_theme_uses_default_limit() {
        let p = question_progress("未知主题", &answers(1));
        assert_eq!(p.theme, "童年时光");
        assert_eq!(p.max_questions, 8);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(question_progress("童年时光", &answers(8))).unwrap();
        assert_eq!(json["currentCount"], 8);
        assert_eq!(json["isComplete"], true);
        assert_eq!(json["canGenerateMemoir"], true);
    }
}
