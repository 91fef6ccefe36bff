//! Template provider: answers from the static theme/style tables.
//! Selected when no LLM API key is configured; never fails.

use crate::llm::ProviderError;
use crate::memoir::conversation::user_utterances;
use crate::memoir::{ChatMessage, GeneratedMemoir, generator};

#[derive(Debug, Clone)]
pub struct TemplateProvider;

impl TemplateProvider {
    pub async fn next_question(
        &self,
        theme: &str,
        history: &[ChatMessage],
    ) -> Result<String, ProviderError> {
        Ok(generator::next_question(theme, history))
    }

    pub async fn write_memoir(
        &self,
        theme: &str,
        style: &str,
        history: &[ChatMessage],
    ) -> Result<GeneratedMemoir, ProviderError> {
        Ok(generator::generate_memoir(theme, style, &user_utterances(history)))
    }

    /// Without a model there is no free-form reply; keep the interview going.
    pub async fn reply(&self, theme: &str, history: &[ChatMessage]) -> Result<String, ProviderError> {
        Ok(generator::next_question(theme, history))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memoir::themes::Theme;

    #[tokio::test]
    async fn question_follows_generator() {
        let history = vec![ChatMessage::assistant("q"), ChatMessage::user("a")];
        let q = TemplateProvider.next_question("家庭回忆", &history).await.unwrap();
        assert_eq!(q, Theme::lookup("家庭回忆").questions[1]);
    }

    #[tokio::test]
    async fn memoir_uses_only_user_turns() {
        let history = vec![
            ChatMessage::assistant("您小时候住在哪？"),
            ChatMessage::user("我小时候住在北京。"),
        ];
        let m = TemplateProvider.write_memoir("童年时光", "warm", &history).await.unwrap();
        assert!(m.content.contains("我小时候住在北京。"));
        assert!(!m.content.contains("您小时候住在哪？"));
    }

    #[tokio::test]
    async fn reply_never_errors() {
        assert!(TemplateProvider.reply("未知", &[]).await.is_ok());
    }
}
