//! Memoir row types and validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StoreError;

pub const ANONYMOUS_USER: &str = "anonymous";

/// A persisted memoir row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memoir {
    pub id: String,
    pub title: String,
    pub content: String,
    pub theme: String,
    pub style: String,
    /// Character count of `content`, fixed at write time.
    pub word_count: i64,
    /// Dialogue the memoir was generated from, as the client sent it.
    pub conversation_data: Value,
    pub created_at: String,
    pub updated_at: String,
    pub user_id: String,
    pub is_public: bool,
    pub views: i64,
}

/// List entry: a memoir without its body and dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoirSummary {
    pub id: String,
    pub title: String,
    pub theme: String,
    pub style: String,
    pub word_count: i64,
    pub created_at: String,
    pub user_id: String,
    pub views: i64,
}

/// Save request as sent by the client (`conversationData`, `userId`) or in
/// snake_case. Required fields are optional here so that a missing one is
/// reported as a validation error instead of a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewMemoir {
    pub title: Option<String>,
    pub content: Option<String>,
    pub theme: Option<String>,
    pub style: Option<String>,
    #[serde(alias = "conversationData")]
    pub conversation_data: Option<Value>,
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
    #[serde(alias = "isPublic")]
    pub is_public: Option<bool>,
}

/// A [`NewMemoir`] whose required fields are present and non-blank.
#[derive(Debug, Clone)]
pub(crate) struct ValidMemoir {
    pub title: String,
    pub content: String,
    pub theme: String,
    pub style: String,
    pub conversation_data: Value,
    pub user_id: String,
    pub is_public: bool,
}

impl NewMemoir {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        theme: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            theme: Some(theme.into()),
            style: Some(style.into()),
            ..Default::default()
        }
    }

    /// Names of required fields that are missing or blank, in field order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("content", &self.content),
            ("theme", &self.theme),
            ("style", &self.style),
        ]
        .into_iter()
        .filter(|(_, v)| v.as_deref().is_none_or(|s| s.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    pub(crate) fn validate(self) -> Result<ValidMemoir, StoreError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(StoreError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let user_id = self
            .user_id
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| ANONYMOUS_USER.to_string());

        Ok(ValidMemoir {
            title: self.title.unwrap_or_default().trim().to_string(),
            content: self.content.unwrap_or_default(),
            theme: self.theme.unwrap_or_default().trim().to_string(),
            style: self.style.unwrap_or_default().trim().to_string(),
            conversation_data: self.conversation_data.unwrap_or_else(|| Value::Array(Vec::new())),
            user_id,
            is_public: self.is_public.unwrap_or(false),
        })
    }
}

/// `word_count` as the client displays it: one count per character.
pub fn word_count(content: &str) -> i64 {
    content.chars().count() as i64
}
