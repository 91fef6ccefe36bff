//! Axum handlers for the JSON routes.
//!
//! Bodies are taken as `Result<Json<T>, JsonRejection>` so malformed JSON
//! becomes an [`ApiError`] (JSON 400) instead of axum's plaintext rejection.

use axum::{
    Json,
    body::Body,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::memoir::themes::DEFAULT_THEME;
use crate::memoir::{ChatMessage, progress, styles};
use crate::store::{ANONYMOUS_USER, DEFAULT_LIST_LIMIT, NewMemoir};

use super::{ApiError, AppState};

const SERVICE_NAME: &str = "时光留声 AI回忆录助手 - 后端服务";

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct ChatRequest {
    #[serde(default)]
    messages: Option<Value>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    style: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct TtsRequest {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct ProgressRequest {
    #[serde(default)]
    messages: Option<Value>,
    #[serde(default)]
    theme: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct ListQuery {
    #[serde(default, rename = "userId", alias = "user_id")]
    user_id: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// `messages` must be a JSON array of chat turns.
fn parse_messages(messages: Option<Value>) -> Result<Vec<ChatMessage>, ApiError> {
    match messages {
        Some(v @ Value::Array(_)) => serde_json::from_value(v)
            .map_err(|e| ApiError::bad_request(format!("Invalid messages: {e}"))),
        _ => Err(ApiError::bad_request("Messages array is required")),
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /
pub(super) async fn health(State(state): State<AppState>) -> Json<Value> {
    let memoirs = match state.store.count().await {
        Ok(n) => Some(n),
        Err(e) => {
            warn!(error = %e, "health: memoir count failed");
            None
        }
    };
    Json(json!({
        "message": SERVICE_NAME,
        "status": "running",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "llm": state.llm.name(),
        "tts": state.tts.is_configured(),
        "memoirs": memoirs,
    }))
}

/// POST /api/chat
pub(super) async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = body?;
    let messages = parse_messages(req.messages)?;
    let theme = non_blank(req.theme).unwrap_or_else(|| DEFAULT_THEME.to_string());
    let kind = req.kind.unwrap_or_default();

    debug!(kind = %kind, theme = %theme, messages = messages.len(), llm = state.llm.name(), "chat request");

    match kind.as_str() {
        "question" => {
            let next_question = state.llm.next_question(&theme, &messages).await?;
            Ok(Json(json!({ "next_question": next_question })))
        }
        "memoir" => {
            let style = non_blank(req.style).unwrap_or_else(|| styles::DEFAULT_STYLE.to_string());
            let memoir = state.llm.write_memoir(&theme, &style, &messages).await?;
            Ok(Json(json!({ "title": memoir.title, "content": memoir.content })))
        }
        _ => {
            let content = state.llm.reply(&theme, &messages).await?;
            Ok(Json(json!({ "content": content })))
        }
    }
}

/// POST /api/tts: returns a complete WAV file or a JSON error, never both.
pub(super) async fn tts(
    State(state): State<AppState>,
    body: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let text = req
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Text is required"))?;

    let audio = state.tts.synthesize(&text).await?;
    debug!(text_bytes = text.len(), audio_bytes = audio.len(), "tts ok");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (header::CONTENT_LENGTH, audio.len().to_string()),
        ],
        Body::from(audio),
    )
        .into_response())
}

/// POST /api/question-progress
pub(super) async fn question_progress(
    body: Result<Json<ProgressRequest>, JsonRejection>,
) -> Result<Json<progress::QuestionProgress>, ApiError> {
    let Json(req) = body?;
    let messages = match req.messages {
        None => Vec::new(),
        some => parse_messages(some)?,
    };
    let theme = non_blank(req.theme).unwrap_or_else(|| DEFAULT_THEME.to_string());
    Ok(Json(progress::question_progress(&theme, &messages)))
}

/// GET /api/writing-styles
pub(super) async fn writing_styles() -> Json<Value> {
    Json(json!(styles::catalog()))
}

/// POST /api/memoirs
pub(super) async fn save_memoir(
    State(state): State<AppState>,
    body: Result<Json<NewMemoir>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(new) = body?;
    let missing = new.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let memoir = state.store.insert(new).await?;
    let share_url = state.share_url(&memoir.id);
    info!(id = %memoir.id, user_id = %memoir.user_id, word_count = memoir.word_count, "memoir saved");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "memoir": memoir, "shareUrl": share_url })),
    ))
}

/// GET /api/memoirs/{id}
pub(super) async fn get_memoir(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let memoir = state
        .store
        .get_and_count_view(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Memoir not found"))?;
    Ok(Json(json!(memoir)))
}

/// GET /api/memoirs?userId=&limit=
pub(super) async fn list_memoirs(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(q) = query.map_err(|e| ApiError::bad_request(format!("Invalid query: {}", e.body_text())))?;
    let user_id = non_blank(q.user_id).unwrap_or_else(|| ANONYMOUS_USER.to_string());
    let memoirs = state
        .store
        .list_by_user(&user_id, q.limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .await?;
    Ok(Json(json!(memoirs)))
}

/// Fallback for unmatched routes.
pub(super) async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
