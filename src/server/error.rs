//! HTTP error type.
//!
//! Every failing handler returns [`ApiError`]; the client always gets a
//! `{"error": "..."}` JSON body. Internal failures are logged here with
//! their detail and reach the client only as a short generic message.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use crate::llm::ProviderError;
use crate::store::StoreError;
use crate::tts::TtsError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// `public` goes to the client, `detail` to the log.
    Internal { public: &'static str, detail: String },
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn internal(public: &'static str, detail: impl std::fmt::Display) -> Self {
        ApiError::Internal { public, detail: detail.to_string() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m) | ApiError::NotFound(m) => m,
            ApiError::Internal { public, .. } => public,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { public, detail } = &self {
            error!(error = %detail, "{public}");
        }
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected request body");
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(msg) => ApiError::BadRequest(msg),
            other => ApiError::internal("Database error", other),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        ApiError::internal("LLM service error", e)
    }
}

impl From<TtsError> for ApiError {
    fn from(e: TtsError) -> Self {
        match e {
            TtsError::NotConfigured => ApiError::Internal {
                public: "TTS service not configured",
                detail: e.to_string(),
            },
            TtsError::InvalidText(_) => ApiError::BadRequest(e.to_string()),
            TtsError::Connection(_) | TtsError::Timeout => {
                ApiError::internal("TTS service connection error", e)
            }
            TtsError::Signing(_) | TtsError::Vendor { .. } => ApiError::internal("TTS service error", e),
        }
    }
}
