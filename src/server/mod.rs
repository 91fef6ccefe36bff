//! HTTP server: axum router, shared state and the serve loop.
//!
//! ## URL layout
//!
//! ```text
//! GET  /                          health
//! POST /api/chat                  next question | memoir | free reply
//! POST /api/tts                   text → audio/wav
//! POST /api/question-progress
//! GET  /api/writing-styles
//! POST /api/memoirs               save, 201
//! GET  /api/memoirs?userId=&limit=
//! GET  /api/memoirs/{id}          views + 1
//! GET  /memoir/{id}               HTML share page, views + 1
//! OPTIONS *                       CORS preflight
//! *                               404 {"error":"Not found"}
//! ```

mod api;
mod error;
mod page;

use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::llm::{LlmProvider, providers};
use crate::store::MemoirHandle;
use crate::tts::TtsProvider;

pub use error::ApiError;
pub use page::Pages;

// ── Shared request state ──────────────────────────────────────────────────────

/// Router state injected into every handler via [`axum::extract::State`].
///
/// Cheap to clone: every field is reference-counted or a small enum.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmProvider,
    pub tts: TtsProvider,
    pub store: MemoirHandle,
    pub pages: Arc<Pages>,
    /// Origin used to build share links, without a trailing slash.
    pub public_base_url: Arc<str>,
}

impl AppState {
    /// Open the store and construct providers from `config`.
    pub fn build(config: &Config) -> Result<Self, AppError> {
        let store = MemoirHandle::open(&config.store.db_path)
            .map_err(|e| AppError::Store(format!("{}: {e}", config.store.db_path.display())))?;
        let llm = providers::build(&config.llm, config.llm_api_key.clone())
            .map_err(|e| AppError::Config(e.to_string()))?;
        let tts = TtsProvider::build(&config.tts);
        let pages = Pages::new().map_err(|e| AppError::Config(format!("page templates: {e}")))?;

        info!(
            db = %config.store.db_path.display(),
            llm = llm.name(),
            tts = tts.is_configured(),
            "app state ready"
        );

        Ok(Self {
            llm,
            tts,
            store,
            pages: Arc::new(pages),
            public_base_url: Arc::from(config.server.public_base_url.as_str()),
        })
    }

    pub fn share_url(&self, id: &str) -> String {
        format!("{}/memoir/{id}", self.public_base_url)
    }
}

// ── Server loop ───────────────────────────────────────────────────────────────

/// Bind `config.server.bind_addr()` and serve until `shutdown` is cancelled.
pub async fn serve(config: &Config, state: AppState, shutdown: CancellationToken) -> Result<(), AppError> {
    let bind_addr = config.server.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::Server(format!("bind failed on {bind_addr}: {e}")))?;

    info!(%bind_addr, public_base_url = %state.public_base_url, "memoir backend listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Server(format!("server error: {e}")))?;

    info!("memoir backend shut down");
    Ok(())
}

// ── Router ────────────────────────────────────────────────────────────────────

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/",                       get(api::health))
        .route("/api/chat",               post(api::chat))
        .route("/api/tts",                post(api::tts))
        .route("/api/question-progress",  post(api::question_progress))
        .route("/api/writing-styles",     get(api::writing_styles))
        .route("/api/memoirs",            post(api::save_memoir).get(api::list_memoirs))
        .route("/api/memoirs/{id}",       get(api::get_memoir))
        .route("/memoir/{id}",            get(page::memoir_page))
        .fallback(api::not_found)
        .with_state(state)
        .layer(middleware::from_fn(cors))
}

const ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept, Authorization";
const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Permissive CORS on every response; preflight requests end here with 200.
async fn cors(req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    response
}
