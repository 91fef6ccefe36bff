//! Public HTML share page for a single memoir.
//!
//! Templates are compiled into the binary and rendered with minijinja.
//! Names end in `.html`, so every interpolated value is HTML-escaped.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use minijinja::{Environment, context};
use tracing::error;

use crate::store::Memoir;

use super::AppState;

const MEMOIR_TEMPLATE: &str = "memoir.html";
const NOT_FOUND_TEMPLATE: &str = "not_found.html";
const ERROR_TEMPLATE: &str = "error.html";

/// Served when even the error template fails to render.
const PLAIN_ERROR: &str = "500 Internal Server Error";

pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(MEMOIR_TEMPLATE, include_str!("../../templates/memoir.html"))?;
        env.add_template(NOT_FOUND_TEMPLATE, include_str!("../../templates/not_found.html"))?;
        env.add_template(ERROR_TEMPLATE, include_str!("../../templates/error.html"))?;
        Ok(Self { env })
    }

    pub fn render_memoir(&self, memoir: &Memoir) -> Result<String, minijinja::Error> {
        let paragraphs: Vec<&str> = memoir
            .content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let created = memoir.created_at.get(..10).unwrap_or(&memoir.created_at);
        self.env.get_template(MEMOIR_TEMPLATE)?.render(context! {
            memoir => memoir,
            paragraphs => paragraphs,
            created => created,
        })
    }

    pub fn render_not_found(&self) -> Result<String, minijinja::Error> {
        self.env.get_template(NOT_FOUND_TEMPLATE)?.render(context! {})
    }

    pub fn render_error(&self) -> Result<String, minijinja::Error> {
        self.env.get_template(ERROR_TEMPLATE)?.render(context! {})
    }

    /// Styled 500 response, or plain text if that template fails too.
    fn error_response(&self) -> Response {
        match self.render_error() {
            Ok(html) => (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response(),
            Err(e) => {
                error!(error = %e, "error page render failed");
                (StatusCode::INTERNAL_SERVER_ERROR, PLAIN_ERROR).into_response()
            }
        }
    }
}

/// GET /memoir/{id}: counts as a read, like the JSON route.
pub(super) async fn memoir_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let memoir = match state.store.get_and_count_view(&id).await {
        Ok(m) => m,
        Err(e) => {
            error!(%id, error = %e, "memoir page lookup failed");
            return state.pages.error_response();
        }
    };

    let (status, rendered) = match &memoir {
        Some(m) => (StatusCode::OK, state.pages.render_memoir(m)),
        None => (StatusCode::NOT_FOUND, state.pages.render_not_found()),
    };

    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(%id, error = %e, "memoir page render failed");
            state.pages.error_response()
        }
    }
}
