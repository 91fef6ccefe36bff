//! Public configuration types.
//!
//! These are the resolved, ready-to-use structs the server consumes.
//! Raw TOML deserialization types live in `raw.rs`.

use std::path::PathBuf;

// ── Server ──────────────────────────────────────────────────────────────────

/// HTTP listener configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind (`0.0.0.0` for container deployments).
    pub bind_host: String,
    /// TCP port; overridden by `PORT`.
    pub port: u16,
    /// Base URL used to build memoir share links (no trailing slash).
    pub public_base_url: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

// ── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// SQLite database file (already expanded, no `~`).
    pub db_path: PathBuf,
}

// ── LLM ─────────────────────────────────────────────────────────────────────

/// OpenAI-compatible provider configuration (Moonshot by default).
/// Populated from `[llm.openai]` in the TOML.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// `"template"` or `"openai"` / `"moonshot"`.
    pub provider: String,
    pub openai: OpenAiConfig,
}

// ── TTS ─────────────────────────────────────────────────────────────────────

/// iFlytek credentials: env only, never TOML.
#[derive(Debug, Clone)]
pub struct IflytekCredentials {
    pub app_id: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct TtsConfig {
    /// Vendor voice name (`vcn`).
    pub voice: String,
    pub speed: u8,
    pub volume: u8,
    pub pitch: u8,
    /// Upper bound for one whole synthesis session.
    pub timeout_seconds: u64,
    /// `None` unless all three `IFLYTEK_*` variables are set.
    pub credentials: Option<IflytekCredentials>,
}

// ── Top-level ───────────────────────────────────────────────────────────────

/// Fully-resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub llm: LlmConfig,
    /// API key from `MOONSHOT_API_KEY`: `None` selects the template generator.
    pub llm_api_key: Option<String>,
    pub tts: TtsConfig,
}
