//! Raw TOML deserialization types.
//!
//! These structs mirror the TOML file shape and use `serde` defaults.
//! The `load` module converts them into the public `types` structs.

use serde::Deserialize;

// ── Top-level ────────────────────────────────────────────────────────────────

/// Raw TOML shape: serde target before resolution.
#[derive(Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub store: RawStore,
    #[serde(default)]
    pub llm: RawLlm,
    #[serde(default)]
    pub tts: RawTts,
}

#[derive(Deserialize)]
pub(super) struct RawServer {
    #[serde(default = "default_bind_host")]
    pub bind_host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub public_base_url: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            bind_host: default_bind_host(),
            port: default_port(),
            public_base_url: None,
            log_level: default_log_level(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct RawStore {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for RawStore {
    fn default() -> Self {
        Self { db_path: default_db_path() }
    }
}

// ── LLM ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawLlm {
    /// Named `default` in TOML to signal that other provider sections can
    /// coexist without being loaded.
    #[serde(rename = "default", default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub openai: RawOpenAi,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            openai: RawOpenAi::default(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct RawOpenAi {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
}

impl Default for RawOpenAi {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

// ── TTS ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawTts {
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_speed")]
    pub speed: u8,
    #[serde(default = "default_volume")]
    pub volume: u8,
    #[serde(default = "default_pitch")]
    pub pitch: u8,
    #[serde(default = "default_tts_timeout")]
    pub timeout_seconds: u64,
}

impl Default for RawTts {
    fn default() -> Self {
        Self {
            voice: default_voice(),
            speed: default_speed(),
            volume: default_volume(),
            pitch: default_pitch(),
            timeout_seconds: default_tts_timeout(),
        }
    }
}

// ── Defaults ────────────────────────────────────────────────────────────────

pub(super) fn default_bind_host() -> String { "0.0.0.0".to_string() }
pub(super) fn default_port() -> u16 { 3000 }
pub(super) fn default_log_level() -> String { "info".to_string() }
pub(super) fn default_db_path() -> String { "~/.memoir-backend/memoirs.db".to_string() }
pub(super) fn default_provider() -> String { "openai".to_string() }
pub(super) fn default_api_base_url() -> String {
    "https://api.moonshot.cn/v1/chat/completions".to_string()
}
pub(super) fn default_model() -> String { "moonshot-v1-8k".to_string() }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 2000 }
fn default_llm_timeout() -> u64 { 30 }
pub(super) fn default_voice() -> String { "xiaoyan".to_string() }
fn default_speed() -> u8 { 40 }
fn default_volume() -> u8 { 80 }
fn default_pitch() -> u8 { 50 }
fn default_tts_timeout() -> u64 { 30 }
