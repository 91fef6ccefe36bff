//! Configuration loading with env-var overrides.
//!
//! # Module layout
//!
//! - **types**: Public configuration structs consumed by the server
//!   (`Config`, `LlmConfig`, `TtsConfig`, etc.).
//! - **raw**: Raw TOML deserialization types. These mirror the file shape
//!   and use serde defaults; kept private.
//! - **load**: Loading logic: `load`, `load_from`, `expand_home`.

mod load;
mod raw;
mod types;

pub use load::{EnvOverrides, expand_home, load, load_from};
pub use types::*;

impl Config {
    /// Safe `Config` for tests: template LLM, no TTS credentials, no
    /// external calls. The database lives under `work_dir`.
    pub fn test_default(work_dir: &std::path::Path) -> Self {
        Self {
            log_level: "info".into(),
            server: ServerConfig {
                bind_host: "127.0.0.1".into(),
                port: 0,
                public_base_url: "http://localhost:3000".into(),
            },
            store: StoreConfig {
                db_path: work_dir.join("memoirs.db"),
            },
            llm: LlmConfig {
                provider: "template".into(),
                openai: OpenAiConfig {
                    api_base_url: "http://localhost:0/v1/chat/completions".into(),
                    model: raw::default_model(),
                    temperature: 0.0,
                    max_tokens: 256,
                    timeout_seconds: 1,
                },
            },
            llm_api_key: None,
            tts: TtsConfig {
                voice: raw::default_voice(),
                speed: 40,
                volume: 80,
                pitch: 50,
                timeout_seconds: 1,
                credentials: None,
            },
        }
    }
}
