//! Configuration loading with env-var overrides.
//!
//! Reads a TOML file (or falls back to built-in defaults when
//! `config/default.toml` is absent), then applies `PORT`, `MEMOIR_LOG_LEVEL`,
//! `MEMOIR_DB_PATH` and `PUBLIC_BASE_URL` overrides. Vendor secrets are only
//! ever read from the environment.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

use super::raw::RawConfig;
use super::types::*;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Values sourced from the process environment.
///
/// Collected once by [`EnvOverrides::from_env`]; tests build it by hand
/// instead of mutating env vars.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub port: Option<String>,
    pub log_level: Option<String>,
    pub db_path: Option<String>,
    pub public_base_url: Option<String>,
    pub moonshot_api_key: Option<String>,
    pub iflytek_app_id: Option<String>,
    pub iflytek_api_key: Option<String>,
    pub iflytek_api_secret: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            port: non_empty_var("PORT"),
            log_level: non_empty_var("MEMOIR_LOG_LEVEL"),
            db_path: non_empty_var("MEMOIR_DB_PATH"),
            public_base_url: non_empty_var("PUBLIC_BASE_URL"),
            moonshot_api_key: non_empty_var("MOONSHOT_API_KEY"),
            iflytek_app_id: non_empty_var("IFLYTEK_APPID"),
            iflytek_api_key: non_empty_var("IFLYTEK_API_KEY"),
            iflytek_api_secret: non_empty_var("IFLYTEK_API_SECRET"),
        }
    }
}

/// Deployment platforms sometimes export a variable as an empty string.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Load config from the given path, or `config/default.toml`, then apply
/// env-var overrides. A missing default file yields the built-in defaults;
/// a missing explicit path is an error.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let overrides = EnvOverrides::from_env();

    if let Some(path) = config_path {
        return load_from(Path::new(path), &overrides);
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        load_from(default_path, &overrides)
    } else {
        resolve(RawConfig::default(), &overrides)
    }
}

/// Internal loader: accepts an explicit path and pre-collected overrides.
pub fn load_from(path: &Path, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    resolve(parsed, overrides)
}

fn resolve(parsed: RawConfig, overrides: &EnvOverrides) -> Result<Config, AppError> {
    let s = parsed.server;

    let port = match overrides.port.as_deref() {
        Some(p) => p
            .trim()
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("invalid PORT '{p}': {e}")))?,
        None => s.port,
    };

    let log_level = overrides.log_level.clone().unwrap_or(s.log_level);

    let public_base_url = overrides
        .public_base_url
        .clone()
        .or(s.public_base_url)
        .unwrap_or_else(|| format!("http://localhost:{port}"))
        .trim_end_matches('/')
        .to_string();

    let db_path_str = overrides.db_path.as_deref().unwrap_or(&parsed.store.db_path);

    let credentials = match (
        overrides.iflytek_app_id.clone(),
        overrides.iflytek_api_key.clone(),
        overrides.iflytek_api_secret.clone(),
    ) {
        (Some(app_id), Some(api_key), Some(api_secret)) => Some(IflytekCredentials {
            app_id,
            api_key,
            api_secret,
        }),
        _ => None,
    };

    Ok(Config {
        log_level,
        server: ServerConfig {
            bind_host: s.bind_host,
            port,
            public_base_url,
        },
        store: StoreConfig {
            db_path: expand_home(db_path_str),
        },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            openai: OpenAiConfig {
                api_base_url: parsed.llm.openai.api_base_url,
                model: parsed.llm.openai.model,
                temperature: parsed.llm.openai.temperature,
                max_tokens: parsed.llm.openai.max_tokens,
                timeout_seconds: parsed.llm.openai.timeout_seconds,
            },
        },
        llm_api_key: overrides.moonshot_api_key.clone(),
        tts: TtsConfig {
            voice: parsed.tts.voice,
            speed: parsed.tts.speed,
            volume: parsed.tts.volume,
            pitch: parsed.tts.pitch,
            timeout_seconds: parsed.tts.timeout_seconds,
            credentials,
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
