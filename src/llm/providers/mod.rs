//! LLM provider implementations.
//!
//! `build(config, api_key)` is the factory: called at startup.
//! Adding a new backend = new module + new match arm.

pub mod openai_compatible;
pub mod template;

use tracing::warn;

use crate::config::LlmConfig;
use crate::llm::{LlmProvider, ProviderError};

/// Construct a `LlmProvider` from config and an optional API key.
///
/// `api_key` is sourced from `MOONSHOT_API_KEY` (never TOML). A vendor
/// provider without a key degrades to the template generator.
pub fn build(config: &LlmConfig, api_key: Option<String>) -> Result<LlmProvider, ProviderError> {
    match config.provider.as_str() {
        "template" => Ok(LlmProvider::Template(template::TemplateProvider)),
        "openai" | "openai-compatible" | "moonshot" => {
            let Some(api_key) = api_key else {
                warn!(provider = %config.provider, "no LLM API key set: using template generator");
                return Ok(LlmProvider::Template(template::TemplateProvider));
            };
            let oai = &config.openai;
            let p = openai_compatible::OpenAiCompatibleProvider::new(
                oai.api_base_url.clone(),
                oai.model.clone(),
                oai.temperature,
                oai.max_tokens,
                oai.timeout_seconds,
                Some(api_key),
            )?;
            Ok(LlmProvider::OpenAiCompatible(p))
        }
        _ => Err(ProviderError::UnknownProvider(config.provider.clone())),
    }
}
