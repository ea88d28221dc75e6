//! The one LLM endpoint every agent talks to

use smarthome_llm::{LLMError, LlmConfig};

/// Model identifier; the `openai/` prefix selects the OpenAI-compatible API
pub const MODEL: &str = "openai/anthropic.claude-3-5-sonnet-20241022-v2:0";

/// Base URL of the gateway
pub const API_BASE: &str = "https://openai.generative.engine.capgemini.com/v1";

/// Environment variable holding the gateway token
pub const TOKEN_ENV: &str = "LLM_API_TOKEN";

/// Header carrying the token in addition to the bearer key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Endpoint configuration for a given token
///
/// The gateway expects the token twice: as the API key and in the
/// `x-api-key` header.
pub fn llm_config_from_token(token: impl Into<String>) -> LlmConfig {
    let token = token.into();
    LlmConfig::new(MODEL)
        .with_api_base(API_BASE)
        .with_header(API_KEY_HEADER, token.clone())
        .with_api_key(token)
}

/// Endpoint configuration from [`TOKEN_ENV`]
pub fn llm_config_from_env() -> Result<LlmConfig, LLMError> {
    llm_config_from_token_var(std::env::var(TOKEN_ENV).ok())
}

/// Endpoint configuration from the value of [`TOKEN_ENV`], if any
///
/// An unset or blank token is a configuration error.
pub fn llm_config_from_token_var(token: Option<String>) -> Result<LlmConfig, LLMError> {
    match token {
        Some(token) if !token.trim().is_empty() => Ok(llm_config_from_token(token)),
        _ => Err(LLMError::ConfigurationError(format!(
            "{TOKEN_ENV} is not set"
        ))),
    }
}
