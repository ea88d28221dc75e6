//! LLM endpoint configuration shared by every agent
//!
//! Model identifiers follow the `provider/model` convention: the part before
//! the first `/` picks the provider implementation, the rest is the model
//! name sent on the wire. `openai/anthropic.claude-3-5-sonnet-20241022-v2:0`
//! therefore talks to an OpenAI-compatible endpoint and asks it for
//! `anthropic.claude-3-5-sonnet-20241022-v2:0`. Identifiers without a prefix
//! default to the OpenAI-compatible provider.

use crate::{LLMError, LLMProvider, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

const DEFAULT_PROVIDER: &str = "openai";
const DEFAULT_MAX_TOKENS: usize = 4096;

/// Model id, credentials, base URL and extra headers of an LLM endpoint
///
/// Built once at startup and shared by reference; never mutated afterwards.
#[derive(Clone, PartialEq)]
pub struct LlmConfig {
    /// `provider/model` identifier
    pub model: String,
    /// API key
    pub api_key: Option<String>,
    /// Base URL of the API, provider default when unset
    pub api_base: Option<String>,
    /// Headers sent with every request
    pub extra_headers: BTreeMap<String, String>,
    /// Sampling temperature, provider default when unset
    pub temperature: Option<f32>,
    /// Maximum tokens per completion
    pub max_tokens: usize,
    /// Request timeout in seconds, provider default when unset
    pub timeout_secs: Option<u64>,
}

impl LlmConfig {
    /// Create a config for the given model identifier
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            api_base: None,
            extra_headers: BTreeMap::new(),
            temperature: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: None,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Add a header sent with every request
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens per completion
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Provider prefix of the model identifier
    pub fn provider_name(&self) -> &str {
        self.model
            .split_once('/')
            .map_or(DEFAULT_PROVIDER, |(provider, _)| provider)
    }

    /// Model name as sent to the provider
    pub fn model_name(&self) -> &str {
        self.model
            .split_once('/')
            .map_or(self.model.as_str(), |(_, model)| model)
    }

    /// Build the provider this configuration points at
    pub fn build_provider(&self) -> Result<Arc<dyn LLMProvider>> {
        match self.provider_name() {
            #[cfg(feature = "openai")]
            "openai" => {
                use crate::providers::{OpenAIConfig, OpenAIProvider};

                let mut config = OpenAIConfig::new(self.api_key.clone().unwrap_or_default())
                    .with_headers(self.extra_headers.clone());
                if let Some(api_base) = &self.api_base {
                    config = config.with_api_base(api_base.clone());
                }
                if let Some(timeout) = self.timeout_secs {
                    config = config.with_timeout(timeout);
                }
                Ok(Arc::new(OpenAIProvider::with_config(config)?))
            }
            other => Err(LLMError::ConfigurationError(format!(
                "Unsupported LLM provider '{other}' in model '{}'",
                self.model
            ))),
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field(
                "extra_headers",
                &self.extra_headers.keys().collect::<Vec<_>>(),
            )
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// An LLM configuration together with the provider built from it
///
/// Cloning is cheap; every agent of a crew holds a clone of the same `Llm`.
#[derive(Clone)]
pub struct Llm {
    config: Arc<LlmConfig>,
    provider: Arc<dyn LLMProvider>,
}

impl Llm {
    /// Build the provider for `config`
    pub fn new(config: LlmConfig) -> Result<Self> {
        let provider = config.build_provider()?;
        Ok(Self {
            config: Arc::new(config),
            provider,
        })
    }

    /// Use an already constructed provider
    pub fn with_provider(config: LlmConfig, provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }

    /// Endpoint configuration
    pub fn config(&self) -> &Arc<LlmConfig> {
        &self.config
    }

    /// Provider used for completions
    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    /// Model name sent to the provider
    pub fn model_name(&self) -> &str {
        self.config.model_name()
    }
}

impl fmt::Debug for Llm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Llm")
            .field("config", &self.config)
            .field("provider", &self.provider.name())
            .finish()
    }
}
