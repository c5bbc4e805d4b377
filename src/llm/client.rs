//! LLM Client abstractions and provider management
//!
//! This module provides a unified interface for the model providers the
//! pipeline can talk to:
//! - **OpenAI**: OpenAI API and compatible endpoints (feature `openai`)
//! - **Ollama**: local inference through an Ollama server (feature `ollama`)

use crate::types::{AppError, Result};
use crate::utils::toml_config::{ModelConfig, ProviderConfig};
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing for easy swapping
/// between providers without changing application code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including Azure OpenAI and compatible APIs)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4".to_string(),
    ///     temperature: 0.0,
    ///     max_tokens: None,
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        temperature: f32,
        max_tokens: Option<u32>,
    },

    /// Ollama local LLM provider
    Ollama {
        base_url: String,
        model: String,
        temperature: f32,
    },
}

impl Provider {
    /// Build a provider from a model entry and the provider it references
    ///
    /// API keys are resolved from the environment variable named in the
    /// provider configuration.
    pub fn from_model_config(model: &ModelConfig, provider: &ProviderConfig) -> Result<Self> {
        match provider {
            ProviderConfig::OpenAI {
                api_key_env,
                api_base,
                ..
            } => {
                let api_key = std::env::var(api_key_env)
                    .ok()
                    .filter(|key| !key.is_empty())
                    .ok_or_else(|| {
                        AppError::Configuration(format!(
                            "Environment variable '{}' is not set (needed by model '{}')",
                            api_key_env, model.model
                        ))
                    })?;

                Ok(Provider::OpenAI {
                    api_key,
                    api_base: api_base.clone(),
                    model: model.model.clone(),
                    temperature: model.temperature,
                    max_tokens: model.max_tokens,
                })
            }
            ProviderConfig::Ollama { base_url, .. } => Ok(Provider::Ollama {
                base_url: base_url.clone(),
                model: model.model.clone(),
                temperature: model.temperature,
            }),
        }
    }

    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's cargo feature is disabled.
    pub async fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                temperature,
                max_tokens,
            } => Ok(Box::new(
                super::openai::OpenAIClient::new(api_key.clone(), api_base.clone(), model.clone())
                    .with_temperature(*temperature)
                    .with_max_tokens(*max_tokens),
            )),

            #[cfg(feature = "ollama")]
            Provider::Ollama {
                base_url,
                model,
                temperature,
            } => Ok(Box::new(
                super::ollama::OllamaClient::new(base_url.clone(), model.clone())
                    .await?
                    .with_temperature(*temperature),
            )),

            #[allow(unreachable_patterns)]
            other => Err(AppError::Configuration(format!(
                "{} support is not compiled in; rebuild with the '{}' feature",
                other.name(),
                other.feature()
            ))),
        }
    }

    /// Check if this provider's client is compiled in
    pub fn is_enabled(&self) -> bool {
        match self {
            Provider::OpenAI { .. } => cfg!(feature = "openai"),
            Provider::Ollama { .. } => cfg!(feature = "ollama"),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    fn feature(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "openai",
            Provider::Ollama { .. } => "ollama",
        }
    }

    /// Model identifier sent to the provider
    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }
}
