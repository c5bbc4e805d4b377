//! Agent Registry for managing configurable agents
//!
//! Holds the `[agents]` section of `eda.toml` and creates
//! [`ConfigurableAgent`] instances wired to the model each agent names.

use crate::agents::configurable::ConfigurableAgent;
use crate::llm::ProviderRegistry;
use crate::types::{AppError, Result};
use crate::utils::toml_config::{AgentConfig, EdaConfig};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registry for managing agent configurations and creating agent instances
pub struct AgentRegistry {
    /// Agent configurations keyed by name
    configs: BTreeMap<String, AgentConfig>,
    /// Provider registry for creating LLM clients
    provider_registry: Arc<ProviderRegistry>,
}

impl AgentRegistry {
    /// Create a new agent registry
    pub fn new(provider_registry: Arc<ProviderRegistry>) -> Self {
        Self {
            configs: BTreeMap::new(),
            provider_registry,
        }
    }

    /// Create an agent registry from TOML configuration
    pub fn from_config(config: &EdaConfig, provider_registry: Arc<ProviderRegistry>) -> Self {
        Self {
            configs: config.agents.clone(),
            provider_registry,
        }
    }

    /// Register an agent configuration
    pub fn register(&mut self, name: &str, config: AgentConfig) {
        self.configs.insert(name.to_string(), config);
    }

    /// Get an agent configuration by name
    pub fn get_config(&self, name: &str) -> Option<&AgentConfig> {
        self.configs.get(name)
    }

    /// Get all agent names, sorted
    pub fn agent_names(&self) -> Vec<String> {
        self.configs.keys().cloned().collect()
    }

    /// Check if an agent exists
    pub fn has_agent(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    /// Create an agent instance by name
    ///
    /// This creates a new ConfigurableAgent with the LLM client for the
    /// agent's configured model.
    pub async fn create_agent(&self, name: &str) -> Result<ConfigurableAgent> {
        let config = self.get_config(name).ok_or_else(|| {
            AppError::Configuration(format!("Agent '{}' not found in configuration", name))
        })?;

        self.create_agent_from_config(name, config).await
    }

    /// Create an agent instance from an explicit configuration
    pub async fn create_agent_from_config(
        &self,
        name: &str,
        config: &AgentConfig,
    ) -> Result<ConfigurableAgent> {
        let llm = self
            .provider_registry
            .create_client_for_model(&config.model)
            .await?;

        Ok(ConfigurableAgent::new(name, config, llm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Agent;
    use crate::utils::toml_config::{render_config, ProviderChoice};

    fn ollama_registry() -> AgentRegistry {
        let config = EdaConfig::from_toml(&render_config(ProviderChoice::Ollama)).unwrap();
        let providers = Arc::new(ProviderRegistry::from_config(&config));
        AgentRegistry::from_config(&config, providers)
    }

    #[test]
    fn test_agent_names_sorted() {
        let registry = ollama_registry();
        assert_eq!(
            registry.agent_names(),
            vec!["business_analyst", "data_scientist", "ingestion", "narrator"]
        );
        assert!(registry.has_agent("narrator"));
        assert!(!registry.has_agent("router"));
    }

    #[tokio::test]
    async fn test_create_unknown_agent() {
        let registry = ollama_registry();
        let result = registry.create_agent("ghost").await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[cfg(feature = "ollama")]
    #[tokio::test]
    async fn test_create_agent_uses_configured_model() {
        let registry = ollama_registry();
        let agent = registry.create_agent("data_scientist").await.unwrap();

        assert_eq!(agent.name(), "data_scientist");
        assert_eq!(agent.model_name(), "qwen2.5-coder:7b");
        assert_eq!(agent.persona().display_name, "Data Scientist");
    }

    #[tokio::test]
    async fn test_register_overrides() {
        let mut registry = AgentRegistry::new(Arc::new(ProviderRegistry::new()));
        registry.register(
            "solo",
            AgentConfig {
                name: None,
                role: "r".to_string(),
                goal: "g".to_string(),
                backstory: None,
                model: "missing".to_string(),
            },
        );

        assert!(registry.has_agent("solo"));
        // Model is not registered with the provider registry
        assert!(registry.create_agent("solo").await.is_err());
    }
}
