//! TOML-based configuration for EDA Crew
//!
//! This module provides declarative configuration for providers, models, agents,
//! tasks, and workflows via a TOML file (`eda.toml`).
//!
//! When no file is present the built-in configuration is used, which is the
//! same document `eda-crew init` writes to disk.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Agents, tasks and workflows shared by the built-in and scaffolded configs
pub const CREW_TEMPLATE: &str = include_str!("../../config/crew.toml");

/// Root configuration structure loaded from eda.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Named LLM provider configurations
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,

    /// Named model configurations that reference providers
    #[serde(default)]
    pub models: BTreeMap<String, ModelConfig>,

    /// Agent personas
    #[serde(default)]
    pub agents: BTreeMap<String, AgentConfig>,

    /// Prompt templates bound to agents
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskConfig>,

    /// Ordered task lists
    #[serde(default)]
    pub workflows: BTreeMap<String, WorkflowConfig>,
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ============= Pipeline Configuration =============

/// Which workflows implement the three pipeline stages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_prep_workflow")]
    pub prep_workflow: String,

    #[serde(default = "default_analysis_workflow")]
    pub analysis_workflow: String,

    #[serde(default = "default_summary_workflow")]
    pub summary_workflow: String,
}

fn default_prep_workflow() -> String {
    "prep".to_string()
}

fn default_analysis_workflow() -> String {
    "analysis".to_string()
}

fn default_summary_workflow() -> String {
    "summary".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            prep_workflow: default_prep_workflow(),
            analysis_workflow: default_analysis_workflow(),
            summary_workflow: default_summary_workflow(),
        }
    }
}

impl PipelineConfig {
    fn stage_workflows(&self) -> [(&'static str, &str); 3] {
        [
            ("prep", self.prep_workflow.as_str()),
            ("analysis", self.analysis_workflow.as_str()),
            ("summary", self.summary_workflow.as_str()),
        ]
    }
}

// ============= Provider Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
    OpenAI {
        /// Environment variable containing API key
        api_key_env: String,
        #[serde(default = "default_openai_base")]
        api_base: String,
    },
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_base() -> String {
    "https://api.openai.com/v1".to_string()
}

// ============= Model Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Reference to a provider name defined in [providers]
    pub provider: String,

    /// Model name/identifier to use with the provider
    pub model: String,

    #[serde(default)]
    pub temperature: f32,

    /// Optional completion token cap
    pub max_tokens: Option<u32>,
}

// ============= Agent Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Display name, e.g. "Data Scientist"
    pub name: Option<String>,

    pub role: String,

    pub goal: String,

    #[serde(default)]
    pub backstory: Option<String>,

    /// Reference to a model name defined in [models]
    pub model: String,
}

// ============= Task Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    /// A JSON array of strings
    List,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Reference to an agent name defined in [agents]
    pub agent: String,

    /// Prompt template with `{placeholder}` inputs
    pub description: String,

    #[serde(default)]
    pub expected_output: String,

    /// Earlier tasks whose output is handed to this one. Empty means the
    /// immediately preceding task.
    #[serde(default)]
    pub context: Vec<String>,

    #[serde(default)]
    pub output: OutputFormat,
}

// ============= Workflow Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Task names, executed in order
    pub tasks: Vec<String>,
}

// ============= Configuration Loading & Validation =============

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Provider '{0}' referenced by model '{1}' does not exist")]
    MissingProvider(String, String),

    #[error("Model '{0}' referenced by agent '{1}' does not exist")]
    MissingModel(String, String),

    #[error("Agent '{0}' referenced by task '{1}' does not exist")]
    MissingAgent(String, String),

    #[error("Task '{0}' referenced by workflow '{1}' does not exist")]
    MissingTask(String, String),

    #[error("Workflow '{0}' referenced by the {1} stage does not exist")]
    MissingWorkflow(String, String),

    #[error("Workflow '{0}' has no tasks")]
    EmptyWorkflow(String),

    #[error("Invalid context in workflow '{workflow}': task '{task}' depends on '{context}', which does not run before it")]
    InvalidContext {
        workflow: String,
        task: String,
        context: String,
    },
}

/// Provider used by the scaffolded model section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderChoice {
    OpenAI,
    Ollama,
}

impl std::str::FromStr for ProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(ProviderChoice::OpenAI),
            "ollama" => Ok(ProviderChoice::Ollama),
            other => Err(format!(
                "unknown provider '{}' (expected 'openai' or 'ollama')",
                other
            )),
        }
    }
}

/// Render a complete eda.toml for the chosen provider
pub fn render_config(provider: ProviderChoice) -> String {
    let models = match provider {
        ProviderChoice::OpenAI => {
            r#"[providers.openai]
type = "openai"
api_key_env = "OPENAI_API_KEY"
api_base = "https://api.openai.com/v1"

[models.fast]
provider = "openai"
model = "gpt-3.5-turbo"
temperature = 0.0

[models.smart]
provider = "openai"
model = "gpt-4"
temperature = 0.0
"#
        }
        ProviderChoice::Ollama => {
            r#"[providers.ollama-local]
type = "ollama"
base_url = "http://localhost:11434"

[models.fast]
provider = "ollama-local"
model = "llama3.2"
temperature = 0.0

[models.smart]
provider = "ollama-local"
model = "qwen2.5-coder:7b"
temperature = 0.0
"#
        }
    };

    format!(
        r#"# EDA Crew configuration

[logging]
level = "info"
format = "pretty"

[pipeline]
prep_workflow = "prep"
analysis_workflow = "analysis"
summary_workflow = "summary"

# ============= Providers & Models =============

{models}{crew}"#,
        models = models,
        crew = CREW_TEMPLATE
    )
}

impl EdaConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded configuration from {:?}", path);

        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: EdaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The built-in configuration (OpenAI models)
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml(&render_config(ProviderChoice::OpenAI))
    }

    /// Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate model -> provider references
        for (model_name, model_config) in &self.models {
            if !self.providers.contains_key(&model_config.provider) {
                return Err(ConfigError::MissingProvider(
                    model_config.provider.clone(),
                    model_name.clone(),
                ));
            }
            if !(0.0..=2.0).contains(&model_config.temperature) {
                return Err(ConfigError::ValidationError(format!(
                    "Model '{}' has temperature {} outside 0.0..=2.0",
                    model_name, model_config.temperature
                )));
            }
        }

        // Validate agent -> model references
        for (agent_name, agent_config) in &self.agents {
            if !self.models.contains_key(&agent_config.model) {
                return Err(ConfigError::MissingModel(
                    agent_config.model.clone(),
                    agent_name.clone(),
                ));
            }
        }

        // Validate task -> agent references
        for (task_name, task_config) in &self.tasks {
            if !self.agents.contains_key(&task_config.agent) {
                return Err(ConfigError::MissingAgent(
                    task_config.agent.clone(),
                    task_name.clone(),
                ));
            }
        }

        // Validate workflow -> task references and context ordering
        for (workflow_name, workflow_config) in &self.workflows {
            if workflow_config.tasks.is_empty() {
                return Err(ConfigError::EmptyWorkflow(workflow_name.clone()));
            }

            let mut seen = HashSet::new();
            for task_name in &workflow_config.tasks {
                let task = self.tasks.get(task_name).ok_or_else(|| {
                    ConfigError::MissingTask(task_name.clone(), workflow_name.clone())
                })?;

                for context in &task.context {
                    if !seen.contains(context.as_str()) {
                        return Err(ConfigError::InvalidContext {
                            workflow: workflow_name.clone(),
                            task: task_name.clone(),
                            context: context.clone(),
                        });
                    }
                }
                seen.insert(task_name.as_str());
            }
        }

        for (stage, workflow) in self.pipeline.stage_workflows() {
            if !self.workflows.contains_key(workflow) {
                return Err(ConfigError::MissingWorkflow(
                    workflow.to_string(),
                    stage.to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Check that every API key of a provider reachable from an agent is set
    pub fn validate_environment(&self) -> Result<(), ConfigError> {
        let used: HashSet<&str> = self
            .agents
            .values()
            .filter_map(|agent| self.models.get(&agent.model))
            .map(|model| model.provider.as_str())
            .collect();

        for (name, provider) in &self.providers {
            if !used.contains(name.as_str()) {
                continue;
            }
            if let ProviderConfig::OpenAI { api_key_env, .. } = provider {
                self.resolve_env(api_key_env)
                    .ok_or_else(|| ConfigError::MissingEnvVar(api_key_env.clone()))?;
            }
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok().filter(|v| !v.is_empty())
    }

    /// Get provider by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.get(name)
    }

    /// Get model by name
    pub fn get_model(&self, name: &str) -> Option<&ModelConfig> {
        self.models.get(name)
    }

    /// Get agent config by name
    pub fn get_agent(&self, name: &str) -> Option<&AgentConfig> {
        self.agents.get(name)
    }

    /// Get task config by name
    pub fn get_task(&self, name: &str) -> Option<&TaskConfig> {
        self.tasks.get(name)
    }

    /// Get workflow config by name
    pub fn get_workflow(&self, name: &str) -> Option<&WorkflowConfig> {
        self.workflows.get(name)
    }

    /// Tasks assigned to an agent, in name order
    pub fn agent_tasks(&self, agent_name: &str) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|(_, task)| task.agent == agent_name)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config(extra: &str) -> String {
        format!(
            r#"
[providers.local]
type = "ollama"

[models.default]
provider = "local"
model = "llama3.2"

[agents.analyst]
role = "Analyst"
goal = "Answer"
model = "default"

[tasks.ask]
agent = "analyst"
description = "Answer {{question}}"

[workflows.prep]
tasks = ["ask"]

[workflows.analysis]
tasks = ["ask"]

[workflows.summary]
tasks = ["ask"]
{extra}
"#
        )
    }

    #[test]
    fn test_builtin_config_is_valid() {
        let config = EdaConfig::builtin().expect("built-in config must validate");

        assert_eq!(config.agents.len(), 4);
        assert_eq!(config.workflows["prep"].tasks.len(), 2);
        assert_eq!(
            config.tasks["generate_questions"].output,
            OutputFormat::List
        );
        assert_eq!(config.models["fast"].model, "gpt-3.5-turbo");
        assert_eq!(config.models["smart"].model, "gpt-4");
        assert_eq!(config.models["smart"].temperature, 0.0);
    }

    #[test]
    fn test_ollama_scaffold_is_valid() {
        let config = EdaConfig::from_toml(&render_config(ProviderChoice::Ollama)).unwrap();

        assert!(matches!(
            config.get_provider("ollama-local"),
            Some(ProviderConfig::Ollama { .. })
        ));
        assert!(config.get_provider("openai").is_none());
        assert!(config.validate_environment().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = EdaConfig::from_toml(&minimal_config("")).unwrap();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.pipeline.prep_workflow, "prep");
        assert_eq!(config.models["default"].temperature, 0.0);
        assert_eq!(config.tasks["ask"].output, OutputFormat::Text);
        assert!(config.tasks["ask"].context.is_empty());
        match config.get_provider("local") {
            Some(ProviderConfig::Ollama { base_url, .. }) => {
                assert_eq!(base_url, "http://localhost:11434")
            }
            other => panic!("unexpected provider: {:?}", other),
        }
    }

    #[test]
    fn test_validation_missing_provider() {
        let content = minimal_config(
            r#"
[models.broken]
provider = "nonexistent"
model = "x"
"#,
        );
        let result = EdaConfig::from_toml(&content);
        assert!(matches!(result, Err(ConfigError::MissingProvider(_, _))));
    }

    #[test]
    fn test_validation_missing_model() {
        let content = minimal_config(
            r#"
[agents.broken]
role = "r"
goal = "g"
model = "nonexistent"
"#,
        );
        let result = EdaConfig::from_toml(&content);
        assert!(matches!(result, Err(ConfigError::MissingModel(_, _))));
    }

    #[test]
    fn test_validation_missing_agent() {
        let content = minimal_config(
            r#"
[tasks.broken]
agent = "nobody"
description = "x"
"#,
        );
        let result = EdaConfig::from_toml(&content);
        assert!(matches!(result, Err(ConfigError::MissingAgent(_, _))));
    }

    #[test]
    fn test_validation_missing_task() {
        let content = minimal_config(
            r#"
[workflows.broken]
tasks = ["ask", "nope"]
"#,
        );
        let result = EdaConfig::from_toml(&content);
        assert!(matches!(result, Err(ConfigError::MissingTask(t, w)) if t == "nope" && w == "broken"));
    }

    #[test]
    fn test_validation_empty_workflow() {
        let content = minimal_config(
            r#"
[workflows.broken]
tasks = []
"#,
        );
        let result = EdaConfig::from_toml(&content);
        assert!(matches!(result, Err(ConfigError::EmptyWorkflow(_))));
    }

    #[test]
    fn test_validation_context_must_run_earlier() {
        let content = minimal_config(
            r#"
[tasks.first]
agent = "analyst"
description = "a"
context = ["second"]

[tasks.second]
agent = "analyst"
description = "b"

[workflows.ordered]
tasks = ["first", "second"]
"#,
        );
        let result = EdaConfig::from_toml(&content);
        assert!(matches!(result, Err(ConfigError::InvalidContext { .. })));
    }

    #[test]
    fn test_validation_missing_stage_workflow() {
        let content = minimal_config(
            r#"
[pipeline]
summary_workflow = "nowhere"
"#,
        );
        let result = EdaConfig::from_toml(&content);
        assert!(matches!(result, Err(ConfigError::MissingWorkflow(w, s)) if w == "nowhere" && s == "summary"));
    }

    #[test]
    fn test_validation_temperature_range() {
        let content = minimal_config("").replace(
            "model = \"llama3.2\"\n\n[agents",
            "model = \"llama3.2\"\ntemperature = 3.5\n\n[agents",
        );
        let result = EdaConfig::from_toml(&content);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_missing_api_key_env() {
        let content = r#"
[providers.remote]
type = "openai"
api_key_env = "EDA_TEST_SURELY_UNSET_KEY"

[models.default]
provider = "remote"
model = "gpt-4"

[agents.analyst]
role = "Analyst"
goal = "Answer"
model = "default"

[tasks.ask]
agent = "analyst"
description = "x"

[workflows.prep]
tasks = ["ask"]
[workflows.analysis]
tasks = ["ask"]
[workflows.summary]
tasks = ["ask"]
"#;
        let config = EdaConfig::from_toml(content).unwrap();
        assert!(matches!(
            config.validate_environment(),
            Err(ConfigError::MissingEnvVar(name)) if name == "EDA_TEST_SURELY_UNSET_KEY"
        ));
    }

    #[test]
    fn test_unused_model_does_not_require_api_key() {
        let config = EdaConfig::from_toml(&minimal_config(
            r#"
[providers.remote]
type = "openai"
api_key_env = "EDA_TEST_SURELY_UNSET_KEY"

[models.spare]
provider = "remote"
model = "gpt-4"
"#,
        ))
        .unwrap();

        assert!(config.validate_environment().is_ok());
    }

    #[test]
    fn test_agent_tasks() {
        let config = EdaConfig::builtin().unwrap();
        assert_eq!(config.agent_tasks("narrator"), vec!["summarize_insights"]);
        assert!(config.agent_tasks("nobody").is_empty());
    }

    #[test]
    fn test_provider_choice_parsing() {
        assert_eq!("OpenAI".parse::<ProviderChoice>(), Ok(ProviderChoice::OpenAI));
        assert_eq!("ollama".parse::<ProviderChoice>(), Ok(ProviderChoice::Ollama));
        assert!("anthropic".parse::<ProviderChoice>().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = EdaConfig::load("/definitely/not/here/eda.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
