//! Configurable Agent implementation
//!
//! A generic agent whose persona (role, goal, backstory) and model come from
//! `eda.toml`. The four pipeline roles are all instances of this type.

use crate::agents::Agent;
use crate::llm::LLMClient;
use crate::types::{AgentContext, Result};
use crate::utils::toml_config::AgentConfig;
use async_trait::async_trait;

/// Who the agent is, as told to the model
#[derive(Debug, Clone, PartialEq)]
pub struct Persona {
    pub display_name: String,
    pub role: String,
    pub goal: String,
    pub backstory: Option<String>,
}

impl Persona {
    pub fn new(role: &str, goal: &str) -> Self {
        Self {
            display_name: role.to_string(),
            role: role.to_string(),
            goal: goal.to_string(),
            backstory: None,
        }
    }

    pub fn from_config(name: &str, config: &AgentConfig) -> Self {
        Self {
            display_name: config.name.clone().unwrap_or_else(|| name.to_string()),
            role: config.role.clone(),
            goal: config.goal.clone(),
            backstory: config.backstory.clone(),
        }
    }

    /// System prompt describing the persona
    pub fn system_prompt(&self) -> String {
        let mut prompt = if self.display_name == self.role {
            format!("You are {}.", self.role)
        } else {
            format!("You are {} ({}).", self.display_name, self.role)
        };
        if let Some(backstory) = &self.backstory {
            prompt.push('\n');
            prompt.push_str(backstory);
        }
        prompt.push_str("\n\nYour personal goal is: ");
        prompt.push_str(&self.goal);
        prompt
    }
}

/// A configurable agent that derives its behavior from TOML configuration
pub struct ConfigurableAgent {
    /// The agent's configuration key
    name: String,
    persona: Persona,
    /// The LLM client to use for generation
    llm: Box<dyn LLMClient>,
}

impl ConfigurableAgent {
    /// Create a new configurable agent from TOML config
    ///
    /// # Arguments
    ///
    /// * `name` - The agent's key in `[agents]`
    /// * `config` - The agent configuration from eda.toml
    /// * `llm` - The LLM client (already created from the model config)
    pub fn new(name: &str, config: &AgentConfig, llm: Box<dyn LLMClient>) -> Self {
        Self::with_persona(name, Persona::from_config(name, config), llm)
    }

    /// Create a new configurable agent with an explicit persona
    pub fn with_persona(name: &str, persona: Persona, llm: Box<dyn LLMClient>) -> Self {
        Self {
            name: name.to_string(),
            persona,
            llm,
        }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Model identifier of the underlying client
    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Append the context section to a task prompt
    fn compose_prompt(input: &str, context: &AgentContext) -> String {
        if context.prior_outputs.is_empty() {
            return input.to_string();
        }

        let mut prompt = String::from(input.trim_end());
        prompt.push_str("\n\nContext from earlier tasks:\n");
        for entry in &context.prior_outputs {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", entry.task, entry.output.trim()));
        }
        prompt
    }
}

#[async_trait]
impl Agent for ConfigurableAgent {
    async fn execute(&self, input: &str, context: &AgentContext) -> Result<String> {
        let prompt = Self::compose_prompt(input, context);

        tracing::debug!(
            agent = %self.name,
            workflow = %context.workflow,
            task = %context.task,
            model = self.llm.model_name(),
            prompt_chars = prompt.len(),
            "Executing agent"
        );

        self.llm
            .generate_with_system(&self.persona.system_prompt(), &prompt)
            .await
    }

    fn system_prompt(&self) -> String {
        self.persona.system_prompt()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
