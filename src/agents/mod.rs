pub mod configurable;
pub mod registry;

use crate::types::{AgentContext, Result};
use async_trait::async_trait;

// Re-export commonly used types
pub use configurable::{ConfigurableAgent, Persona};
pub use registry::AgentRegistry;

/// Base trait for all agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Execute the agent with a rendered task prompt and prior task context
    async fn execute(&self, input: &str, context: &AgentContext) -> Result<String>;

    /// Get the agent's system prompt
    fn system_prompt(&self) -> String;

    /// Configuration key of the agent, e.g. "data_scientist"
    fn name(&self) -> &str;
}
