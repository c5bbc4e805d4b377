use serde::{Deserialize, Serialize};

// ============= Task Output Types =============

/// The result of a single task, as produced by a workflow.
///
/// Most tasks answer in free text. Tasks configured with `output = "list"`
/// produce a native list once the model's answer validates as a JSON array
/// of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TaskOutput {
    Text(String),
    List(Vec<String>),
}

impl TaskOutput {
    /// Borrow the raw text, if this is a text output
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TaskOutput::Text(text) => Some(text),
            TaskOutput::List(_) => None,
        }
    }
}

impl std::fmt::Display for TaskOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskOutput::Text(text) => f.write_str(text),
            TaskOutput::List(items) => {
                let json = serde_json::to_string(items).map_err(|_| std::fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<String> for TaskOutput {
    fn from(text: String) -> Self {
        TaskOutput::Text(text)
    }
}

impl From<Vec<String>> for TaskOutput {
    fn from(items: Vec<String>) -> Self {
        TaskOutput::List(items)
    }
}

// ============= Agent Types =============

/// Output of an earlier task handed to a later one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextEntry {
    pub task: String,
    pub output: String,
}

/// Everything an agent sees besides its rendered task prompt
#[derive(Debug, Clone, Default)]
pub struct AgentContext {
    /// Workflow the task belongs to
    pub workflow: String,
    /// Name of the task being executed
    pub task: String,
    /// Outputs of earlier tasks, in execution order
    pub prior_outputs: Vec<ContextEntry>,
}

impl AgentContext {
    pub fn new(workflow: &str, task: &str) -> Self {
        Self {
            workflow: workflow.to_string(),
            task: task.to_string(),
            prior_outputs: Vec::new(),
        }
    }

    pub fn with_output(mut self, task: &str, output: &str) -> Self {
        self.prior_outputs.push(ContextEntry {
            task: task.to_string(),
            output: output.to_string(),
        });
        self
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Workflow error: {0}")]
    Workflow(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::utils::toml_config::ConfigError> for AppError {
    fn from(err: crate::utils::toml_config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
