//! Workflow Engine
//!
//! Executes declarative workflows: ordered tasks, each bound to an agent,
//! run one after another with earlier outputs handed on as context.

use crate::agents::{Agent, AgentRegistry};
use crate::pipeline::parser;
use crate::types::{AgentContext, AppError, ContextEntry, Result, TaskOutput};
use crate::utils::toml_config::{EdaConfig, OutputFormat, TaskConfig};
use crate::workflows::template;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Named inputs substituted into task templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowInputs(BTreeMap<String, String>);

impl WorkflowInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl ToString) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Copy every entry of `other` that is not already set
    pub fn merge_missing(&mut self, other: &WorkflowInputs) {
        for (key, value) in &other.0 {
            self.0.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Output from a workflow execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowOutput {
    /// The result of the last task
    pub final_output: TaskOutput,
    /// Number of steps executed
    pub steps_executed: usize,
    /// Agent names in order of first use
    pub agents_used: Vec<String>,
    /// Detailed trace of each step
    pub reasoning_path: Vec<WorkflowStep>,
}

impl WorkflowOutput {
    /// A single-step output, handy for workflows that are not task lists
    pub fn from_output(output: impl Into<TaskOutput>) -> Self {
        Self {
            final_output: output.into(),
            steps_executed: 0,
            agents_used: Vec::new(),
            reasoning_path: Vec::new(),
        }
    }
}

/// A single step in the workflow execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// The task that ran
    pub task: String,
    /// The agent that executed this step
    pub agent_name: String,
    /// The rendered prompt provided to the agent
    pub input: String,
    /// The output from the agent
    pub output: String,
    /// Unix timestamp when this step was executed
    pub timestamp: i64,
    /// Duration of this step in milliseconds
    pub duration_ms: u64,
}

/// Anything that can be kicked off with named inputs
#[async_trait]
pub trait Workflow: Send + Sync {
    /// Workflow name, for logs
    fn name(&self) -> &str;

    /// Run the workflow to completion
    async fn kickoff(&self, inputs: &WorkflowInputs) -> Result<WorkflowOutput>;
}

/// A task bound to the agent that will execute it
pub struct BoundTask {
    pub name: String,
    pub config: TaskConfig,
    pub agent: Arc<dyn Agent>,
}

/// Runs its tasks strictly in order
pub struct SequentialWorkflow {
    name: String,
    tasks: Vec<BoundTask>,
}

impl SequentialWorkflow {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tasks: Vec::new(),
        }
    }

    /// Append a task
    pub fn add_task(&mut self, name: &str, config: TaskConfig, agent: Arc<dyn Agent>) {
        self.tasks.push(BoundTask {
            name: name.to_string(),
            config,
            agent,
        });
    }

    /// Builder-style [`add_task`](Self::add_task)
    pub fn with_task(mut self, name: &str, config: TaskConfig, agent: Arc<dyn Agent>) -> Self {
        self.add_task(name, config, agent);
        self
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }

    fn render_prompt(task: &TaskConfig, inputs: &WorkflowInputs) -> Result<String> {
        let description = template::render(&task.description, inputs)?;
        let expected = template::render(&task.expected_output, inputs)?;

        let mut prompt = description.trim().to_string();
        if !expected.trim().is_empty() {
            prompt.push_str("\n\nExpected output: ");
            prompt.push_str(expected.trim());
        }
        Ok(prompt)
    }

    /// Outputs this task may see: the named tasks, or the previous one
    fn context_for(task: &TaskConfig, completed: &[(String, TaskOutput)]) -> Vec<ContextEntry> {
        let entry = |(name, output): &(String, TaskOutput)| ContextEntry {
            task: name.clone(),
            output: output.to_string(),
        };

        if task.context.is_empty() {
            return completed.last().map(entry).into_iter().collect();
        }

        completed
            .iter()
            .filter(|(name, _)| task.context.contains(name))
            .map(entry)
            .collect()
    }

    fn shape_output(&self, task_name: &str, format: OutputFormat, raw: String) -> TaskOutput {
        match format {
            OutputFormat::Text => TaskOutput::Text(raw),
            OutputFormat::List => match parser::parse_json_list(&raw) {
                Some(items) => TaskOutput::List(items),
                None => {
                    warn!(
                        workflow = %self.name,
                        task = task_name,
                        "Expected a JSON array of strings; keeping the raw text"
                    );
                    TaskOutput::Text(raw)
                }
            },
        }
    }
}

#[async_trait]
impl Workflow for SequentialWorkflow {
    fn name(&self) -> &str {
        &self.name
    }

    async fn kickoff(&self, inputs: &WorkflowInputs) -> Result<WorkflowOutput> {
        if self.tasks.is_empty() {
            return Err(AppError::Workflow(format!(
                "Workflow '{}' has no tasks",
                self.name
            )));
        }

        let mut completed: Vec<(String, TaskOutput)> = Vec::new();
        let mut steps = Vec::new();
        let mut agents_used: Vec<String> = Vec::new();

        for bound in &self.tasks {
            let step_start = std::time::Instant::now();
            let timestamp = Utc::now().timestamp();

            let prompt = Self::render_prompt(&bound.config, inputs)?;
            let context = AgentContext {
                workflow: self.name.clone(),
                task: bound.name.clone(),
                prior_outputs: Self::context_for(&bound.config, &completed),
            };

            info!(
                workflow = %self.name,
                task = %bound.name,
                agent = bound.agent.name(),
                "Running task"
            );
            let raw = bound.agent.execute(&prompt, &context).await?;
            let duration_ms = step_start.elapsed().as_millis() as u64;
            debug!(task = %bound.name, duration_ms, "Task finished");

            let output = self.shape_output(&bound.name, bound.config.output, raw);

            steps.push(WorkflowStep {
                task: bound.name.clone(),
                agent_name: bound.agent.name().to_string(),
                input: prompt,
                output: output.to_string(),
                timestamp,
                duration_ms,
            });

            let agent_name = bound.agent.name().to_string();
            if !agents_used.contains(&agent_name) {
                agents_used.push(agent_name);
            }

            completed.push((bound.name.clone(), output));
        }

        let final_output = completed
            .pop()
            .map(|(_, output)| output)
            .ok_or_else(|| AppError::Internal("workflow produced no output".to_string()))?;

        Ok(WorkflowOutput {
            final_output,
            steps_executed: steps.len(),
            agents_used,
            reasoning_path: steps,
        })
    }
}

/// Workflow engine that builds configured workflows
pub struct WorkflowEngine {
    config: Arc<EdaConfig>,
    agent_registry: Arc<AgentRegistry>,
}

impl WorkflowEngine {
    /// Create a new workflow engine
    pub fn new(config: Arc<EdaConfig>, agent_registry: Arc<AgentRegistry>) -> Self {
        Self {
            config,
            agent_registry,
        }
    }

    /// Build a workflow by name, creating one agent instance per distinct agent
    pub async fn build(&self, workflow_name: &str) -> Result<SequentialWorkflow> {
        let workflow = self.config.get_workflow(workflow_name).ok_or_else(|| {
            AppError::Configuration(format!(
                "Workflow '{}' not found in configuration",
                workflow_name
            ))
        })?;

        let mut agents: BTreeMap<String, Arc<dyn Agent>> = BTreeMap::new();
        let mut built = SequentialWorkflow::new(workflow_name);

        for task_name in &workflow.tasks {
            let task = self.config.get_task(task_name).ok_or_else(|| {
                AppError::Configuration(format!(
                    "Task '{}' referenced by workflow '{}' not found",
                    task_name, workflow_name
                ))
            })?;

            let agent = match agents.get(&task.agent) {
                Some(agent) => agent.clone(),
                None => {
                    let agent: Arc<dyn Agent> =
                        Arc::new(self.agent_registry.create_agent(&task.agent).await?);
                    agents.insert(task.agent.clone(), agent.clone());
                    agent
                }
            };

            built.add_task(task_name, task.clone(), agent);
        }

        Ok(built)
    }

    /// Get available workflow names
    pub fn available_workflows(&self) -> Vec<String> {
        self.config.workflows.keys().cloned().collect()
    }

    /// Check if a workflow exists
    pub fn has_workflow(&self, name: &str) -> bool {
        self.config.workflows.contains_key(name)
    }
}
