//! Mock implementations for testing.
//!
//! This module provides mock LLM clients and workflows that can be used
//! across different test files without duplication.

#![allow(dead_code)]

use async_trait::async_trait;
use eda::agents::ConfigurableAgent;
use eda::llm::LLMClient;
use eda::types::{AppError, Result, TaskOutput};
use eda::utils::toml_config::EdaConfig;
use eda::workflows::{SequentialWorkflow, Workflow, WorkflowInputs, WorkflowOutput};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A `(system, prompt)` pair seen by a [`MockLLMClient`]
pub type Call = (String, String);

/// Mock LLM client with scripted responses.
///
/// Replies are consumed in order; once the script runs out the last reply
/// repeats. Every call is recorded so tests can inspect the prompts.
///
/// # Examples
///
/// ```ignore
/// // Always answer the same
/// let client = MockLLMClient::new("Hello, world!");
///
/// // Answer in sequence, failing on the second call
/// let client = MockLLMClient::scripted(vec![Ok("one"), Err("boom"), Ok("three")]);
///
/// // Always fail
/// let client = MockLLMClient::failing();
/// ```
#[derive(Clone)]
pub struct MockLLMClient {
    replies: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    last: Arc<Mutex<std::result::Result<String, String>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self::scripted(vec![Ok(response)])
    }

    /// Create a mock client that replies from a script.
    pub fn scripted(script: Vec<std::result::Result<&str, &str>>) -> Self {
        let replies: VecDeque<_> = script
            .into_iter()
            .map(|r| r.map(str::to_string).map_err(str::to_string))
            .collect();
        let last = replies
            .back()
            .cloned()
            .unwrap_or_else(|| Err("empty script".to_string()));

        Self {
            replies: Arc::new(Mutex::new(replies)),
            last: Arc::new(Mutex::new(last)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self::scripted(vec![Err("Mock LLM failure")])
    }

    /// Every `(system, prompt)` pair received so far
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Result<String> {
        let reply = match self.replies.lock().unwrap().pop_front() {
            Some(reply) => {
                *self.last.lock().unwrap() = reply.clone();
                reply
            }
            None => self.last.lock().unwrap().clone(),
        };
        reply.map_err(AppError::LLM)
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        self.next_reply()
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Build a configured workflow whose agents all talk to mock clients.
///
/// `clients` maps agent names to their mock; agents not listed get a
/// client that always fails.
pub fn mock_workflow(
    config: &EdaConfig,
    workflow: &str,
    clients: &[(&str, MockLLMClient)],
) -> SequentialWorkflow {
    let workflow_config = config
        .get_workflow(workflow)
        .unwrap_or_else(|| panic!("workflow '{}' not configured", workflow));

    let mut built = SequentialWorkflow::new(workflow);
    for task_name in &workflow_config.tasks {
        let task = config.get_task(task_name).unwrap().clone();
        let agent_config = config.get_agent(&task.agent).unwrap();
        let client = clients
            .iter()
            .find(|(name, _)| *name == task.agent)
            .map(|(_, client)| client.clone())
            .unwrap_or_else(MockLLMClient::failing);

        let agent = ConfigurableAgent::new(&task.agent, agent_config, Box::new(client));
        built.add_task(task_name, task, Arc::new(agent));
    }
    built
}

/// Workflow that replies from a script and records its inputs.
pub struct ScriptedWorkflow {
    name: String,
    replies: Mutex<VecDeque<Result<TaskOutput>>>,
    calls: Mutex<Vec<WorkflowInputs>>,
}

impl ScriptedWorkflow {
    pub fn new(name: &str, replies: Vec<Result<TaskOutput>>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Replies with the same text to every kickoff
    pub fn echoing(name: &str, count: usize, prefix: &str) -> Arc<Self> {
        let replies = (1..=count)
            .map(|i| Ok(TaskOutput::Text(format!("{} {}", prefix, i))))
            .collect();
        Self::new(name, replies)
    }

    pub fn calls(&self) -> Vec<WorkflowInputs> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Workflow for ScriptedWorkflow {
    fn name(&self) -> &str {
        &self.name
    }

    async fn kickoff(&self, inputs: &WorkflowInputs) -> Result<WorkflowOutput> {
        self.calls.lock().unwrap().push(inputs.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Workflow("no scripted reply left".to_string())))
            .map(WorkflowOutput::from_output)
    }
}

pub fn text(s: &str) -> Result<TaskOutput> {
    Ok(TaskOutput::Text(s.to_string()))
}

pub fn list(items: &[&str]) -> Result<TaskOutput> {
    Ok(TaskOutput::List(items.iter().map(|s| s.to_string()).collect()))
}
