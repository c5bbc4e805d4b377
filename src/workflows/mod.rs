//! Workflow Engine Module
//!
//! This module provides declarative workflow execution based on TOML configuration.
//! A workflow is an ordered list of tasks; each task is a prompt template bound
//! to an agent, and later tasks see the outputs of earlier ones.
//!
//! # Configuration
//!
//! Workflows are defined in `eda.toml`:
//!
//! ```toml
//! [tasks.generate_questions]
//! agent = "business_analyst"
//! description = "Generate {question_count} questions ..."
//! context = ["summarize_metadata"]
//! output = "list"
//!
//! [workflows.prep]
//! tasks = ["summarize_metadata", "generate_questions"]
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let engine = WorkflowEngine::new(config, agent_registry);
//! let prep = engine.build("prep").await?;
//! let inputs = WorkflowInputs::new()
//!     .with("dataset_path", "train.csv")
//!     .with("question_count", 3);
//! let output = prep.kickoff(&inputs).await?;
//! println!("Final output: {}", output.final_output);
//! println!("Agents used: {:?}", output.agents_used);
//! ```

pub mod engine;
pub mod template;

pub use engine::{
    BoundTask, SequentialWorkflow, Workflow, WorkflowEngine, WorkflowInputs, WorkflowOutput,
    WorkflowStep,
};
