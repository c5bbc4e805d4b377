//! # EDA Crew
//!
//! Agent-driven exploratory data analysis. A crew of LLM agents summarizes a
//! tabular dataset, asks analytical questions about it, answers each question
//! with generated analysis code and a markdown write-up, and condenses the
//! answers into an executive summary.
//!
//! ## Overview
//!
//! EDA Crew can be used in two ways:
//!
//! 1. **As a command line tool** - Run the `eda-crew` binary
//! 2. **As a library** - Drive the pipeline with your own workflows or clients
//!
//! ### Configuration-Driven Setup
//!
//! ```rust,ignore
//! use eda::{AgentRegistry, EdaConfig, EdaPipeline, PipelineStages, ProviderRegistry, WorkflowEngine};
//! use std::num::NonZeroUsize;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let config = Arc::new(EdaConfig::load("eda.toml")?);
//! let providers = Arc::new(ProviderRegistry::from_config(&config));
//! let agents = Arc::new(AgentRegistry::from_config(&config, providers));
//! let engine = WorkflowEngine::new(config.clone(), agents);
//!
//! let stages = PipelineStages::from_engine(&engine, &config.pipeline).await?;
//! let report = EdaPipeline::new(stages)
//!     .run(Path::new("train.csv"), Path::new("plots"), NonZeroUsize::new(3).unwrap())
//!     .await?;
//! println!("{}", report.summary);
//! ```
//!
//! ### Custom Workflows
//!
//! Each stage is an `Arc<dyn Workflow>`, so any type implementing
//! [`Workflow`] can stand in for a configured one:
//!
//! ```rust,ignore
//! let stages = PipelineStages {
//!     prep: Arc::new(my_prep),
//!     analysis: Arc::new(engine.build("analysis").await?),
//!     summary: Arc::new(engine.build("summary").await?),
//! };
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `openai` | OpenAI API and compatible endpoints (default) |
//! | `ollama` | Ollama local inference (default) |
//!
//! ## Modules
//!
//! - [`pipeline`] - Stage orchestration and output parsing
//! - [`workflows`] - Declarative sequential workflow engine
//! - [`agents`] - Configurable agent personas
//! - [`llm`] - LLM client implementations
//! - [`dataset`] - CSV profiling
//! - [`cli`] - Command line parsing and output
//! - [`types`] - Common types and error handling

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Configurable agents and their registry.
pub mod agents;
/// Command line parsing and colored output.
pub mod cli;
/// CSV dataset profiling.
pub mod dataset;
/// LLM provider clients and abstractions.
pub mod llm;
/// The three-stage EDA pipeline.
pub mod pipeline;
/// Core types (task outputs, agent context, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;
/// Workflow engine for agent orchestration.
pub mod workflows;

// Re-export commonly used types
pub use agents::{Agent, AgentRegistry, ConfigurableAgent};
pub use dataset::DatasetProfile;
pub use llm::{LLMClient, Provider, ProviderRegistry};
pub use pipeline::{EdaPipeline, EdaReport, PipelineStages};
pub use types::{AppError, Result, TaskOutput};
pub use utils::toml_config::{ConfigError, EdaConfig};
pub use workflows::{
    SequentialWorkflow, Workflow, WorkflowEngine, WorkflowInputs, WorkflowOutput, WorkflowStep,
};
