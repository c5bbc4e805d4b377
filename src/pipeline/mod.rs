//! EDA Pipeline Orchestrator
//!
//! Sequences the three stage workflows of a run:
//!
//! 1. **prep**: summarize the dataset metadata and generate questions
//! 2. **analysis**: answer each question, one invocation per question
//! 3. **summary**: condense all analyses into an executive summary
//!
//! Only the output root is a hard precondition. Every stage failure after
//! that degrades to a placeholder so a run always produces a report.
//!
//! # Usage
//!
//! ```ignore
//! let stages = PipelineStages::from_engine(&engine, &config.pipeline).await?;
//! let report = EdaPipeline::new(stages)
//!     .with_extra_input("dataset_profile", profile.to_markdown())
//!     .run(Path::new("train.csv"), Path::new("plots"), NonZeroUsize::new(3).unwrap())
//!     .await?;
//! ```

pub mod parser;

use crate::types::{AppError, Result};
use crate::utils::toml_config::PipelineConfig;
use crate::workflows::{Workflow, WorkflowEngine, WorkflowInputs};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// Summary returned when the prep stage yields no questions
pub const NO_QUESTIONS_MESSAGE: &str = "No questions were generated.";

/// Summary returned when the summary stage fails
pub const SUMMARY_ERROR_MESSAGE: &str = "Error generating summary.";

/// The workflows backing each stage
#[derive(Clone)]
pub struct PipelineStages {
    pub prep: Arc<dyn Workflow>,
    pub analysis: Arc<dyn Workflow>,
    pub summary: Arc<dyn Workflow>,
}

impl PipelineStages {
    /// Build the stage workflows named in `[pipeline]`
    pub async fn from_engine(engine: &WorkflowEngine, config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            prep: Arc::new(engine.build(&config.prep_workflow).await?),
            analysis: Arc::new(engine.build(&config.analysis_workflow).await?),
            summary: Arc::new(engine.build(&config.summary_workflow).await?),
        })
    }
}

/// Result of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdaReport {
    /// Questions in generation order
    pub questions: Vec<String>,
    /// One analysis per question, same order
    pub analyses: Vec<String>,
    pub summary: String,
}

impl EdaReport {
    fn without_questions() -> Self {
        Self {
            questions: Vec::new(),
            analyses: Vec::new(),
            summary: NO_QUESTIONS_MESSAGE.to_string(),
        }
    }

    /// `(questions, analyses, summary)`
    pub fn into_parts(self) -> (Vec<String>, Vec<String>, String) {
        (self.questions, self.analyses, self.summary)
    }
}

/// Runs prep, per-question analysis and summary in sequence
pub struct EdaPipeline {
    stages: PipelineStages,
    extra_inputs: WorkflowInputs,
}

impl EdaPipeline {
    pub fn new(stages: PipelineStages) -> Self {
        Self {
            stages,
            extra_inputs: WorkflowInputs::new(),
        }
    }

    /// Add an input passed to every stage (stage inputs win on conflict)
    pub fn with_extra_input(mut self, key: &str, value: impl ToString) -> Self {
        self.extra_inputs.insert(key, value);
        self
    }

    fn stage_inputs(&self, inputs: WorkflowInputs) -> WorkflowInputs {
        let mut inputs = inputs;
        inputs.merge_missing(&self.extra_inputs);
        inputs
    }

    /// Run the pipeline end to end
    ///
    /// # Errors
    ///
    /// Only when `output_dir` cannot be resolved or created. Stage failures
    /// are recorded in the report instead.
    pub async fn run(
        &self,
        dataset_path: &Path,
        output_dir: &Path,
        question_count: NonZeroUsize,
    ) -> Result<EdaReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "eda_run",
            %run_id,
            dataset = %dataset_path.display()
        );

        self.execute(dataset_path, output_dir, question_count)
            .instrument(span)
            .await
    }

    async fn execute(
        &self,
        dataset_path: &Path,
        output_dir: &Path,
        question_count: NonZeroUsize,
    ) -> Result<EdaReport> {
        let output_root = prepare_output_root(output_dir)?;
        let dataset = dataset_path.display().to_string();

        let questions = self.generate_questions(&dataset, question_count).await;
        if questions.is_empty() {
            warn!("No questions generated, stopping early");
            return Ok(EdaReport::without_questions());
        }
        info!(count = questions.len(), "Generated questions");

        let mut analyses = Vec::with_capacity(questions.len());
        for (index, question) in questions.iter().enumerate() {
            let number = index + 1;
            info!(question = number, "Analyzing question {}: {}", number, question);

            let analysis = match self
                .analyze(&dataset, &output_root, number, question)
                .await
            {
                Ok(text) => {
                    info!(question = number, "Completed analysis {}", number);
                    text
                }
                Err(e) => {
                    error!(question = number, error = %e, "Analysis failed");
                    format!("Analysis failed: {}", e)
                }
            };
            analyses.push(analysis);
        }

        let summary = self.summarize(&analyses).await;

        Ok(EdaReport {
            questions,
            analyses,
            summary,
        })
    }

    async fn generate_questions(&self, dataset: &str, question_count: NonZeroUsize) -> Vec<String> {
        let inputs = self.stage_inputs(
            WorkflowInputs::new()
                .with("dataset_path", dataset)
                .with("question_count", question_count),
        );

        info!(workflow = self.stages.prep.name(), "Running prep stage");
        match self.stages.prep.kickoff(&inputs).await {
            Ok(output) => parser::parse_questions(&output.final_output),
            Err(e) => {
                error!(error = %e, "Prep stage failed");
                Vec::new()
            }
        }
    }

    async fn analyze(
        &self,
        dataset: &str,
        output_root: &Path,
        number: usize,
        question: &str,
    ) -> Result<String> {
        let image_dir = output_root.join(format!("q{}", number));
        std::fs::create_dir_all(&image_dir)?;

        let inputs = self.stage_inputs(
            WorkflowInputs::new()
                .with("question", question)
                .with("dataset_path", dataset)
                .with("image_dir", image_dir.display()),
        );

        let output = self.stages.analysis.kickoff(&inputs).await?;
        Ok(output.final_output.to_string())
    }

    async fn summarize(&self, analyses: &[String]) -> String {
        let inputs =
            self.stage_inputs(WorkflowInputs::new().with("analyses", parser::format_analyses(analyses)));

        info!(workflow = self.stages.summary.name(), "Generating summary");
        match self.stages.summary.kickoff(&inputs).await {
            Ok(output) => {
                info!("Summary complete");
                output.final_output.to_string()
            }
            Err(e) => {
                error!(error = %e, "Summary stage failed");
                SUMMARY_ERROR_MESSAGE.to_string()
            }
        }
    }
}

fn prepare_output_root(output_dir: &Path) -> Result<PathBuf> {
    let root = std::path::absolute(output_dir).map_err(|e| {
        AppError::InvalidInput(format!(
            "Cannot resolve output directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    std::fs::create_dir_all(&root).map_err(|e| {
        AppError::InvalidInput(format!(
            "Cannot create output directory {}: {}",
            root.display(),
            e
        ))
    })?;

    Ok(root)
}
