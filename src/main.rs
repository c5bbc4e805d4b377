//! EDA Crew CLI Entry Point
//!
//! Subcommands:
//! - `eda-crew run [DATASET] [OUTPUT_DIR] [QUESTIONS]` - Run the pipeline
//! - `eda-crew profile <DATASET>` - Print the dataset profile
//! - `eda-crew init` - Write eda.toml
//! - `eda-crew config` - Show (and validate) configuration
//! - `eda-crew agent list|show` - Inspect agents

use anyhow::{Context, Result};
use eda::agents::Persona;
use eda::cli::init::{self, InitConfig, InitResult};
use eda::cli::output::Output;
use eda::cli::{AgentCommands, Cli, Commands, DEFAULT_CONFIG};
use eda::utils::toml_config::{ConfigError, EdaConfig, LogFormat, LoggingConfig, ProviderConfig};
use eda::{AgentRegistry, DatasetProfile, EdaPipeline, PipelineStages, ProviderRegistry, WorkflowEngine};
use owo_colors::OwoColorize;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Placeholder profile when the dataset is not read up front
const NO_PROFILE: &str = "No profile is available; inspect the file yourself.";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Commands::Init {
            path,
            force,
            provider,
        } => {
            init_tracing(&LoggingConfig::default(), cli.verbose);
            match init::run(
                InitConfig {
                    path,
                    force,
                    provider,
                },
                &output,
            ) {
                InitResult::Success | InitResult::AlreadyExists => Ok(()),
                InitResult::Error(e) => anyhow::bail!("initialization failed: {}", e),
            }
        }

        Commands::Profile { dataset } => {
            init_tracing(&LoggingConfig::default(), cli.verbose);
            let profile = DatasetProfile::from_path(&dataset)?;
            output.header(&format!("Profile of {}", dataset.display()));
            output.profile(&profile);
            output.newline();
            Ok(())
        }

        Commands::Run {
            dataset,
            output_dir,
            questions,
            no_profile,
            json,
        } => {
            let (config, source) = load_config(&cli.config)?;
            init_tracing(&config.logging, cli.verbose);
            if !json {
                output.banner();
                output.info(&format!("Configuration: {}", source));
            }
            run_pipeline(config, &dataset, &output_dir, questions, no_profile, json, &output).await
        }

        Commands::Config { validate } => {
            let (config, source) = load_config(&cli.config)?;
            init_tracing(&config.logging, cli.verbose);
            show_config(&config, &source, validate, &output)
        }

        Commands::Agent(command) => {
            let (config, _) = load_config(&cli.config)?;
            init_tracing(&config.logging, cli.verbose);
            match command {
                AgentCommands::List => list_agents(&config, &output),
                AgentCommands::Show { name } => show_agent(&config, &name, &output),
            }
        }
    }
}

/// `RUST_LOG` wins, then `-v`, then `[logging].level`
fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { logging.level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init(),
    }
}

/// Load the config file, falling back to the built-in config when the
/// default file is absent
fn load_config(path: &Path) -> Result<(EdaConfig, String)> {
    match EdaConfig::load(path) {
        Ok(config) => Ok((config, path.display().to_string())),
        Err(ConfigError::FileNotFound(_)) if path == Path::new(DEFAULT_CONFIG) => {
            let config = EdaConfig::builtin().context("built-in configuration is invalid")?;
            Ok((config, "built-in (no eda.toml found)".to_string()))
        }
        Err(e) => Err(e).with_context(|| format!("failed to load {}", path.display())),
    }
}

async fn run_pipeline(
    config: EdaConfig,
    dataset: &Path,
    output_dir: &Path,
    questions: NonZeroUsize,
    no_profile: bool,
    json: bool,
    output: &Output,
) -> Result<()> {
    config.validate_environment()?;

    let profile = if no_profile {
        NO_PROFILE.to_string()
    } else {
        match DatasetProfile::from_path(dataset) {
            Ok(profile) => profile.to_markdown(),
            Err(e) => {
                tracing::warn!(error = %e, "Dataset profiling failed");
                if !json {
                    output.warning(&format!("Could not profile dataset: {}", e));
                }
                NO_PROFILE.to_string()
            }
        }
    };

    let config = Arc::new(config);
    let providers = Arc::new(ProviderRegistry::from_config(&config));
    let agents = Arc::new(AgentRegistry::from_config(&config, providers));
    let engine = WorkflowEngine::new(config.clone(), agents);
    let stages = PipelineStages::from_engine(&engine, &config.pipeline).await?;

    if !json {
        output.header("Running EDA pipeline");
        output.kv("dataset", &dataset.display().to_string());
        output.kv("output", &output_dir.display().to_string());
        output.kv("questions", &questions.to_string());
        output.newline();
    }

    let report = EdaPipeline::new(stages)
        .with_extra_input("dataset_profile", profile)
        .run(dataset, output_dir, questions)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output.report(&report);
        output.complete(&format!(
            "Analyzed {} question(s); plots go under {}",
            report.questions.len(),
            output_dir.display()
        ));
    }

    Ok(())
}

fn show_config(config: &EdaConfig, source: &str, validate: bool, output: &Output) -> Result<()> {
    output.header("Configuration");
    output.kv("source", source);
    output.kv("log level", &config.logging.level);

    output.subheader("Pipeline");
    output.kv("prep", &config.pipeline.prep_workflow);
    output.kv("analysis", &config.pipeline.analysis_workflow);
    output.kv("summary", &config.pipeline.summary_workflow);

    output.subheader("Providers");
    for (name, provider) in &config.providers {
        let description = match provider {
            ProviderConfig::OpenAI {
                api_base,
                api_key_env,
                ..
            } => format!("openai at {} (key from ${})", api_base, api_key_env),
            ProviderConfig::Ollama { base_url, .. } => format!("ollama at {}", base_url),
        };
        output.kv(name, &description);
    }

    output.subheader("Models");
    for (name, model) in &config.models {
        output.kv(
            name,
            &format!(
                "{} via {} (temperature {})",
                model.model, model.provider, model.temperature
            ),
        );
    }

    output.subheader("Workflows");
    for (name, workflow) in &config.workflows {
        output.kv(name, &workflow.tasks.join(" -> "));
    }

    if validate {
        output.newline();
        match config.validate_environment() {
            Ok(()) => output.success("Configuration is valid"),
            Err(e) => {
                output.error(&e.to_string());
                return Err(e.into());
            }
        }
    }

    output.newline();
    Ok(())
}

fn list_agents(config: &EdaConfig, output: &Output) -> Result<()> {
    output.header("Agents");
    output.newline();
    output.table_header(&["Name", "Model", "Tasks"]);

    for (name, agent) in &config.agents {
        let tasks = config.agent_tasks(name).join(", ");
        output.table_row(&[name.as_str(), agent.model.as_str(), tasks.as_str()]);
    }

    output.newline();
    Ok(())
}

fn show_agent(config: &EdaConfig, name: &str, output: &Output) -> Result<()> {
    let agent = config
        .get_agent(name)
        .with_context(|| format!("agent '{}' not found", name))?;
    let persona = Persona::from_config(name, agent);

    output.header(&persona.display_name);
    output.kv("role", &persona.role);
    output.kv("goal", &persona.goal);
    output.kv("model", &agent.model);
    output.kv("tasks", &config.agent_tasks(name).join(", "));

    output.subheader("System prompt");
    output.block(&persona.system_prompt());
    output.newline();
    Ok(())
}

