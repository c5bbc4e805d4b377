//! CLI module for EDA Crew
//!
//! Provides command-line interface parsing and handling for the eda-crew binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use crate::utils::toml_config::ProviderChoice;
use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Default configuration file name
pub const DEFAULT_CONFIG: &str = "eda.toml";

/// EDA Crew - agent-driven exploratory data analysis
///
/// Summarizes a dataset, asks questions about it, answers each one with
/// generated analysis code and writes an executive summary.
#[derive(Parser, Debug)]
#[command(
    name = "eda-crew",
    version,
    about = "EDA Crew - agent-driven exploratory data analysis",
    long_about = "Runs a crew of LLM agents over a CSV dataset: a metadata summary,\n\
                  generated questions, one analysis per question and an executive summary.\n\n\
                  Without a config file the built-in OpenAI configuration is used.",
    after_help = "EXAMPLES:\n    \
                  eda-crew run                          # train.csv, plots/, 3 questions\n    \
                  eda-crew run sales.csv out 5          # custom dataset, output and count\n    \
                  eda-crew profile sales.csv            # inspect the dataset profile\n    \
                  eda-crew init --provider ollama       # scaffold eda.toml for Ollama\n    \
                  eda-crew --config my.toml config --validate"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG, global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full EDA pipeline on a dataset
    Run {
        /// CSV dataset to analyze
        #[arg(default_value = "train.csv")]
        dataset: PathBuf,

        /// Root directory for per-question plot folders
        #[arg(default_value = "plots")]
        output_dir: PathBuf,

        /// Number of questions to generate
        #[arg(default_value = "3")]
        questions: NonZeroUsize,

        /// Do not profile the dataset before the prep stage
        #[arg(long)]
        no_profile: bool,

        /// Print the report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Print the profile handed to the ingestion agent
    Profile {
        /// CSV dataset to profile
        dataset: PathBuf,
    },

    /// Write an eda.toml configuration file
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,

        /// LLM provider to configure (openai or ollama)
        #[arg(long, default_value = "openai")]
        provider: ProviderChoice,
    },

    /// Show configuration information
    Config {
        /// Also check that required environment variables are set
        #[arg(long)]
        validate: bool,
    },

    /// Inspect agents
    #[command(subcommand)]
    Agent(AgentCommands),
}

/// Agent subcommands
#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// List all configured agents
    List,

    /// Show details for a specific agent
    Show {
        /// Name of the agent
        name: String,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
