//! Init command implementation
//!
//! Writes `eda.toml` (and a `.env.example`) for the chosen provider.

use super::output::Output;
use crate::utils::toml_config::{render_config, ProviderChoice};
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// eda.toml already exists and `--force` was not given
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// LLM provider to configure
    pub provider: ProviderChoice,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing EDA Crew");

    let base_path = &config.path;
    if let Err(e) = fs::create_dir_all(base_path) {
        output.error(&format!("Failed to create {}: {}", base_path.display(), e));
        return InitResult::Error(e.to_string());
    }

    let config_path = base_path.join(super::DEFAULT_CONFIG);
    if config_path.exists() && !config.force {
        output.warning("eda.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    output.subheader("Creating configuration files");

    if let Err(e) = write_file(&config_path, &render_config(config.provider), config.force) {
        output.error(&format!("Failed to create eda.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.created("config", super::DEFAULT_CONFIG);

    let env_example_path = base_path.join(".env.example");
    if env_example_path.exists() && !config.force {
        output.skipped(".env.example", "already exists");
    } else if let Err(e) = write_file(&env_example_path, &generate_env_example(), config.force) {
        output.warning(&format!("Failed to create .env.example: {}", e));
    } else {
        output.created("env", ".env.example");
    }

    output.complete("EDA Crew configuration written!");

    output.header("Next Steps");
    output.newline();
    match config.provider {
        ProviderChoice::OpenAI => {
            output.info("1. Set your API key:");
            output.command("cp .env.example .env");
            output.command("# Edit .env and set OPENAI_API_KEY");
        }
        ProviderChoice::Ollama => {
            output.info("1. Start Ollama and pull the configured models:");
            output.command("ollama serve");
            output.command("ollama pull llama3.2 && ollama pull qwen2.5-coder:7b");
        }
    }
    output.newline();
    output.info("2. Run the pipeline:");
    output.command("eda-crew run train.csv plots 3");
    output.newline();

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(()); // Skip existing files unless force is true
    }
    fs::write(path, content)
}

fn generate_env_example() -> String {
    r#"# EDA Crew Environment Variables
# Copy this file to .env and fill in the values.

# OpenAI API key (if using the OpenAI provider)
OPENAI_API_KEY=sk-...

# Optional: Logging filter (overrides [logging].level)
RUST_LOG=info,eda=debug
"#
    .to_string()
}
