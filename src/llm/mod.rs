//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for interacting with the Large
//! Language Model providers used by the agents. Provider specifics are hidden
//! behind the [`LLMClient`] trait.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait that all providers implement
//! - [`Provider`] - A resolved provider/model pair that can build a client
//! - [`ProviderRegistry`] - Named providers and models from `eda.toml`
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features (both are on by default):
//! - `openai` - OpenAI API and compatible endpoints
//! - `ollama` - Local Ollama server
//!
//! # Example
//!
//! ```ignore
//! use eda::llm::ProviderRegistry;
//!
//! let registry = ProviderRegistry::from_config(&config);
//! let client = registry.create_client_for_model("smart").await?;
//! let answer = client.generate_with_system("You are terse.", "What is 2+2?").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// Registry for managing multiple LLM provider instances.
pub mod provider_registry;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{LLMClient, Provider};
pub use provider_registry::ProviderRegistry;
