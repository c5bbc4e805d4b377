use crate::llm::client::LLMClient;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use ollama_rs::{
    generation::chat::{request::ChatMessageRequest, ChatMessage},
    models::ModelOptions,
    Ollama,
};

const DEFAULT_PORT: u16 = 11434;

pub struct OllamaClient {
    client: Ollama,
    model: String,
    temperature: Option<f32>,
}

/// Split `scheme://host[:port]` into the `scheme://host` part and a port
fn split_base_url(base_url: &str) -> (String, u16) {
    let (scheme, rest) = match base_url.split_once("://") {
        Some((scheme, rest)) => (scheme, rest),
        None => ("http", base_url),
    };
    let rest = rest.trim_end_matches('/');

    let (host, port) = match rest.rsplit_once(':') {
        Some((host, port)) => (host, port.parse().unwrap_or(DEFAULT_PORT)),
        None => (rest, DEFAULT_PORT),
    };
    let host = if host.is_empty() { "localhost" } else { host };

    (format!("{}://{}", scheme, host), port)
}

impl OllamaClient {
    pub async fn new(base_url: String, model: String) -> Result<Self> {
        let (host, port) = split_base_url(&base_url);
        let client = Ollama::new(host, port);

        Ok(Self {
            client,
            model,
            temperature: None,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let mut request = ChatMessageRequest::new(self.model.clone(), messages);
        if let Some(temperature) = self.temperature {
            request = request.options(ModelOptions::default().temperature(temperature));
        }

        let response = self
            .client
            .send_chat_messages(request)
            .await
            .map_err(|e| AppError::LLM(format!("Ollama error: {}", e)))?;

        Ok(response.message.content)
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.chat(vec![ChatMessage::user(prompt.to_string())]).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(vec![
            ChatMessage::system(system.to_string()),
            ChatMessage::user(prompt.to_string()),
        ])
        .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
