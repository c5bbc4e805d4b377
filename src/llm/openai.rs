use crate::llm::client::LLMClient;
use crate::types::{AppError, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

pub struct OpenAIClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAIClient {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Self {
            client: Client::with_config(config),
            model,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    async fn complete(&self, messages: Vec<ChatCompletionRequestMessage>) -> Result<String> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model).messages(messages);
        if let Some(temperature) = self.temperature {
            args.temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            args.max_completion_tokens(max_tokens);
        }

        let request = args
            .build()
            .map_err(|e| AppError::LLM(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(prompt.to_string()),
        )])
        .await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.complete(vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage::from(
                system.to_string(),
            )),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(
                prompt.to_string(),
            )),
        ])
        .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
