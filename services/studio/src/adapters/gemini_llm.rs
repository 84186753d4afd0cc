//! services/studio/src/adapters/gemini_llm.rs
//!
//! This module contains the adapter for the design-evaluation LLM.
//! It implements the `TextGenerationService` port from the `core` crate by talking
//! to Gemini through its OpenAI-compatible endpoint.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use design_review_core::ports::{PortError, PortResult, TextGenerationService};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` with structured JSON output.
///
/// Without an API key the adapter still exists, and every call fails with
/// `PortError::MissingCredential`.
#[derive(Clone)]
pub struct GeminiEvaluationAdapter {
    client: Option<Client<OpenAIConfig>>,
    model: String,
}

impl GeminiEvaluationAdapter {
    /// Creates a new `GeminiEvaluationAdapter`.
    pub fn new(api_key: Option<&str>, api_base: &str, model: String) -> Self {
        let client = api_key.map(|key| {
            Client::with_config(
                OpenAIConfig::new()
                    .with_api_key(key)
                    .with_api_base(api_base),
            )
        });
        Self { client, model }
    }

    pub fn has_credential(&self) -> bool {
        self.client.is_some()
    }
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for GeminiEvaluationAdapter {
    async fn generate_json(
        &self,
        prompt: &str,
        response_schema: &serde_json::Value,
    ) -> PortResult<String> {
        let client = self.client.as_ref().ok_or(PortError::MissingCredential)?;

        let messages: Vec<ChatCompletionRequestMessage> = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: Some("A system design evaluation".to_string()),
                    name: "evaluation".to_string(),
                    schema: Some(response_schema.clone()),
                    strict: None,
                },
            })
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!("Requesting evaluation from model {}", self.model);

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Evaluation LLM response contained no text content.".to_string())
            })
    }
}
