//! OpenAI provider implementation
//!
//! Calls the Chat Completions API in JSON mode with the shared system
//! instruction and the category prompt as the user message.

use super::http::{self, ModelSelection};
use super::AnalysisProvider;
use crate::category::AnalysisCategory;
use crate::config::{is_set, OpenAIConfig, OPENAI_PROVIDER};
use crate::error::{AnalysisError, AnalysisOutcome};
use crate::logging::{log_debug, log_info};
use crate::prompts::{TemplateRegistry, SYSTEM_INSTRUCTION};
use crate::response_parser::parse_and_normalize;
use crate::result::AnalysisResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// OpenAI chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

/// `response_format` request field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct OpenAIResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String, // "json_object"
}

/// Chat completion request
#[derive(Debug, Clone, Serialize)]
pub(crate) struct OpenAIRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    pub response_format: OpenAIResponseFormat,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub(crate) struct OpenAIResponse {
    pub choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAIChoice {
    pub message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenAIResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// OpenAI provider implementation
#[derive(Debug)]
pub struct OpenAIProvider {
    client: reqwest::Client,
    config: OpenAIConfig,
    templates: Arc<TemplateRegistry>,
    model: ModelSelection,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider instance
    ///
    /// A missing API key is not an error here; the provider reports itself
    /// unavailable instead.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ConfigurationError`] if the HTTP client
    /// cannot be built.
    pub fn new(
        config: OpenAIConfig,
        templates: Arc<TemplateRegistry>,
        request_timeout: Option<Duration>,
    ) -> AnalysisOutcome<Self> {
        log_debug!(
            provider = OPENAI_PROVIDER,
            has_api_key = is_set(config.api_key.as_deref()),
            base_url = %config.base_url,
            default_model = %config.default_model,
            "Creating OpenAI provider"
        );

        Ok(Self {
            client: http::build_client(request_timeout)?,
            model: ModelSelection::new(config.default_model.clone()),
            config,
            templates,
        })
    }

    fn build_request(&self, model: String, prompt: String) -> OpenAIRequest {
        OpenAIRequest {
            model,
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            response_format: OpenAIResponseFormat {
                format_type: "json_object".to_string(),
            },
        }
    }

    /// First choice's message content
    fn extract_content(raw_body: &str) -> AnalysisOutcome<String> {
        let response: OpenAIResponse = serde_json::from_str(raw_body).map_err(|e| {
            AnalysisError::malformed_response(
                OPENAI_PROVIDER,
                format!("Invalid OpenAI response: {e}"),
                raw_body,
            )
        })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AnalysisError::malformed_response(
                    OPENAI_PROVIDER,
                    "No message content in OpenAI response",
                    raw_body,
                )
            })
    }
}

#[async_trait]
impl AnalysisProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        OPENAI_PROVIDER
    }

    async fn is_available(&self) -> bool {
        is_set(self.config.api_key.as_deref())
    }

    fn set_model(&self, model: &str) {
        self.model.set(model);
        log_info!(provider = OPENAI_PROVIDER, model = %model, "OpenAI model set");
    }

    fn model(&self) -> String {
        self.model.get()
    }

    async fn analyze(
        &self,
        text: &str,
        category: AnalysisCategory,
    ) -> AnalysisOutcome<AnalysisResult> {
        let model = self.model.get();
        let prompt = self.templates.build_prompt(category, text);
        let request = self.build_request(model, prompt);

        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        let headers = http::bearer_headers(OPENAI_PROVIDER, api_key)?;
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        log_debug!(
            provider = OPENAI_PROVIDER,
            category = %category,
            model = %request.model,
            "Sending analysis request"
        );

        let raw_body = http::post_json(OPENAI_PROVIDER, &self.client, &url, headers, &request).await?;
        let content = Self::extract_content(&raw_body)?;
        parse_and_normalize(OPENAI_PROVIDER, &content, category)
    }
}
