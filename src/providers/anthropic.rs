//! Anthropic Claude provider implementation
//!
//! Uses the native Messages API: the shared instruction goes in the
//! top-level `system` field and the category prompt is the only user turn.

use super::http::{self, ModelSelection};
use super::AnalysisProvider;
use crate::category::AnalysisCategory;
use crate::config::{is_set, AnthropicConfig, ANTHROPIC_PROVIDER};
use crate::error::{AnalysisError, AnalysisOutcome};
use crate::logging::{log_debug, log_info};
use crate::prompts::{TemplateRegistry, SYSTEM_INSTRUCTION};
use crate::response_parser::parse_and_normalize;
use crate::result::AnalysisResult;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Messages API request
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnthropicRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnthropicMessage {
    pub role: String,
    pub content: String,
}

/// Messages API response
#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicResponse {
    pub content: Vec<AnthropicContentBlock>,
}

/// Content block in a response; only text blocks carry the result
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Anthropic Claude provider implementation
#[derive(Debug)]
pub struct AnthropicProvider {
    client: reqwest::Client,
    config: AnthropicConfig,
    templates: Arc<TemplateRegistry>,
    model: ModelSelection,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider instance
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ConfigurationError`] if the HTTP client
    /// cannot be built.
    pub fn new(
        config: AnthropicConfig,
        templates: Arc<TemplateRegistry>,
        request_timeout: Option<Duration>,
    ) -> AnalysisOutcome<Self> {
        log_debug!(
            provider = ANTHROPIC_PROVIDER,
            has_api_key = is_set(config.api_key.as_deref()),
            base_url = %config.base_url,
            default_model = %config.default_model,
            "Creating Anthropic provider"
        );

        Ok(Self {
            client: http::build_client(request_timeout)?,
            model: ModelSelection::new(config.default_model.clone()),
            config,
            templates,
        })
    }

    fn build_headers(&self) -> AnalysisOutcome<HeaderMap> {
        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                AnalysisError::configuration_error(format!("Invalid Anthropic API key format: {e}"))
            })?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        Ok(headers)
    }

    /// Concatenated text blocks of the reply
    fn extract_content(raw_body: &str) -> AnalysisOutcome<String> {
        let response: AnthropicResponse = serde_json::from_str(raw_body).map_err(|e| {
            AnalysisError::malformed_response(
                ANTHROPIC_PROVIDER,
                format!("Invalid Anthropic response: {e}"),
                raw_body,
            )
        })?;

        let text = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text),
                AnthropicContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(AnalysisError::malformed_response(
                ANTHROPIC_PROVIDER,
                "No text content in Anthropic response",
                raw_body,
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl AnalysisProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        ANTHROPIC_PROVIDER
    }

    async fn is_available(&self) -> bool {
        is_set(self.config.api_key.as_deref())
    }

    fn set_model(&self, model: &str) {
        self.model.set(model);
        log_info!(provider = ANTHROPIC_PROVIDER, model = %model, "Anthropic model set");
    }

    fn model(&self) -> String {
        self.model.get()
    }

    async fn analyze(
        &self,
        text: &str,
        category: AnalysisCategory,
    ) -> AnalysisOutcome<AnalysisResult> {
        let request = AnthropicRequest {
            model: self.model.get(),
            max_tokens: self.config.max_tokens,
            system: SYSTEM_INSTRUCTION.to_string(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: self.templates.build_prompt(category, text),
            }],
        };
        let headers = self.build_headers()?;
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));

        log_debug!(
            provider = ANTHROPIC_PROVIDER,
            category = %category,
            model = %request.model,
            "Sending analysis request"
        );

        let raw_body =
            http::post_json(ANTHROPIC_PROVIDER, &self.client, &url, headers, &request).await?;
        let content = Self::extract_content(&raw_body)?;
        parse_and_normalize(ANTHROPIC_PROVIDER, &content, category)
    }
}
