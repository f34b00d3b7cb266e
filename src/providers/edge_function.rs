//! Backend-function provider
//!
//! Posts `{message, type, model, promptOverride}` to an analysis function
//! hosted on a backend-as-a-service. The function calls the LLM vendor and
//! answers with the result object, or with `{"error": "..."}`.

use super::http::{self, ModelSelection};
use super::AnalysisProvider;
use crate::category::AnalysisCategory;
use crate::config::{is_set, EdgeFunctionConfig, EDGE_FUNCTION_PROVIDER};
use crate::error::{AnalysisError, AnalysisOutcome, TransportFailure};
use crate::logging::{log_debug, log_info};
use crate::prompts::TemplateRegistry;
use crate::response_parser::{normalize, ResponseParser};
use crate::result::AnalysisResult;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Request body understood by the hosted function
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EdgeFunctionRequest<'a> {
    pub message: &'a str,
    #[serde(rename = "type")]
    pub category: &'static str,
    pub model: String,
    pub prompt_override: String,
}

/// Category name the hosted function accepts in `type`
fn function_type(category: AnalysisCategory) -> &'static str {
    match category {
        AnalysisCategory::Outcome => "result",
        other => other.as_str(),
    }
}

/// Provider backed by a hosted analysis function
#[derive(Debug)]
pub struct EdgeFunctionProvider {
    client: reqwest::Client,
    config: EdgeFunctionConfig,
    templates: Arc<TemplateRegistry>,
    model: ModelSelection,
}

impl EdgeFunctionProvider {
    /// Create a new backend-function provider
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ConfigurationError`] if the HTTP client
    /// cannot be built.
    pub fn new(
        config: EdgeFunctionConfig,
        templates: Arc<TemplateRegistry>,
        request_timeout: Option<Duration>,
    ) -> AnalysisOutcome<Self> {
        log_debug!(
            provider = EDGE_FUNCTION_PROVIDER,
            function_url = %config.function_url(),
            has_anon_key = is_set(config.anon_key.as_deref()),
            "Creating backend function provider"
        );

        Ok(Self {
            client: http::build_client(request_timeout)?,
            model: ModelSelection::new(config.default_model.clone()),
            config,
            templates,
        })
    }
}

#[async_trait]
impl AnalysisProvider for EdgeFunctionProvider {
    fn name(&self) -> &'static str {
        EDGE_FUNCTION_PROVIDER
    }

    async fn is_available(&self) -> bool {
        is_set(Some(self.config.base_url.as_str()))
            && is_set(Some(self.config.function_name.as_str()))
            && is_set(self.config.anon_key.as_deref())
    }

    fn set_model(&self, model: &str) {
        self.model.set(model);
        log_info!(
            provider = EDGE_FUNCTION_PROVIDER,
            model = %model,
            "Backend function model set"
        );
    }

    fn model(&self) -> String {
        self.model.get()
    }

    async fn analyze(
        &self,
        text: &str,
        category: AnalysisCategory,
    ) -> AnalysisOutcome<AnalysisResult> {
        let request = EdgeFunctionRequest {
            message: text,
            category: function_type(category),
            model: self.model.get(),
            prompt_override: self.templates.build_prompt(category, text),
        };

        let anon_key = self.config.anon_key.as_deref().unwrap_or_default();
        let mut headers = http::bearer_headers(EDGE_FUNCTION_PROVIDER, anon_key)?;
        headers.insert(
            "apikey",
            HeaderValue::from_str(anon_key).map_err(|e| {
                AnalysisError::configuration_error(format!("Invalid anon key format: {e}"))
            })?,
        );

        log_debug!(
            provider = EDGE_FUNCTION_PROVIDER,
            category = %category,
            model = %request.model,
            "Invoking backend analysis function"
        );

        let url = self.config.function_url();
        let raw_body =
            http::post_json(EDGE_FUNCTION_PROVIDER, &self.client, &url, headers, &request).await?;

        let reply = ResponseParser::parse_llm_output(EDGE_FUNCTION_PROVIDER, &raw_body)?;
        if !reply.contains_key("metrics") {
            if let Some(error) = reply.get("error") {
                let message = match error {
                    serde_json::Value::String(message) => message.clone(),
                    other => other.to_string(),
                };
                return Err(AnalysisError::transport_error(
                    EDGE_FUNCTION_PROVIDER,
                    TransportFailure::ErrorPayload,
                    message,
                    None,
                ));
            }
        }
        normalize(EDGE_FUNCTION_PROVIDER, reply, category)
    }
}
