use crate::error::{AnalysisError, AnalysisOutcome};
use crate::logging::log_debug;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

/// Registry name of the OpenAI provider
pub const OPENAI_PROVIDER: &str = "openai";
/// Registry name of the Anthropic provider
pub const ANTHROPIC_PROVIDER: &str = "anthropic";
/// Registry name of the hosted backend-function provider
pub const EDGE_FUNCTION_PROVIDER: &str = "edge-function";

/// Canonical form of a provider name: trimmed and lowercased
pub fn normalize_provider_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Whether a configured value is present and not blank
pub(crate) fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Trait for provider-specific configuration
pub trait ProviderConfig: Send + Sync + Debug {
    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Validate provider configuration
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ConfigurationError`] if required fields
    /// (API key, base URL) are missing.
    fn validate(&self) -> AnalysisOutcome<()>;

    /// Get the base URL for API calls
    fn base_url(&self) -> &str;

    /// Get the API key if required
    fn api_key(&self) -> Option<&str>;

    /// Get the default model name
    fn default_model(&self) -> &str;
}

/// OpenAI-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            default_model: "gpt-4.1-mini".to_string(),
        }
    }
}

impl ProviderConfig for OpenAIConfig {
    fn provider_name(&self) -> &'static str {
        OPENAI_PROVIDER
    }

    fn validate(&self) -> AnalysisOutcome<()> {
        if !is_set(self.api_key.as_deref()) {
            return Err(AnalysisError::configuration_error(
                "OpenAI API key is required",
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(AnalysisError::configuration_error(
                "OpenAI base URL is required",
            ));
        }
        Ok(())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

/// Anthropic-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_model: String,
    /// Upper bound on reply tokens, required by the Messages API
    pub max_tokens: u32,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            default_model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 1024,
        }
    }
}

impl ProviderConfig for AnthropicConfig {
    fn provider_name(&self) -> &'static str {
        ANTHROPIC_PROVIDER
    }

    fn validate(&self) -> AnalysisOutcome<()> {
        if !is_set(self.api_key.as_deref()) {
            return Err(AnalysisError::configuration_error(
                "Anthropic API key is required",
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(AnalysisError::configuration_error(
                "Anthropic base URL is required",
            ));
        }
        Ok(())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

/// Configuration for an analysis function hosted on a backend-as-a-service
///
/// The function receives `{message, type, model, promptOverride}` and calls
/// the vendor itself, so only the project URL and anon key live client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeFunctionConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Public anon key sent as bearer token and `apikey` header
    pub anon_key: Option<String>,
    /// Name of the deployed function
    pub function_name: String,
    pub default_model: String,
}

impl Default for EdgeFunctionConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            anon_key: None,
            function_name: "analyze-text".to_string(),
            default_model: "gpt-4.1-mini".to_string(),
        }
    }
}

impl EdgeFunctionConfig {
    /// Full URL of the deployed function
    pub fn function_url(&self) -> String {
        format!(
            "{}/functions/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.function_name
        )
    }
}

impl ProviderConfig for EdgeFunctionConfig {
    fn provider_name(&self) -> &'static str {
        EDGE_FUNCTION_PROVIDER
    }

    fn validate(&self) -> AnalysisOutcome<()> {
        if self.base_url.trim().is_empty() {
            return Err(AnalysisError::configuration_error(
                "Backend function base URL is required",
            ));
        }
        if !is_set(self.anon_key.as_deref()) {
            return Err(AnalysisError::configuration_error(
                "Backend function anon key is required",
            ));
        }
        if self.function_name.trim().is_empty() {
            return Err(AnalysisError::configuration_error(
                "Backend function name is required",
            ));
        }
        Ok(())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> Option<&str> {
        self.anon_key.as_deref()
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

/// Configuration for every provider in the registry plus the startup default
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Provider made active when the registry is built
    pub default_provider: String,
    pub openai: OpenAIConfig,
    pub anthropic: AnthropicConfig,
    pub edge_function: EdgeFunctionConfig,
    /// Per-request timeout applied by the HTTP client; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_provider: OPENAI_PROVIDER.to_string(),
            openai: OpenAIConfig::default(),
            anthropic: AnthropicConfig::default(),
            edge_function: EdgeFunctionConfig::default(),
            request_timeout: None,
        }
    }
}

impl AnalysisConfig {
    /// Configuration of the named provider, if it is supported
    pub fn provider_config(&self, name: &str) -> Option<&dyn ProviderConfig> {
        match normalize_provider_name(name).as_str() {
            OPENAI_PROVIDER => Some(&self.openai),
            ANTHROPIC_PROVIDER => Some(&self.anthropic),
            EDGE_FUNCTION_PROVIDER => Some(&self.edge_function),
            _ => None,
        }
    }

    /// Check the default provider is supported and completely configured
    ///
    /// Other providers may lack credentials; they report themselves
    /// unavailable instead of failing configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnknownProvider`] for an unsupported default,
    /// or the provider's own [`AnalysisError::ConfigurationError`].
    pub fn validate(&self) -> AnalysisOutcome<()> {
        let provider = self
            .provider_config(&self.default_provider)
            .ok_or_else(|| AnalysisError::unknown_provider(&self.default_provider))?;
        provider.validate()
    }

    /// Load configuration from environment variables
    /// This is the ONLY method that should access environment variables
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `AI_PROVIDER` | `default_provider` (default `openai`) |
    /// | `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_MODEL` | `openai` |
    /// | `ANTHROPIC_API_KEY`, `ANTHROPIC_BASE_URL`, `ANTHROPIC_MODEL` | `anthropic` |
    /// | `SUPABASE_URL`, `SUPABASE_ANON_KEY`, `ANALYSIS_FUNCTION_NAME` | `edge_function` |
    /// | `ANALYSIS_REQUEST_TIMEOUT_SECS` | `request_timeout` |
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ConfigurationError`] for an unparsable timeout
    /// or an incomplete default provider, and [`AnalysisError::UnknownProvider`]
    /// when `AI_PROVIDER` names an unsupported provider.
    pub fn from_env() -> AnalysisOutcome<Self> {
        let mut config = Self::default();

        if let Ok(provider) = std::env::var("AI_PROVIDER") {
            config.default_provider = normalize_provider_name(&provider);
        }

        log_debug!(
            target_provider = %config.default_provider,
            "Loading analysis configuration from environment"
        );

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            config.openai.api_key = Some(api_key);
        }
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config.openai.base_url = base_url;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.openai.default_model = model;
        }

        if let Ok(api_key) = std::env::var("ANTHROPIC_API_KEY") {
            config.anthropic.api_key = Some(api_key);
        }
        if let Ok(base_url) = std::env::var("ANTHROPIC_BASE_URL") {
            config.anthropic.base_url = base_url;
        }
        if let Ok(model) = std::env::var("ANTHROPIC_MODEL") {
            config.anthropic.default_model = model;
        }

        if let Ok(base_url) = std::env::var("SUPABASE_URL") {
            config.edge_function.base_url = base_url;
        }
        if let Ok(anon_key) = std::env::var("SUPABASE_ANON_KEY") {
            config.edge_function.anon_key = Some(anon_key);
        }
        if let Ok(function_name) = std::env::var("ANALYSIS_FUNCTION_NAME") {
            config.edge_function.function_name = function_name;
        }

        if let Ok(raw) = std::env::var("ANALYSIS_REQUEST_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                AnalysisError::configuration_error(format!(
                    "Invalid ANALYSIS_REQUEST_TIMEOUT_SECS '{raw}': {e}"
                ))
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        config.validate()?;

        log_debug!(
            provider = %config.default_provider,
            has_openai_key = is_set(config.openai.api_key.as_deref()),
            has_anthropic_key = is_set(config.anthropic.api_key.as_deref()),
            has_edge_function = !config.edge_function.base_url.is_empty(),
            request_timeout_secs = config.request_timeout.map(|d| d.as_secs()),
            "Analysis configuration loaded and validated"
        );

        Ok(config)
    }
}
