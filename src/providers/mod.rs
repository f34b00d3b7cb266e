//! Analysis provider implementations
//!
//! Each provider talks to one remote completion endpoint:
//!
//! - **openai**: OpenAI Chat Completions API in JSON mode
//! - **anthropic**: Anthropic Messages API
//! - **edge_function**: an analysis function hosted on a backend-as-a-service,
//!   which calls the vendor on the client's behalf
//! - **http**: request sending and error classification shared by all three
//!
//! ```text
//! TemplateRegistry -> prompt -> http::post_json -> raw reply
//!                                                    |
//!                      response_parser::parse_and_normalize -> AnalysisResult
//! ```

use crate::category::AnalysisCategory;
use crate::error::AnalysisOutcome;
use crate::result::AnalysisResult;
use async_trait::async_trait;

pub mod anthropic;
pub mod edge_function;
pub(crate) mod http;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use edge_function::EdgeFunctionProvider;
pub use openai::OpenAIProvider;

/// A swappable strategy that scores text through one LLM vendor
///
/// Providers hold no per-request state. The only mutable state is the
/// selected model, which each call reads once when it starts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Registry name, e.g. `"openai"`
    fn name(&self) -> &'static str;

    /// Whether the provider has the credentials it needs
    ///
    /// The default is an always-true stub for providers with nothing to check.
    async fn is_available(&self) -> bool {
        true
    }

    /// Select the model used by subsequent calls
    fn set_model(&self, model: &str);

    /// Currently selected model
    fn model(&self) -> String;

    /// Score `text` for `category`
    ///
    /// # Errors
    ///
    /// `TransportError` when the endpoint cannot be reached or rejects the
    /// call, `MalformedResponse` when the reply is not a JSON object.
    async fn analyze(
        &self,
        text: &str,
        category: AnalysisCategory,
    ) -> AnalysisOutcome<AnalysisResult>;
}
