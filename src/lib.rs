//! # emotibot-analysis
//!
//! Scores a piece of text along one of three dimensions (style, impact,
//! outcome) by asking an LLM provider for a structured evaluation.
//!
//! ## Key Features
//!
//! - **Pluggable providers**: OpenAI, Anthropic, or a hosted backend function,
//!   switchable at runtime through [`ProviderRegistry`]
//! - **Declarative prompts**: one template per [`AnalysisCategory`], overridable
//!   at runtime through [`TemplateRegistry`]
//! - **Fixed result shape**: every reply is normalized into [`AnalysisResult`]
//!   with all of the category's metrics present
//! - **Uniform errors**: [`AnalysisError`] distinguishes unavailable providers,
//!   transport failures and malformed replies
//!
//! ## Example
//!
//! ```rust,no_run
//! use emotibot_analysis::{AnalysisCategory, AnalysisConfig, ProviderOptions, TextAnalyzer};
//!
//! # async fn example() -> Result<(), emotibot_analysis::AnalysisError> {
//! let config = AnalysisConfig::from_env()?;
//! let analyzer = TextAnalyzer::from_config(&config)?;
//!
//! analyzer
//!     .registry()
//!     .set_provider("anthropic", Some(ProviderOptions::with_model("claude-3-5-haiku-20241022")));
//!
//! let result = analyzer
//!     .analyze("Hello, how are you?", AnalysisCategory::Style)
//!     .await?;
//! println!("clarity = {:?}", result.score("clarity"));
//! # Ok(())
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod analyzer;
pub mod category;
pub mod config;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod registry;
pub mod response_parser;
pub mod result;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use analyzer::{AnalysisStage, TextAnalyzer};
pub use category::{AnalysisCategory, MetricDefinition};
pub use config::{
    AnalysisConfig, AnthropicConfig, EdgeFunctionConfig, OpenAIConfig, ProviderConfig,
};
pub use error::{AnalysisError, AnalysisOutcome, TransportFailure};
pub use prompts::{format_template, TemplateRegistry};
pub use providers::{AnalysisProvider, AnthropicProvider, EdgeFunctionProvider, OpenAIProvider};
pub use registry::{ProviderKind, ProviderOptions, ProviderRegistry};
pub use result::AnalysisResult;
pub use store::{AnalysisRecord, InMemoryResultStore, ResultStore};
