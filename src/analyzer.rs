//! Analysis facade
//!
//! [`TextAnalyzer`] is the single entry point for callers. Each call walks
//! the stages of [`AnalysisStage`] and ends either in a complete
//! [`AnalysisResult`] or in an error; there is no partial result and no retry.

use crate::category::AnalysisCategory;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisOutcome};
use crate::logging::{log_debug, log_info};
use crate::prompts::TemplateRegistry;
use crate::providers::AnalysisProvider;
use crate::registry::ProviderRegistry;
use crate::result::{AnalysisResult, MIN_SCORE};
use crate::store::{AnalysisRecord, ResultStore};
use std::fmt;
use std::sync::Arc;

const TEXT_PREVIEW_CHARS: usize = 30;

/// Per-request lifecycle, reported in logs as `stage`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    ValidatingInput,
    CheckingAvailability,
    Dispatching,
    Normalizing,
    Done,
    Error,
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisStage::ValidatingInput => "validating_input",
            AnalysisStage::CheckingAvailability => "checking_availability",
            AnalysisStage::Dispatching => "dispatching",
            AnalysisStage::Normalizing => "normalizing",
            AnalysisStage::Done => "done",
            AnalysisStage::Error => "error",
        };
        f.write_str(name)
    }
}

/// Single entry point for text analysis
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    registry: Arc<ProviderRegistry>,
}

impl TextAnalyzer {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// Build templates, providers and registry from `config`
    ///
    /// # Errors
    ///
    /// Propagates [`ProviderRegistry::from_config`] failures.
    pub fn from_config(config: &AnalysisConfig) -> AnalysisOutcome<Self> {
        let templates = Arc::new(TemplateRegistry::new());
        let registry = ProviderRegistry::from_config(config, templates)?;
        Ok(Self::new(Arc::new(registry)))
    }

    /// Registry used to resolve the active provider
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Score `text` for `category` with the active provider
    ///
    /// The active provider is read once, when the call starts.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InvalidInput`] for blank text
    /// - [`AnalysisError::ProviderUnavailable`] if the availability check fails;
    ///   the provider is never asked to analyze
    /// - [`AnalysisError::AnalysisFailed`] wrapping whatever the provider
    ///   returned (see [`AnalysisError::cause`])
    pub async fn analyze(
        &self,
        text: &str,
        category: AnalysisCategory,
    ) -> AnalysisOutcome<AnalysisResult> {
        let provider = self.registry.active_provider();
        run(provider.as_ref(), text, category).await
    }

    /// Analyse `text` and save the result to `store`
    ///
    /// # Errors
    ///
    /// Everything [`analyze`](Self::analyze) returns, plus the store's own
    /// failures. Nothing is saved when analysis fails.
    pub async fn analyze_and_record(
        &self,
        text: &str,
        category: AnalysisCategory,
        store: &dyn ResultStore,
    ) -> AnalysisOutcome<AnalysisRecord> {
        let provider = self.registry.active_provider();
        let result = run(provider.as_ref(), text, category).await?;
        let record = AnalysisRecord::new(text, category, provider.name(), result);
        store.save(record.clone()).await?;
        Ok(record)
    }
}

async fn run(
    provider: &dyn AnalysisProvider,
    text: &str,
    category: AnalysisCategory,
) -> AnalysisOutcome<AnalysisResult> {
    let name = provider.name();
    log_info!(
        provider = name,
        category = %category,
        text_preview = %text.chars().take(TEXT_PREVIEW_CHARS).collect::<String>(),
        "Analyzing text"
    );

    log_debug!(provider = name, stage = %AnalysisStage::ValidatingInput);
    if text.trim().is_empty() {
        log_debug!(provider = name, stage = %AnalysisStage::Error);
        return Err(AnalysisError::invalid_input("Message is required"));
    }

    log_debug!(provider = name, stage = %AnalysisStage::CheckingAvailability);
    if !provider.is_available().await {
        log_debug!(provider = name, stage = %AnalysisStage::Error);
        return Err(AnalysisError::provider_unavailable(name));
    }

    log_debug!(provider = name, model = %provider.model(), stage = %AnalysisStage::Dispatching);
    let mut result = match provider.analyze(text, category).await {
        Ok(result) => result,
        Err(e) => {
            log_debug!(provider = name, stage = %AnalysisStage::Error);
            return Err(AnalysisError::analysis_failed(name, e));
        }
    };

    log_debug!(provider = name, stage = %AnalysisStage::Normalizing);
    fill_missing_metrics(&mut result, category);

    log_debug!(
        provider = name,
        stage = %AnalysisStage::Done,
        suggestions = result.suggestions.len(),
        "Analysis completed"
    );
    Ok(result)
}

/// Guarantee every category metric is present, whatever the provider returned
fn fill_missing_metrics(result: &mut AnalysisResult, category: AnalysisCategory) {
    for name in category.metric_names() {
        result.metrics.entry(name.to_string()).or_insert(MIN_SCORE);
    }
}
