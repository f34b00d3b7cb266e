//! Prompt template registry
//!
//! Holds one instruction template per [`AnalysisCategory`]. Defaults are
//! compiled in; callers may override a category's template at runtime. Overrides
//! live for the lifetime of the registry and are never persisted.

use crate::category::AnalysisCategory;
use crate::logging::{log_debug, log_info, log_warn};
use std::collections::HashMap;
use std::sync::RwLock;

/// Marker replaced with the user's text by [`format_template`]
pub const PLACEHOLDER: &str = "{message}";

/// System instruction sent alongside every analysis prompt
pub const SYSTEM_INSTRUCTION: &str = "You are an AI assistant that analyzes text and provides \
both metrics and detailed explanations. Respond only with the JSON object requested, using \
exactly the keys and metric names given. Write the analysis, summary and suggestions in the \
same language as the text you analyze.";

const STYLE_TEMPLATE: &str = r#"Analyze the style of this text: "{message}"
Return a JSON object with:
1. "metrics": an object with numerical scores for clarity, conciseness, formality, engagement and complexity, each on a scale of 0-100.
2. "analysis": an object with a detailed explanation for each metric, keyed by metric name.
3. "summary": a string with an overall analysis of the text style.
4. "suggestions": an array with 2-3 specific, actionable suggestions to improve the style, written in the same language as the analyzed text."#;

const IMPACT_TEMPLATE: &str = r#"Analyze the emotional impact of this text: "{message}"
Return a JSON object with:
1. "metrics": an object with numerical scores for empathy, authority, persuasiveness, approachability and confidence, each on a scale of 0-100.
2. "analysis": an object with a detailed explanation for each metric, keyed by metric name.
3. "summary": a string with an overall analysis of the emotional impact.
4. "suggestions": an array with 2-3 specific, actionable suggestions to improve the emotional impact, written in the same language as the analyzed text."#;

const OUTCOME_TEMPLATE: &str = r#"Analyze the potential results of this message: "{message}"
Return a JSON object with:
1. "metrics": an object with numerical scores for effectiveness, actionability, memorability, influence and audience_fit, each on a scale of 0-100.
2. "analysis": an object with a detailed explanation for each metric, keyed by metric name.
3. "summary": a string with an overall prediction of the message's results.
4. "suggestions": an array with 2-3 specific, actionable suggestions to improve the results, written in the same language as the analyzed text."#;

/// Compiled-in template for a category
pub fn default_template(category: AnalysisCategory) -> &'static str {
    match category {
        AnalysisCategory::Style => STYLE_TEMPLATE,
        AnalysisCategory::Impact => IMPACT_TEMPLATE,
        AnalysisCategory::Outcome => OUTCOME_TEMPLATE,
    }
}

/// Substitute `text` into `template`
///
/// Every occurrence of [`PLACEHOLDER`] is replaced. The text is inserted
/// verbatim: no escaping or sanitization is applied.
pub fn format_template(template: &str, text: &str) -> String {
    template.replace(PLACEHOLDER, text)
}

/// Category → template table with runtime overrides
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    overrides: RwLock<HashMap<AnalysisCategory, String>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current template for `category`: the override if one is set, else the default
    pub fn get_template(&self, category: AnalysisCategory) -> String {
        let overrides = self.overrides.read().unwrap_or_else(|e| e.into_inner());
        match overrides.get(&category) {
            Some(template) => template.clone(),
            None => default_template(category).to_string(),
        }
    }

    /// Template for a category given by name
    ///
    /// Unrecognized names fall back to [`AnalysisCategory::DEFAULT`].
    pub fn get_template_by_name(&self, name: &str) -> String {
        match name.parse::<AnalysisCategory>() {
            Ok(category) => self.get_template(category),
            Err(_) => {
                log_warn!(
                    requested = %name,
                    fallback = %AnalysisCategory::DEFAULT,
                    "Unknown analysis category, using default template"
                );
                self.get_template(AnalysisCategory::DEFAULT)
            }
        }
    }

    /// Replace the template for `category` for all subsequent calls
    ///
    /// The template is not validated; a template without [`PLACEHOLDER`]
    /// simply never includes the user's text.
    pub fn set_template(&self, category: AnalysisCategory, template: impl Into<String>) {
        let template = template.into();
        log_info!(
            category = %category,
            template_length = template.len(),
            has_placeholder = template.contains(PLACEHOLDER),
            "Prompt template overridden"
        );
        self.overrides
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(category, template);
    }

    /// Restore the compiled-in template for `category`
    pub fn reset_template(&self, category: AnalysisCategory) {
        let removed = self
            .overrides
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&category)
            .is_some();
        log_debug!(category = %category, removed, "Prompt template reset");
    }

    /// Drop every override
    pub fn reset_all(&self) {
        self.overrides
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        log_debug!("All prompt template overrides cleared");
    }

    /// Fully formatted prompt for `text` in `category`
    pub fn build_prompt(&self, category: AnalysisCategory, text: &str) -> String {
        format_template(&self.get_template(category), text)
    }
}
