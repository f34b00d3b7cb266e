//! The fixed result shape every provider returns

use crate::category::AnalysisCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest score a metric can hold
pub const MIN_SCORE: f64 = 0.0;
/// Highest score a metric can hold
pub const MAX_SCORE: f64 = 100.0;

/// Scored evaluation of one text for one category
///
/// Instances built by this crate always contain every metric of the
/// requested category in `metrics`. See [`crate::response_parser::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisResult {
    /// Metric name to score in `[0, 100]`
    pub metrics: BTreeMap<String, f64>,
    /// Metric name to explanation of the score
    #[serde(default)]
    pub analysis: BTreeMap<String, String>,
    /// Overall assessment
    #[serde(default)]
    pub summary: String,
    /// Actionable recommendations, in the order the model gave them
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl AnalysisResult {
    /// Score for a metric, if present
    pub fn score(&self, metric: &str) -> Option<f64> {
        self.metrics.get(metric).copied()
    }

    /// Mean of the category's metric scores, missing metrics counted as 0
    pub fn average_score(&self, category: AnalysisCategory) -> f64 {
        let metrics = category.metrics();
        if metrics.is_empty() {
            return MIN_SCORE;
        }
        let total: f64 = metrics
            .iter()
            .map(|m| self.score(m.id).unwrap_or(MIN_SCORE))
            .sum();
        total / metrics.len() as f64
    }

    /// Whether every metric of `category` is present
    pub fn is_complete_for(&self, category: AnalysisCategory) -> bool {
        category
            .metric_names()
            .all(|name| self.metrics.contains_key(name))
    }
}
