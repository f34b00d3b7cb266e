//! Analysis categories and their metric catalogue
//!
//! A category selects both the prompt template sent to the model and the
//! fixed set of metric names the result must contain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single scored dimension within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDefinition {
    /// Key used in `AnalysisResult::metrics` and `AnalysisResult::analysis`
    pub id: &'static str,
    /// Human-readable label for gauges
    pub label: &'static str,
    /// One-line explanation of what the score measures
    pub description: &'static str,
}

const STYLE_METRICS: [MetricDefinition; 5] = [
    MetricDefinition {
        id: "clarity",
        label: "Clarity",
        description: "How easy it is to understand the message",
    },
    MetricDefinition {
        id: "conciseness",
        label: "Conciseness",
        description: "How directly the message gets to the point",
    },
    MetricDefinition {
        id: "formality",
        label: "Formality",
        description: "How formal the tone and register are",
    },
    MetricDefinition {
        id: "engagement",
        label: "Engagement",
        description: "How well the message holds the reader's attention",
    },
    MetricDefinition {
        id: "complexity",
        label: "Complexity",
        description: "How demanding the vocabulary and sentence structure are",
    },
];

const IMPACT_METRICS: [MetricDefinition; 5] = [
    MetricDefinition {
        id: "empathy",
        label: "Empathy",
        description: "How well the message relates to the reader's situation",
    },
    MetricDefinition {
        id: "authority",
        label: "Authority",
        description: "How confident and knowledgeable the author appears",
    },
    MetricDefinition {
        id: "persuasiveness",
        label: "Persuasiveness",
        description: "How likely the message is to change someone's mind",
    },
    MetricDefinition {
        id: "approachability",
        label: "Approachability",
        description: "The level of friendliness and openness",
    },
    MetricDefinition {
        id: "confidence",
        label: "Confidence",
        description: "How assured the author comes across",
    },
];

const OUTCOME_METRICS: [MetricDefinition; 5] = [
    MetricDefinition {
        id: "effectiveness",
        label: "Effectiveness",
        description: "How well the message achieves its intended purpose",
    },
    MetricDefinition {
        id: "actionability",
        label: "Actionability",
        description: "How clear the next steps are to the reader",
    },
    MetricDefinition {
        id: "memorability",
        label: "Memorability",
        description: "How likely the message is to be remembered",
    },
    MetricDefinition {
        id: "influence",
        label: "Influence",
        description: "The degree of impact on the reader's future decisions",
    },
    MetricDefinition {
        id: "audience_fit",
        label: "Audience fit",
        description: "How well the message suits its intended readers",
    },
];

/// The dimension of text being evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisCategory {
    /// Clarity and tone
    Style,
    /// Connection and influence on the reader
    Impact,
    /// Expected results of the message
    #[serde(alias = "result")]
    Outcome,
}

impl AnalysisCategory {
    /// Category whose template is used when a requested name is not recognized
    pub const DEFAULT: AnalysisCategory = AnalysisCategory::Style;

    /// Every category in display order
    pub const ALL: [AnalysisCategory; 3] = [
        AnalysisCategory::Style,
        AnalysisCategory::Impact,
        AnalysisCategory::Outcome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisCategory::Style => "style",
            AnalysisCategory::Impact => "impact",
            AnalysisCategory::Outcome => "outcome",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AnalysisCategory::Style => "Style (Clarity and Tone)",
            AnalysisCategory::Impact => "Impact (Connection and Influence)",
            AnalysisCategory::Outcome => "Outcome (Outcome and Action)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalysisCategory::Style => "How your message is composed and presented",
            AnalysisCategory::Impact => "How your message affects the reader",
            AnalysisCategory::Outcome => "The expected results of your message",
        }
    }

    /// Metric definitions the result for this category must contain
    pub fn metrics(&self) -> &'static [MetricDefinition] {
        match self {
            AnalysisCategory::Style => &STYLE_METRICS,
            AnalysisCategory::Impact => &IMPACT_METRICS,
            AnalysisCategory::Outcome => &OUTCOME_METRICS,
        }
    }

    /// Metric ids in catalogue order
    pub fn metric_names(&self) -> impl Iterator<Item = &'static str> {
        self.metrics().iter().map(|m| m.id)
    }
}

impl fmt::Display for AnalysisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown analysis category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for AnalysisCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "style" => Ok(AnalysisCategory::Style),
            "impact" => Ok(AnalysisCategory::Impact),
            "outcome" | "result" => Ok(AnalysisCategory::Outcome),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}
