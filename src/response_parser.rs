//! Provider reply parsing and normalization
//!
//! The raw reply text is an untyped boundary. [`ResponseParser::parse_llm_output`]
//! turns it into a JSON object, and [`normalize`] converts that object into an
//! [`AnalysisResult`] holding every metric of the requested category. Untyped
//! values never leave this module.

use crate::category::AnalysisCategory;
use crate::error::{AnalysisError, AnalysisOutcome};
use crate::logging::{log_debug, log_warn};
use crate::result::{AnalysisResult, MAX_SCORE, MIN_SCORE};

use serde_json::{Map, Value};
use std::collections::BTreeMap;

const PREVIEW_CHARS: usize = 200;

/// Reply parser with fallback strategies
pub struct ResponseParser;

impl ResponseParser {
    /// Parse model output into a JSON object
    ///
    /// 1. Try direct JSON parse
    /// 2. Strip code fences and retry
    /// 3. Extract the first balanced `{...}` that parses, scanning mixed content
    ///
    /// Fails with `MalformedResponse` if no JSON object is found.
    pub fn parse_llm_output(provider: &str, raw: &str) -> AnalysisOutcome<Map<String, Value>> {
        log_debug!(
            provider = %provider,
            content_length = raw.len(),
            content_preview = %preview(raw),
            "Parsing provider reply"
        );

        if let Ok(value) = serde_json::from_str::<Value>(raw) {
            return Self::expect_object(provider, value, raw);
        }

        let cleaned = Self::strip_fences(raw);
        if cleaned != raw.trim() {
            if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
                log_debug!(provider = %provider, "Parsed reply after stripping code fences");
                return Self::expect_object(provider, value, raw);
            }
        }

        let mut search_from = 0;
        while let Some(offset) = cleaned[search_from..].find('{') {
            let start = search_from + offset;
            if let Some(candidate) = Self::balanced_object_at(&cleaned[start..]) {
                if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                    log_debug!(
                        provider = %provider,
                        extracted_length = candidate.len(),
                        "Parsed reply after extracting embedded object"
                    );
                    return Self::expect_object(provider, value, raw);
                }
            }
            search_from = start + 1;
        }

        Err(AnalysisError::malformed_response(
            provider,
            "Reply is not valid JSON",
            raw,
        ))
    }

    fn expect_object(
        provider: &str,
        value: Value,
        raw: &str,
    ) -> AnalysisOutcome<Map<String, Value>> {
        match value {
            Value::Object(map) => Ok(map),
            other => Err(AnalysisError::malformed_response(
                provider,
                format!("Reply must be a JSON object, got {}", json_type(&other)),
                raw,
            )),
        }
    }

    /// Content of a fenced block spanning the whole reply
    ///
    /// Only an opening fence (with optional language tag) at the start and a
    /// closing fence at the end are removed. Anything else is returned trimmed.
    fn strip_fences(content: &str) -> &str {
        let trimmed = content.trim();
        let Some(rest) = trimmed.strip_prefix("```") else {
            return trimmed;
        };
        let body = match rest.split_once('\n') {
            Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
            _ => rest,
        };
        body.strip_suffix("```").unwrap_or(body).trim()
    }

    /// Balanced JSON object at the start of `content`, which begins with `{`
    fn balanced_object_at(content: &str) -> Option<&str> {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, ch) in content.char_indices() {
            if in_string {
                match ch {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&content[..offset + ch.len_utf8()]);
                    }
                }
                _ => {}
            }
        }

        None
    }
}

/// Convert a parsed reply object into a complete [`AnalysisResult`]
///
/// - missing `metrics` is treated as an empty object
/// - each category metric keeps numeric values, coerces numeric strings,
///   and defaults to 0 otherwise; scores are clamped to `[0, 100]`
/// - metric keys outside the category are dropped
/// - `analysis` keeps string explanations for category metrics
/// - `summary` defaults to empty, `suggestions` keeps string items only
///
/// A `metrics` value that is present but not an object is malformed.
pub fn normalize(
    provider: &str,
    mut reply: Map<String, Value>,
    category: AnalysisCategory,
) -> AnalysisOutcome<AnalysisResult> {
    let raw_metrics = match reply.remove("metrics") {
        None | Some(Value::Null) => {
            log_debug!(provider = %provider, "Reply had no metrics object, defaulting all scores");
            Map::new()
        }
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(AnalysisError::malformed_response(
                provider,
                format!("\"metrics\" must be an object, got {}", json_type(&other)),
                format!("\"metrics\": {other}"),
            ));
        }
    };

    let mut metrics = BTreeMap::new();
    for name in category.metric_names() {
        let score = match raw_metrics.get(name) {
            Some(value) => coerce_score(provider, name, value),
            None => {
                log_debug!(provider = %provider, metric = name, "Metric missing, defaulting to 0");
                MIN_SCORE
            }
        };
        metrics.insert(name.to_string(), score);
    }

    let mut analysis = BTreeMap::new();
    if let Some(Value::Object(explanations)) = reply.get("analysis") {
        for name in category.metric_names() {
            if let Some(Value::String(text)) = explanations.get(name) {
                analysis.insert(name.to_string(), text.clone());
            }
        }
    }

    let summary = match reply.get("summary") {
        Some(Value::String(text)) => text.clone(),
        _ => String::new(),
    };

    let suggestions = match reply.get("suggestions") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(single)) => vec![single.clone()],
        _ => Vec::new(),
    };

    Ok(AnalysisResult {
        metrics,
        analysis,
        summary,
        suggestions,
    })
}

/// Parse then normalize in one step
pub fn parse_and_normalize(
    provider: &str,
    raw: &str,
    category: AnalysisCategory,
) -> AnalysisOutcome<AnalysisResult> {
    let reply = ResponseParser::parse_llm_output(provider, raw)?;
    normalize(provider, reply, category)
}

fn coerce_score(provider: &str, metric: &str, value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(score) if score.is_finite() => {
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                log_warn!(
                    provider = %provider,
                    metric,
                    score,
                    "Metric outside 0-100, clamping"
                );
            }
            score.clamp(MIN_SCORE, MAX_SCORE)
        }
        _ => {
            log_warn!(
                provider = %provider,
                metric,
                value = %value,
                "Metric is not numeric, defaulting to 0"
            );
            MIN_SCORE
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn preview(raw: &str) -> String {
    let mut out: String = raw.chars().take(PREVIEW_CHARS).collect();
    if raw.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}
