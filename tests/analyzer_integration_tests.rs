//! Integration Tests for the Analysis Facade
//!
//! UNIT UNDER TEST: TextAnalyzer over real providers built from AnalysisConfig
//!
//! BUSINESS RESPONSIBILITY:
//!   - Route each request to the active provider
//!   - Switch providers and models at runtime
//!   - Refuse to call providers without credentials
//!
//! TEST COVERAGE:
//!   - Default provider handles the request end to end
//!   - Switching to another provider with a model option
//!   - Provider without credentials reports unavailable and sends nothing
//!   - Provider failures are wrapped with their root cause
//!   - Results are recorded in a store

mod common;

use common::*;
use emotibot_analysis::{
    AnalysisCategory, AnalysisConfig, AnalysisError, InMemoryResultStore, ProviderOptions,
    ResultStore, TextAnalyzer, TransportFailure,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AnalysisConfig {
    AnalysisConfig {
        default_provider: "openai".to_string(),
        openai: openai_config(server.uri()),
        anthropic: anthropic_config(server.uri()),
        edge_function: edge_function_config(server.uri()),
        request_timeout: Some(std::time::Duration::from_secs(5)),
    }
}

#[tokio::test]
async fn test_default_provider_analyzes_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(openai_completion(PARTIAL_STYLE_REPLY)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let analyzer = TextAnalyzer::from_config(&config_for(&mock_server)).unwrap();

    let result = analyzer
        .analyze(GREETING, AnalysisCategory::Style)
        .await
        .unwrap();

    assert_eq!(result.score("clarity"), Some(90.0));
    assert_eq!(result.metrics.len(), 5);
}

#[tokio::test]
async fn test_switch_to_anthropic_with_model() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({"model": "claude-3-5-haiku-20241022"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(anthropic_message(PARTIAL_STYLE_REPLY)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_completion("{}")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let analyzer = TextAnalyzer::from_config(&config_for(&mock_server)).unwrap();
    let switched = analyzer.registry().set_provider(
        "anthropic",
        Some(ProviderOptions::with_model("claude-3-5-haiku-20241022")),
    );

    let result = analyzer
        .analyze(GREETING, AnalysisCategory::Style)
        .await
        .unwrap();

    assert!(switched);
    assert_eq!(analyzer.registry().active_provider().name(), "anthropic");
    assert_eq!(result.summary, "Clear and friendly.");
}

#[tokio::test]
async fn test_unknown_switch_keeps_routing_to_current_provider() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_completion("{}")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let analyzer = TextAnalyzer::from_config(&config_for(&mock_server)).unwrap();

    assert!(!analyzer.registry().set_provider("mistral", None));
    let result = analyzer.analyze(GREETING, AnalysisCategory::Impact).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_provider_without_credentials_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(anthropic_message("{}")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.anthropic.api_key = None;
    let analyzer = TextAnalyzer::from_config(&config).unwrap();
    assert!(analyzer.registry().set_provider("anthropic", None));

    let err = analyzer
        .analyze(GREETING, AnalysisCategory::Style)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::ProviderUnavailable { ref provider } if provider == "anthropic"
    ));
}

#[tokio::test]
async fn test_provider_failure_is_wrapped_with_cause() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/analyze-text"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "Failed to analyze text"
        })))
        .mount(&mock_server)
        .await;

    let analyzer = TextAnalyzer::from_config(&config_for(&mock_server)).unwrap();
    analyzer.registry().set_provider("edge-function", None);

    let err = analyzer
        .analyze(GREETING, AnalysisCategory::Outcome)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AnalysisError::AnalysisFailed { ref provider, .. } if provider == "edge-function"
    ));
    assert!(matches!(
        err.cause(),
        AnalysisError::TransportError {
            reason: TransportFailure::ErrorPayload,
            ..
        }
    ));
}

#[tokio::test]
async fn test_analyze_and_record_stores_result() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(openai_completion(PARTIAL_STYLE_REPLY)),
        )
        .mount(&mock_server)
        .await;

    let analyzer = TextAnalyzer::from_config(&config_for(&mock_server)).unwrap();
    let store = InMemoryResultStore::new();

    let record = analyzer
        .analyze_and_record(GREETING, AnalysisCategory::Style, &store)
        .await
        .unwrap();

    let history = store.list(Some(AnalysisCategory::Style)).await.unwrap();
    assert_eq!(history, vec![record.clone()]);
    assert_eq!(record.provider, "openai");
    assert_eq!(record.result.score("clarity"), Some(90.0));
}
