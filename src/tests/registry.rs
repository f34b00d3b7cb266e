// Unit Tests for the Provider Registry
//
// UNIT UNDER TEST: ProviderRegistry, ProviderKind
//
// BUSINESS RESPONSIBILITY:
//   - Owns the provider table and the pointer to the active provider
//   - Switches providers at runtime without touching in-flight calls
//   - Builds the supported providers from configuration
//
// TEST COVERAGE:
//   - Unknown switch returns false and leaves the active provider unchanged
//   - Valid switch takes effect immediately and applies model options
//   - Construction errors for empty, duplicate and unknown-default tables
//   - Building from AnalysisConfig
//   - Name matching ignores case and surrounding whitespace everywhere

use crate::config::{AnalysisConfig, OpenAIConfig};
use crate::error::AnalysisError;
use crate::prompts::TemplateRegistry;
use crate::providers::{AnalysisProvider, MockAnalysisProvider};
use crate::registry::{ProviderKind, ProviderOptions, ProviderRegistry};
use crate::tests::helpers::{registry_of, StubProvider};
use std::sync::Arc;

#[cfg(test)]
mod provider_switch_tests {
    use super::*;

    #[test]
    fn test_unknown_provider_returns_false_and_keeps_active() {
        // Arrange
        let registry = registry_of(vec![
            Arc::new(StubProvider::new("openai")),
            Arc::new(StubProvider::new("anthropic")),
        ]);

        // Act
        let switched = registry.set_provider("mistral", None);

        // Assert
        assert!(!switched);
        assert_eq!(registry.active_provider().name(), "openai");
    }

    #[test]
    fn test_try_set_provider_reports_unknown_name() {
        // Arrange
        let registry = registry_of(vec![Arc::new(StubProvider::new("openai"))]);

        // Act
        let result = registry.try_set_provider("mistral", None);

        // Assert
        assert!(matches!(
            result,
            Err(AnalysisError::UnknownProvider { ref provider }) if provider == "mistral"
        ));
    }

    #[test]
    fn test_valid_switch_takes_effect_immediately() {
        // Arrange
        let registry = registry_of(vec![
            Arc::new(StubProvider::new("openai")),
            Arc::new(StubProvider::new("anthropic")),
        ]);

        // Act
        let switched = registry.set_provider("Anthropic", None);

        // Assert
        assert!(switched);
        assert_eq!(registry.active_provider().name(), "anthropic");
    }

    #[test]
    fn test_switch_applies_model_option() {
        // Arrange
        let anthropic = Arc::new(StubProvider::new("anthropic"));
        let registry = registry_of(vec![
            Arc::new(StubProvider::new("openai")),
            Arc::clone(&anthropic),
        ]);

        // Act
        let switched = registry.set_provider(
            "anthropic",
            Some(ProviderOptions::with_model("claude-3-5-haiku-20241022")),
        );

        // Assert
        assert!(switched);
        assert_eq!(anthropic.model(), "claude-3-5-haiku-20241022");
        assert_eq!(registry.active_provider().model(), "claude-3-5-haiku-20241022");
    }

    #[test]
    fn test_switch_without_model_keeps_current_model() {
        // Arrange
        let mut mock = MockAnalysisProvider::new();
        mock.expect_name().return_const("anthropic");
        mock.expect_set_model().never();
        mock.expect_model().return_const("claude-3-5-sonnet-20241022".to_string());
        let providers: Vec<Arc<dyn AnalysisProvider>> =
            vec![Arc::new(StubProvider::new("openai")), Arc::new(mock)];
        let registry = ProviderRegistry::new(providers, "openai").unwrap();

        // Act
        let switched = registry.set_provider("anthropic", Some(ProviderOptions::default()));

        // Assert
        assert!(switched);
        assert_eq!(registry.active_provider().model(), "claude-3-5-sonnet-20241022");
    }

    #[test]
    fn test_lookup_by_name_ignores_active_provider() {
        // Arrange
        let registry = registry_of(vec![
            Arc::new(StubProvider::new("openai")),
            Arc::new(StubProvider::new("anthropic")),
        ]);

        // Act & Assert
        assert_eq!(
            registry.provider("anthropic").map(|p| p.name()),
            Some("anthropic")
        );
        assert!(registry.provider("mistral").is_none());
        assert_eq!(registry.provider_names(), vec!["openai", "anthropic"]);
    }
}

#[cfg(test)]
mod registry_construction_tests {
    use super::*;

    #[test]
    fn test_empty_table_is_rejected() {
        let result = ProviderRegistry::new(Vec::new(), "openai");
        assert!(matches!(
            result,
            Err(AnalysisError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        // Arrange
        let providers: Vec<Arc<dyn AnalysisProvider>> = vec![
            Arc::new(StubProvider::new("openai")),
            Arc::new(StubProvider::new("openai")),
        ];

        // Act
        let result = ProviderRegistry::new(providers, "openai");

        // Assert
        assert!(matches!(
            result,
            Err(AnalysisError::ConfigurationError { ref message }) if message.contains("Duplicate")
        ));
    }

    #[test]
    fn test_unknown_default_is_rejected() {
        // Arrange
        let providers: Vec<Arc<dyn AnalysisProvider>> =
            vec![Arc::new(StubProvider::new("openai"))];

        // Act
        let result = ProviderRegistry::new(providers, "anthropic");

        // Assert
        assert!(matches!(
            result,
            Err(AnalysisError::UnknownProvider { .. })
        ));
    }

    #[tokio::test]
    async fn test_from_config_builds_every_supported_provider() {
        // Arrange
        let config = AnalysisConfig {
            default_provider: "edge-function".to_string(),
            openai: OpenAIConfig {
                api_key: Some("sk-test".to_string()),
                ..OpenAIConfig::default()
            },
            ..AnalysisConfig::default()
        };
        let templates = Arc::new(TemplateRegistry::new());

        // Act
        let registry = ProviderRegistry::from_config(&config, templates).unwrap();

        // Assert
        assert_eq!(
            registry.provider_names(),
            vec!["openai", "anthropic", "edge-function"]
        );
        assert_eq!(registry.active_provider().name(), "edge-function");
        assert!(registry.provider("openai").unwrap().is_available().await);
        assert!(!registry.provider("anthropic").unwrap().is_available().await);
        assert!(!registry.active_provider().is_available().await);
    }

    #[test]
    fn test_padded_names_resolve_in_config_and_registry() {
        // Test verifies config validation and registry lookup accept the same names

        // Arrange
        let config = AnalysisConfig {
            default_provider: " OpenAI ".to_string(),
            openai: OpenAIConfig {
                api_key: Some("sk-test".to_string()),
                ..OpenAIConfig::default()
            },
            ..AnalysisConfig::default()
        };
        let templates = Arc::new(TemplateRegistry::new());

        // Act
        let validated = config.validate();
        let registry = ProviderRegistry::from_config(&config, templates).unwrap();
        let switched = registry.set_provider("  ANTHROPIC", None);

        // Assert
        assert!(validated.is_ok());
        assert!(switched);
        assert_eq!(registry.active_provider().name(), "anthropic");
        assert!(registry.provider("Edge-Function ").is_some());
    }

    #[test]
    fn test_provider_kind_from_name() {
        assert_eq!(ProviderKind::from_name("OpenAI"), Some(ProviderKind::OpenAI));
        assert_eq!(
            ProviderKind::from_name(" edge-function "),
            Some(ProviderKind::EdgeFunction)
        );
        assert_eq!(ProviderKind::from_name("ollama"), None);
        assert_eq!(ProviderKind::Anthropic.name(), "anthropic");
    }

    #[test]
    fn test_new_providers_start_on_configured_model() {
        // Arrange
        let config = AnalysisConfig {
            openai: OpenAIConfig {
                api_key: Some("sk-test".to_string()),
                default_model: "gpt-4o".to_string(),
                ..OpenAIConfig::default()
            },
            ..AnalysisConfig::default()
        };

        // Act
        let provider = ProviderKind::OpenAI
            .build(&config, Arc::new(TemplateRegistry::new()))
            .unwrap();

        // Assert
        assert_eq!(provider.model(), "gpt-4o");
    }
}
