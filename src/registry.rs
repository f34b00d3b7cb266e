//! Provider registry and selector
//!
//! The registry owns a fixed table of constructed providers and a pointer to
//! the active one. It is an ordinary value: build one per process (or per
//! test) and share it behind an `Arc`.

use crate::config::{
    normalize_provider_name, AnalysisConfig, ANTHROPIC_PROVIDER, EDGE_FUNCTION_PROVIDER,
    OPENAI_PROVIDER,
};
use crate::error::{AnalysisError, AnalysisOutcome};
use crate::logging::{log_debug, log_info};
use crate::prompts::TemplateRegistry;
use crate::providers::{AnalysisProvider, AnthropicProvider, EdgeFunctionProvider, OpenAIProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};

/// Provider-specific options applied on a switch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOptions {
    /// Model to select on the provider being activated
    pub model: Option<String>,
}

impl ProviderOptions {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
        }
    }
}

/// The concrete provider variants this crate can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAI,
    Anthropic,
    EdgeFunction,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::OpenAI,
        ProviderKind::Anthropic,
        ProviderKind::EdgeFunction,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => OPENAI_PROVIDER,
            ProviderKind::Anthropic => ANTHROPIC_PROVIDER,
            ProviderKind::EdgeFunction => EDGE_FUNCTION_PROVIDER,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = normalize_provider_name(name);
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Construct this variant from its section of `config`
    pub fn build(
        &self,
        config: &AnalysisConfig,
        templates: Arc<TemplateRegistry>,
    ) -> AnalysisOutcome<Arc<dyn AnalysisProvider>> {
        let timeout = config.request_timeout;
        let provider: Arc<dyn AnalysisProvider> = match self {
            ProviderKind::OpenAI => Arc::new(OpenAIProvider::new(
                config.openai.clone(),
                templates,
                timeout,
            )?),
            ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(
                config.anthropic.clone(),
                templates,
                timeout,
            )?),
            ProviderKind::EdgeFunction => Arc::new(EdgeFunctionProvider::new(
                config.edge_function.clone(),
                templates,
                timeout,
            )?),
        };
        Ok(provider)
    }
}

fn same_name(a: &str, b: &str) -> bool {
    normalize_provider_name(a) == normalize_provider_name(b)
}

/// Holds the provider table and the active provider
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn AnalysisProvider>>,
    active: RwLock<Arc<dyn AnalysisProvider>>,
}

impl ProviderRegistry {
    /// Build a registry over `providers`, activating `default_provider`
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ConfigurationError`] if the table is empty or
    /// has duplicate names, and [`AnalysisError::UnknownProvider`] if
    /// `default_provider` is not in it.
    pub fn new(
        providers: Vec<Arc<dyn AnalysisProvider>>,
        default_provider: &str,
    ) -> AnalysisOutcome<Self> {
        if providers.is_empty() {
            return Err(AnalysisError::configuration_error(
                "Provider registry needs at least one provider",
            ));
        }
        for (idx, provider) in providers.iter().enumerate() {
            if providers[..idx]
                .iter()
                .any(|other| same_name(other.name(), provider.name()))
            {
                return Err(AnalysisError::configuration_error(format!(
                    "Duplicate provider name: {}",
                    provider.name()
                )));
            }
        }

        let default = Self::lookup(&providers, default_provider)
            .ok_or_else(|| AnalysisError::unknown_provider(default_provider))?;

        log_debug!(
            providers = ?providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            default_provider = default.name(),
            "Provider registry created"
        );

        Ok(Self {
            active: RwLock::new(default),
            providers,
        })
    }

    /// Build every supported provider from `config`
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnknownProvider`] if `config.default_provider`
    /// is unsupported, or a [`AnalysisError::ConfigurationError`] if a
    /// provider cannot be constructed.
    pub fn from_config(
        config: &AnalysisConfig,
        templates: Arc<TemplateRegistry>,
    ) -> AnalysisOutcome<Self> {
        let default = ProviderKind::from_name(&config.default_provider)
            .ok_or_else(|| AnalysisError::unknown_provider(&config.default_provider))?;
        let providers = ProviderKind::ALL
            .iter()
            .map(|kind| kind.build(config, Arc::clone(&templates)))
            .collect::<AnalysisOutcome<Vec<_>>>()?;
        Self::new(providers, default.name())
    }

    fn lookup(
        providers: &[Arc<dyn AnalysisProvider>],
        name: &str,
    ) -> Option<Arc<dyn AnalysisProvider>> {
        providers.iter().find(|p| same_name(p.name(), name)).cloned()
    }

    /// Make `name` the active provider, applying `options`
    ///
    /// Returns `false` and leaves the active provider unchanged when `name`
    /// is not in the table.
    pub fn set_provider(&self, name: &str, options: Option<ProviderOptions>) -> bool {
        self.try_set_provider(name, options).is_ok()
    }

    /// Like [`set_provider`](Self::set_provider) but reports the failure
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnknownProvider`] for a name not in the table.
    pub fn try_set_provider(
        &self,
        name: &str,
        options: Option<ProviderOptions>,
    ) -> AnalysisOutcome<()> {
        let Some(provider) = Self::lookup(&self.providers, name) else {
            return Err(AnalysisError::unknown_provider(name));
        };

        if let Some(model) = options.and_then(|o| o.model) {
            provider.set_model(&model);
        }

        *self.active.write().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&provider);

        log_info!(
            provider = provider.name(),
            model = %provider.model(),
            "AI provider set"
        );
        Ok(())
    }

    /// The active provider
    ///
    /// Callers hold the returned `Arc` for the duration of a request, so a
    /// later switch never affects a call already dispatched.
    pub fn active_provider(&self) -> Arc<dyn AnalysisProvider> {
        Arc::clone(&self.active.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Provider by name, regardless of which one is active
    pub fn provider(&self, name: &str) -> Option<Arc<dyn AnalysisProvider>> {
        Self::lookup(&self.providers, name)
    }

    /// Names in the provider table, in registration order
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.provider_names())
            .field("active", &self.active_provider().name())
            .finish()
    }
}
