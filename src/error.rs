//! Error types for text analysis operations.
//!
//! Every failure the analysis core can surface is a variant of
//! [`AnalysisError`]. Errors carry enough context for routing (category),
//! alerting (severity) and user display ([`AnalysisError::user_message`]).
//!
//! # Error Handling Example
//!
//! ```rust,no_run
//! use emotibot_analysis::{AnalysisError, error::ErrorCategory};
//!
//! fn handle_error(err: AnalysisError) {
//!     // The facade wraps provider failures; look at the root cause
//!     match err.cause() {
//!         AnalysisError::TransportError { .. } => println!("Network trouble"),
//!         AnalysisError::MalformedResponse { .. } => println!("Model misbehaved"),
//!         _ => {}
//!     }
//!
//!     if matches!(err.category(), ErrorCategory::Client) {
//!         println!("Fix the request: {}", err.user_message());
//!     }
//! }
//! ```

use crate::logging::{log_error, log_warn};
use thiserror::Error;

// ============================================================================
// Error categorization types
// ============================================================================

/// High-level categorization of errors for routing and handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The remote provider or network had an issue.
    External,

    /// The caller made a mistake that they can fix (unknown provider,
    /// blank input, missing credentials).
    Client,

    /// Temporary failures such as rate limiting.
    Transient,
}

/// Severity level for logging and alerting decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Action failed but system is stable.
    Error,

    /// Unexpected but recoverable situation.
    Warning,

    /// Expected failure (e.g., validation error).
    Info,
}

/// Why a call to a remote completion endpoint was rejected or never completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// Connection refused, DNS failure, timeout imposed by the HTTP client.
    Network,
    /// The endpoint rejected our credentials (401/403).
    Authentication,
    /// The endpoint is throttling us (429).
    RateLimited {
        /// Value of the `retry-after` header, 60 when absent.
        retry_after_seconds: u64,
    },
    /// Any other non-success HTTP status.
    Status(u16),
    /// A success status whose body reported an error.
    ErrorPayload,
}

impl std::fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportFailure::Network => write!(f, "network"),
            TransportFailure::Authentication => write!(f, "authentication"),
            TransportFailure::RateLimited {
                retry_after_seconds,
            } => write!(f, "rate limited (retry after {retry_after_seconds}s)"),
            TransportFailure::Status(status) => write!(f, "status {status}"),
            TransportFailure::ErrorPayload => write!(f, "error payload"),
        }
    }
}

// ============================================================================
// Analysis error types
// ============================================================================

/// Convenient result type for analysis operations.
pub type AnalysisOutcome<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while analysing text.
///
/// Use the constructor methods, which log the error at the appropriate level
/// with structured fields:
///
/// ```rust
/// use emotibot_analysis::AnalysisError;
///
/// let err = AnalysisError::unknown_provider("mistral");
/// assert!(!err.is_retryable());
/// ```
///
/// | Variant | Category | Retryable |
/// |---------|----------|-----------|
/// | `ProviderUnavailable` | External | Yes |
/// | `TransportError` | External / Transient | Network, rate limit, 5xx |
/// | `MalformedResponse` | External | No |
/// | `UnknownProvider` | Client | No |
/// | `InvalidInput` | Client | No |
/// | `ConfigurationError` | Client | No |
/// | `StorageFailed` | External | No |
/// | `AnalysisFailed` | of the cause | of the cause |
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The active provider's availability check returned false.
    ///
    /// The request was never dispatched.
    #[error("AI provider {provider} is not available")]
    ProviderUnavailable {
        /// Name of the provider that reported itself unavailable.
        provider: String,
    },

    /// The remote endpoint was unreachable, rejected the call, or returned
    /// an error payload.
    #[error("Transport error from {provider} ({reason}): {message}")]
    TransportError {
        /// Provider that issued the call.
        provider: String,
        /// Classified failure reason.
        reason: TransportFailure,
        /// Description of the failure.
        message: String,
        /// The underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The remote reply could not be parsed into the expected structure.
    ///
    /// `raw_content` is kept for diagnostics only. It is not part of the
    /// `Display` output nor of [`AnalysisError::user_message`].
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// Provider that produced the reply.
        provider: String,
        /// What was wrong with the reply.
        message: String,
        /// The raw reply text.
        raw_content: String,
    },

    /// A switch request named a provider that is not in the provider table.
    #[error("Provider {provider} not available")]
    UnknownProvider {
        /// The provider name that was requested.
        provider: String,
    },

    /// The text submitted for analysis was rejected before dispatch.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Why the input was rejected.
        message: String,
    },

    /// Provider configuration is invalid or incomplete.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },

    /// The external result store rejected a read or write.
    #[error("Result storage failed: {message}")]
    StorageFailed {
        /// Description of the failure.
        message: String,
    },

    /// The active provider's analyze call failed.
    #[error("Analysis with {provider} failed: {source}")]
    AnalysisFailed {
        /// Provider the request was dispatched to.
        provider: String,
        /// The underlying provider error.
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Root cause of this error, looking through `AnalysisFailed` wrappers.
    pub fn cause(&self) -> &AnalysisError {
        match self {
            Self::AnalysisFailed { source, .. } => source.cause(),
            other => other,
        }
    }

    /// Get the error category for routing and handling decisions.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProviderUnavailable { .. } => ErrorCategory::External,
            Self::TransportError {
                reason: TransportFailure::RateLimited { .. },
                ..
            } => ErrorCategory::Transient,
            Self::TransportError {
                reason: TransportFailure::Authentication,
                ..
            } => ErrorCategory::Client,
            Self::TransportError { .. } => ErrorCategory::External,
            Self::MalformedResponse { .. } => ErrorCategory::External,
            Self::UnknownProvider { .. } => ErrorCategory::Client,
            Self::InvalidInput { .. } => ErrorCategory::Client,
            Self::ConfigurationError { .. } => ErrorCategory::Client,
            Self::StorageFailed { .. } => ErrorCategory::External,
            Self::AnalysisFailed { source, .. } => source.category(),
        }
    }

    /// Get the error severity for logging and alerting.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ProviderUnavailable { .. } => ErrorSeverity::Warning,
            Self::TransportError {
                reason: TransportFailure::RateLimited { .. },
                ..
            } => ErrorSeverity::Warning,
            Self::TransportError { .. } => ErrorSeverity::Error,
            Self::MalformedResponse { .. } => ErrorSeverity::Warning,
            Self::UnknownProvider { .. } => ErrorSeverity::Warning,
            Self::InvalidInput { .. } => ErrorSeverity::Info,
            Self::ConfigurationError { .. } => ErrorSeverity::Error,
            Self::StorageFailed { .. } => ErrorSeverity::Error,
            Self::AnalysisFailed { source, .. } => source.severity(),
        }
    }

    /// Whether the caller may reasonably try the same request again.
    ///
    /// The core itself never retries; this is advice for the UI layer.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ProviderUnavailable { .. } => true,
            Self::TransportError { reason, .. } => match reason {
                TransportFailure::Network | TransportFailure::RateLimited { .. } => true,
                TransportFailure::Status(status) => *status >= 500,
                TransportFailure::Authentication | TransportFailure::ErrorPayload => false,
            },
            Self::AnalysisFailed { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Convert to a user-friendly message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::ProviderUnavailable { .. } => {
                "The analysis service is not available right now. Please try again later"
                    .to_string()
            }
            Self::TransportError { reason, .. } => match reason {
                TransportFailure::Authentication => {
                    "The analysis service rejected our credentials".to_string()
                }
                TransportFailure::RateLimited {
                    retry_after_seconds,
                } => format!(
                    "The analysis service is busy. Please wait {retry_after_seconds} seconds and try again"
                ),
                _ => "Unable to reach the analysis service. Please try again".to_string(),
            },
            Self::MalformedResponse { .. } => {
                "The analysis service returned an unreadable result".to_string()
            }
            Self::UnknownProvider { .. } => {
                "The requested AI provider is not supported".to_string()
            }
            Self::InvalidInput { message } => message.clone(),
            Self::ConfigurationError { .. } => {
                "Analysis service configuration issue. Please check your settings".to_string()
            }
            Self::StorageFailed { .. } => {
                "Your result could not be saved. Please try again".to_string()
            }
            Self::AnalysisFailed { source, .. } => source.user_message(),
        }
    }

    // =========================================================================
    // Constructor methods with automatic logging
    // =========================================================================

    pub fn provider_unavailable(provider: impl Into<String>) -> Self {
        let provider = provider.into();
        log_warn!(
            provider = %provider,
            error_type = "provider_unavailable",
            "AI provider failed its availability check"
        );
        Self::ProviderUnavailable { provider }
    }

    pub fn transport_error(
        provider: impl Into<String>,
        reason: TransportFailure,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let provider = provider.into();
        let message = message.into();
        log_error!(
            provider = %provider,
            error_type = "transport_error",
            reason = %reason,
            message = %message,
            has_source = source.is_some(),
            "Remote completion call failed"
        );
        Self::TransportError {
            provider,
            reason,
            message,
            source,
        }
    }

    /// Create a malformed response error (logs the raw reply at WARN level).
    pub fn malformed_response(
        provider: impl Into<String>,
        message: impl Into<String>,
        raw_content: impl Into<String>,
    ) -> Self {
        let provider = provider.into();
        let message = message.into();
        let raw_content = raw_content.into();
        log_warn!(
            provider = %provider,
            error_type = "malformed_response",
            message = %message,
            raw_content = %raw_content,
            "Provider reply could not be parsed"
        );
        Self::MalformedResponse {
            provider,
            message,
            raw_content,
        }
    }

    pub fn unknown_provider(provider: impl Into<String>) -> Self {
        let provider = provider.into();
        log_error!(
            provider = %provider,
            error_type = "unknown_provider",
            "Provider not available"
        );
        Self::UnknownProvider { provider }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "invalid_input",
            message = %message,
            "Analysis input rejected"
        );
        Self::InvalidInput { message }
    }

    pub fn configuration_error(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "configuration_error",
            message = %message,
            "Analysis configuration validation failed"
        );
        Self::ConfigurationError { message }
    }

    pub fn storage_failed(message: impl Into<String>) -> Self {
        let message = message.into();
        log_error!(
            error_type = "storage_failed",
            message = %message,
            "Analysis result storage failed"
        );
        Self::StorageFailed { message }
    }

    pub fn analysis_failed(provider: impl Into<String>, source: AnalysisError) -> Self {
        let provider = provider.into();
        log_error!(
            provider = %provider,
            error_type = "analysis_failed",
            cause = %source,
            "Error analyzing text"
        );
        Self::AnalysisFailed {
            provider,
            source: Box::new(source),
        }
    }
}
