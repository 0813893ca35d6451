//! Error types for the sanitization engine.

use serde::Serialize;
use thiserror::Error;

/// Boxed error returned by caller-supplied custom sanitizers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failure raised while walking a target.
///
/// Every variant is attributed to the field-path of the node that failed.
/// Depending on [`SanitizeConfig::throw_on_error`](crate::SanitizeConfig::throw_on_error)
/// the error is either handed to the `on_error` observer (and the node is
/// passed through unchanged) or returned from the top-level entry point.
#[derive(Debug, Error)]
pub enum SanitizeError {
    /// Traversal would have recursed past the configured `max_depth`.
    #[error("maximum depth of {max_depth} exceeded at `{path}`")]
    DepthExceeded {
        /// Field-path of the object that could not be entered.
        path: String,
        /// The configured depth bound.
        max_depth: usize,
    },

    /// A field-level custom sanitizer returned an error.
    #[error("custom sanitizer failed at `{path}`: {source}")]
    Custom {
        /// Field-path the custom sanitizer was applied to.
        path: String,
        /// The failure returned by the custom function.
        #[source]
        source: BoxError,
    },
}

impl SanitizeError {
    /// Field-path the failure is attributed to.
    pub fn path(&self) -> &str {
        match self {
            Self::DepthExceeded { path, .. } | Self::Custom { path, .. } => path,
        }
    }

    /// Stable machine-readable code for the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DepthExceeded { .. } => "depth_exceeded",
            Self::Custom { .. } => "custom_sanitizer",
        }
    }

    /// Convert into the normalized, serializable error object.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code().to_string(),
            message: self.to_string(),
            path: self.path().to_string(),
        }
    }
}

/// Normalized error object suitable for logging or API responses.
///
/// ```json
/// { "code": "depth_exceeded", "message": "maximum depth of 10 exceeded at `a.b`", "path": "a.b" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Failure kind (see [`SanitizeError::code`]).
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Field-path the failure is attributed to.
    pub path: String,
}

/// Invalid configuration detected by [`SanitizeConfig::validate`](crate::SanitizeConfig::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `custom` is only meaningful on a field rule that carries a function.
    #[error("the global default mode cannot be `custom`")]
    CustomDefaultMode,

    /// A field rule selects `custom` but no function was attached.
    #[error("field rule `{path}` uses custom mode without a custom sanitizer")]
    MissingCustomFunction {
        /// The field-path of the offending rule.
        path: String,
    },
}

/// Result type alias for sanitization.
pub type Result<T> = std::result::Result<T, SanitizeError>;
