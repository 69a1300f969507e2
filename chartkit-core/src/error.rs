//! Error types for chartkit.
//!
//! A single `thiserror` hierarchy shared by all chartkit crates. Registration
//! errors are fail-fast: the registrar surfaces them to the host application's
//! bootstrap code instead of degrading partially.

use thiserror::Error;

/// Result type alias using `ChartError`.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Main error type for all chartkit operations.
#[derive(Debug, Error)]
pub enum ChartError {
    // ═══════════════════════════════════════════════════════════════════════════
    // REGISTRATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A middleware name has no entry in the middleware registry.
    #[error("unknown middleware '{name}' for chart '{chart}'")]
    UnknownMiddleware {
        /// The unresolved middleware name.
        name: String,
        /// The chart whose route referenced it.
        chart: String,
    },

    /// A derived chart name is empty or unusable as a path segment.
    #[error("invalid chart name: {0}")]
    InvalidChartName(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // REQUEST-TIME ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No chart is bound under the requested name.
    #[error("chart not found: {0}")]
    ChartNotFound(String),

    /// A chart failed to produce its payload.
    #[error("chart response failed: {0}")]
    ResponseError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION & SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ChartError {
    /// Returns true if this error should surface as HTTP 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChartError::ChartNotFound(_))
    }

    /// Returns true if this error can only occur while registering charts.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            ChartError::UnknownMiddleware { .. }
                | ChartError::InvalidChartName(_)
                | ChartError::ConfigError(_)
        )
    }
}
