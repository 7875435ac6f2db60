//! Error types for the analysis engine.

use thiserror::Error;

/// Errors raised by the analysis engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The input buffer cannot be analyzed (empty, non-finite, or malformed).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested analysis configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
