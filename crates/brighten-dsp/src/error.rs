//! Error types for the brightening engine.

use thiserror::Error;

/// Errors raised by the brightening engine.
///
/// All errors are returned at the point of detection, before any output
/// is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrightenError {
    /// The input buffer cannot be processed (empty, non-finite, or malformed).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The filter configuration cannot produce a valid design.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
