//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the citation extraction engine. Only the
//! two genuinely fatal conditions in the pipeline — a cleaner function that
//! panics/throws, or a pattern that fails to compile at library-build time —
//! surface as `Err`. Everything else (unresolved short-forms, skipped
//! patterns, malformed parentheticals) accumulates as a `Warning` on the
//! citation or resolution result instead.
//!
//! ## Usage
//! ```rust
//! use citation_extractor::errors::{Result, CitationError};
//!
//! fn compile_pattern(src: &str) -> Result<regex::Regex> {
//!     regex::Regex::new(src).map_err(|e| CitationError::PatternCompilation {
//!         pattern_id: "example".to_string(),
//!         details: e.to_string(),
//!     })
//! }
//! ```

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, CitationError>;

/// Error types for the citation extraction engine.
#[derive(Debug, Error)]
pub enum CitationError {
    /// A cleaner function failed; no partial cleaning is returned.
    #[error("cleaner '{cleaner}' failed: {details}")]
    CleanerFailed { cleaner: String, details: String },

    /// A pattern failed to compile at library-build time.
    #[error("pattern '{pattern_id}' failed to compile: {details}")]
    PatternCompilation {
        pattern_id: String,
        details: String,
    },

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Input exceeded a hard size or structural limit.
    #[error("input rejected: {reason}")]
    InputRejected { reason: String },

    /// Internal invariant violation (should not occur on well-formed input).
    #[error("internal error: {message}")]
    Internal { message: String },

    /// Serialization/deserialization failure.
    #[error("serialization failed: {message}")]
    SerializationFailed { message: String },

    /// I/O error from config or CLI file handling.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CitationError {
    /// Whether the operation that produced this error could plausibly
    /// succeed if retried unchanged (fatal errors here are deterministic,
    /// so this is always `false` — kept for symmetry with categories that
    /// downstream callers may want to branch on).
    pub fn is_recoverable(&self) -> bool {
        false
    }

    /// Category tag for structured logging and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            CitationError::CleanerFailed { .. } => "cleaning",
            CitationError::PatternCompilation { .. } => "patterns",
            CitationError::Config { .. } => "configuration",
            CitationError::InputRejected { .. } => "input",
            CitationError::Internal { .. } => "internal",
            CitationError::SerializationFailed { .. } => "serialization",
            CitationError::Io(_) => "io",
        }
    }

    /// A short, actionable hint for the CLI/log consumer. Not a substitute
    /// for the `Display` message — this names the next step, not the cause.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CitationError::CleanerFailed { .. } => "check the custom cleaner for panics or unhandled input",
            CitationError::PatternCompilation { .. } => "fix the pattern's regex syntax and rerun --rebuild-patterns",
            CitationError::Config { .. } => "check the config file's syntax and field types against AppConfig",
            CitationError::InputRejected { .. } => "reduce the input size or split it into smaller documents",
            CitationError::Internal { .. } => "this indicates a bug; please report it with the input that triggered it",
            CitationError::SerializationFailed { .. } => "check that the data matches the expected schema",
            CitationError::Io(_) => "check the file path and permissions",
        }
    }
}

impl From<serde_json::Error> for CitationError {
    fn from(err: serde_json::Error) -> Self {
        CitationError::SerializationFailed {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<toml::de::Error> for CitationError {
    fn from(err: toml::de::Error) -> Self {
        CitationError::Config {
            message: format!("TOML parse error: {}", err),
        }
    }
}

/// Severity of a non-fatal [`Warning`](crate::Warning) attached to a
/// citation or resolution result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Error,
    Warning,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_stable() {
        assert_eq!(
            CitationError::Internal {
                message: "x".into()
            }
            .category(),
            "internal"
        );
        assert_eq!(
            CitationError::PatternCompilation {
                pattern_id: "p".into(),
                details: "d".into()
            }
            .category(),
            "patterns"
        );
    }

    #[test]
    fn errors_are_never_recoverable() {
        assert!(!CitationError::Internal {
            message: "x".into()
        }
        .is_recoverable());
    }

    #[test]
    fn recovery_suggestions_are_non_empty() {
        let err = CitationError::Config {
            message: "bad field".into(),
        };
        assert!(!err.recovery_suggestion().is_empty());
    }
}
