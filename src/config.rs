//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the citation extraction engine, supporting
//! multiple sources (TOML files, environment variables) with validation and
//! type-safe access. Mirrors `ExtractOptions`/`ResolutionOptions` in a
//! serializable shape so the CLI and other embedders can load a pipeline
//! configuration from disk instead of constructing it in code.
//!
//! ## Configuration sources (in order of precedence)
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values
//!
//! ## Usage
//! ```rust,no_run
//! use citation_extractor::config::AppConfig;
//!
//! let config = AppConfig::load().unwrap();
//! let options = config.build_extract_options().unwrap();
//! ```

use crate::cleaner::CleanerKind;
use crate::errors::{CitationError, Result};
use crate::patterns::PatternId;
use crate::reporter_db::StaticReporterDb;
use crate::{ExtractOptions, ResolutionOptions, ScopeStrategy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Top-level configuration for a pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub cleaning: CleaningConfig,
    pub patterns: PatternSelectionConfig,
    pub resolution: ResolutionConfig,
    pub reporter_db: ReporterDbConfig,
    pub logging: LoggingConfig,
}

/// Serializable stand-in for `CleanerKind` — the `Custom` variant carries a
/// closure and can only be configured in code, never from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanerName {
    StripHtmlTags,
    DecodeHtmlEntities,
    NormalizeWhitespace,
    NormalizeUnicode,
    FixSmartQuotes,
    NormalizeDashes,
    RemoveOcrArtifacts,
}

impl CleanerName {
    pub fn to_kind(self) -> CleanerKind {
        match self {
            CleanerName::StripHtmlTags => CleanerKind::StripHtmlTags,
            CleanerName::DecodeHtmlEntities => CleanerKind::DecodeHtmlEntities,
            CleanerName::NormalizeWhitespace => CleanerKind::NormalizeWhitespace,
            CleanerName::NormalizeUnicode => CleanerKind::NormalizeUnicode,
            CleanerName::FixSmartQuotes => CleanerKind::FixSmartQuotes,
            CleanerName::NormalizeDashes => CleanerKind::NormalizeDashes,
            CleanerName::RemoveOcrArtifacts => CleanerKind::RemoveOcrArtifacts,
        }
    }
}

/// The ordered cleaning pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    pub pipeline: Vec<CleanerName>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            pipeline: vec![
                CleanerName::StripHtmlTags,
                CleanerName::NormalizeWhitespace,
                CleanerName::NormalizeUnicode,
                CleanerName::FixSmartQuotes,
            ],
        }
    }
}

/// Which patterns the tokenizer sweeps. `None` runs the full catalogue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternSelectionConfig {
    pub enabled: Option<Vec<PatternId>>,
}

/// Mirrors [`ResolutionOptions`], substituting a regex source string for
/// the compiled `Regex` (which isn't serializable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionConfig {
    pub scope_strategy: ScopeStrategy,
    pub paragraph_boundary_pattern: String,
    pub party_match_threshold: f32,
    pub allow_nested_resolution: bool,
    pub report_unresolved: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        let defaults = ResolutionOptions::default();
        Self {
            scope_strategy: defaults.scope_strategy,
            paragraph_boundary_pattern: defaults.paragraph_boundary_pattern.as_str().to_string(),
            party_match_threshold: defaults.party_match_threshold,
            allow_nested_resolution: defaults.allow_nested_resolution,
            report_unresolved: defaults.report_unresolved,
        }
    }
}

impl ResolutionConfig {
    pub fn to_options(&self) -> Result<ResolutionOptions> {
        let pattern = regex::Regex::new(&self.paragraph_boundary_pattern).map_err(|e| CitationError::Config {
            message: format!("invalid resolution.paragraph_boundary_pattern: {}", e),
        })?;
        Ok(ResolutionOptions {
            scope_strategy: self.scope_strategy,
            paragraph_boundary_pattern: pattern,
            party_match_threshold: self.party_match_threshold,
            allow_nested_resolution: self.allow_nested_resolution,
            report_unresolved: self.report_unresolved,
        })
    }
}

/// Whether to inject the built-in [`StaticReporterDb`] for reporter
/// validation. Callers embedding the engine as a library supply their own
/// adapter in code instead of through this config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterDbConfig {
    pub enabled: bool,
}

impl Default for ReporterDbConfig {
    fn default() -> Self {
        Self { enabled: false }
    }
}

/// Logging configuration, consumed by `main.rs` to initialize
/// `tracing-subscriber`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cleaning: CleaningConfig::default(),
            patterns: PatternSelectionConfig::default(),
            resolution: ResolutionConfig::default(),
            reporter_db: ReporterDbConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads from `./citation-extractor.toml`, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::from_file("citation-extractor.toml")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if !path.exists() {
            tracing::warn!("configuration file not found: {:?}, using defaults", path);
            Self::default()
        } else {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("CITATION_EXTRACTOR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(json) = std::env::var("CITATION_EXTRACTOR_LOG_JSON") {
            self.logging.json_format = json.parse().map_err(|_| CitationError::Config {
                message: "invalid boolean in CITATION_EXTRACTOR_LOG_JSON".to_string(),
            })?;
        }
        if let Ok(threshold) = std::env::var("CITATION_EXTRACTOR_PARTY_MATCH_THRESHOLD") {
            self.resolution.party_match_threshold = threshold.parse().map_err(|_| CitationError::Config {
                message: "invalid float in CITATION_EXTRACTOR_PARTY_MATCH_THRESHOLD".to_string(),
            })?;
        }
        if let Ok(enabled) = std::env::var("CITATION_EXTRACTOR_REPORTER_DB") {
            self.reporter_db.enabled = enabled.parse().map_err(|_| CitationError::Config {
                message: "invalid boolean in CITATION_EXTRACTOR_REPORTER_DB".to_string(),
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.cleaning.pipeline.is_empty() {
            return Err(CitationError::Config {
                message: "cleaning.pipeline must not be empty".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.resolution.party_match_threshold) {
            return Err(CitationError::Config {
                message: "resolution.party_match_threshold must be between 0.0 and 1.0".to_string(),
            });
        }
        regex::Regex::new(&self.resolution.paragraph_boundary_pattern).map_err(|e| CitationError::Config {
            message: format!("invalid resolution.paragraph_boundary_pattern: {}", e),
        })?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CitationError::Config {
            message: format!("failed to serialize config to TOML: {}", e),
        })
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Builds the `ExtractOptions` this configuration describes. Does not
    /// set `resolve` — callers opt into resolution explicitly.
    pub fn build_extract_options(&self) -> Result<ExtractOptions> {
        let cleaners = self.cleaning.pipeline.iter().map(|c| c.to_kind()).collect();
        let reporter_db = if self.reporter_db.enabled {
            Some(Arc::new(StaticReporterDb::new()) as Arc<dyn crate::reporter_db::ReporterDb>)
        } else {
            None
        };
        Ok(ExtractOptions {
            cleaners: Some(cleaners),
            patterns: self.patterns.enabled.clone(),
            resolve: false,
            resolution_options: self.resolution.to_options()?,
            validate: self.reporter_db.enabled,
            reporter_db,
        })
    }
}
