//! # Legal Citation Extraction Engine
//!
//! ## Overview
//! Extracts, resolves, and annotates legal citations embedded in free-form
//! legal text (opinions, briefs, articles). For input text of arbitrary
//! size, returns a structured list of typed citations, each carrying
//! precise byte spans in the original input, parsed metadata (reporter,
//! volume, page, parties, year, court, pincite, parenthetical), and — when
//! requested — links from short-form references (`Id.`, `supra`, bare
//! volume-reporter-page) back to their antecedent full citations.
//!
//! ## Architecture
//! The pipeline is a strict sequence with no backward data flow:
//! `Clean → Tokenize → Detect Parallels → Extract Metadata → Resolve (optional) → Return`.
//!
//! - `cleaner`: position-preserving text normalization
//! - `patterns`: ReDoS-audited regex catalogue
//! - `tokenizer`: sweeps patterns over cleaned text into candidate tokens
//! - `parallel`: links comma-separated parallel case citations
//! - `extract`: per-kind metadata extractors plus the deduplicator
//! - `resolve`: document-scoped short-form resolution (Id./supra/short-form)
//! - `reporter_db`: optional read-only reporter validation adapter
//!
//! ## Usage
//! ```rust,no_run
//! use citation_extractor::{extract_citations, ExtractOptions};
//!
//! let text = "See Smith v. Doe, 500 F.2d 123 (9th Cir. 1974).";
//! let citations = extract_citations(text, &ExtractOptions::default()).unwrap();
//! println!("found {} citations", citations.len());
//! ```

pub mod cleaner;
pub mod config;
pub mod errors;
pub mod extract;
pub mod parallel;
pub mod patterns;
pub mod reporter_db;
pub mod resolve;
pub mod tokenizer;
pub mod utils;

pub use config::AppConfig;
pub use errors::{CitationError, Result, WarningLevel};

use serde::{Deserialize, Serialize};

/// A half-open byte interval paired between cleaned and original text.
///
/// Invariant: `clean_end > clean_start` and `original_end > original_start`.
/// Spans are immutable once emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub clean_start: usize,
    pub clean_end: usize,
    pub original_start: usize,
    pub original_end: usize,
}

impl Span {
    pub fn new(clean_start: usize, clean_end: usize, original_start: usize, original_end: usize) -> Self {
        Self {
            clean_start,
            clean_end,
            original_start,
            original_end,
        }
    }
}

/// A case citation's extended span: from the start of the case name to the
/// end of the closing parenthetical. Only present on case citations.
pub type FullSpan = Span;

/// A non-fatal diagnostic attached to a citation or resolution result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub level: WarningLevel,
    pub message: String,
    pub position: Option<usize>,
}

impl Warning {
    pub fn info(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            level: WarningLevel::Info,
            message: message.into(),
            position,
        }
    }

    pub fn warning(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            level: WarningLevel::Warning,
            message: message.into(),
            position,
        }
    }

    pub fn error(message: impl Into<String>, position: Option<usize>) -> Self {
        Self {
            level: WarningLevel::Error,
            message: message.into(),
            position,
        }
    }
}

/// A structured date extracted from a case citation's parenthetical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDate {
    pub iso: String,
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

/// A single `{volume, reporter, page}` member of a parallel citation group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelRef {
    pub volume: String,
    pub reporter: String,
    pub page: String,
}

/// Fields shared by every citation kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationCore {
    pub span: Span,
    pub matched_text: String,
    pub confidence: f32,
    pub warnings: Vec<Warning>,
    pub process_time_ms: f64,
    pub patterns_checked: u32,
}

/// A fully parsed case citation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseCitation {
    pub core: CitationCore,
    pub volume: String,
    pub reporter: String,
    pub page: Option<String>,
    pub has_blank_page: bool,
    pub pincite: Option<String>,
    pub court: Option<String>,
    pub year: Option<i32>,
    pub date: Option<ParsedDate>,
    pub case_name: Option<String>,
    pub plaintiff: Option<String>,
    pub defendant: Option<String>,
    pub parenthetical: Option<String>,
    pub disposition: Option<String>,
    pub full_span: Option<FullSpan>,
    pub group_id: Option<String>,
    pub parallel_citations: Vec<ParallelRef>,
    pub possible_interpretations: Vec<PossibleInterpretation>,
}

/// One candidate reading when the reporter database returns more than one
/// match for a reporter abbreviation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossibleInterpretation {
    pub reporter_name: String,
    pub confidence: f32,
}

/// A statute citation (e.g. "42 U.S.C. § 1983").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatuteCitation {
    pub core: CitationCore,
    pub code: String,
    pub section: String,
    pub title: Option<String>,
    pub subsections: Vec<String>,
    pub section_range: Option<(String, String)>,
}

/// A law journal / secondary-source citation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalCitation {
    pub core: CitationCore,
    pub journal: String,
    pub abbreviation: String,
    pub volume: Option<String>,
    pub page: Option<String>,
    pub pincite: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub title: Option<String>,
}

/// A "neutral" (vendor-assigned) citation, e.g. "2020 WL 123456".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeutralCitation {
    pub core: CitationCore,
    pub year: i32,
    pub court: Option<String>,
    pub document_number: String,
}

/// A Public Law citation, e.g. "Pub. L. No. 111-148".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicLawCitation {
    pub core: CitationCore,
    pub congress: String,
    pub law_number: String,
    pub title: Option<String>,
}

/// A Federal Register citation, e.g. "85 Fed. Reg. 12345".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FederalRegisterCitation {
    pub core: CitationCore,
    pub volume: String,
    pub page: String,
    pub year: Option<i32>,
}

/// An `Id.` / `Id. at N` short-form reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdCitation {
    pub core: CitationCore,
    pub pincite: Option<String>,
}

/// An `Ibid.` short-form reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IbidCitation {
    pub core: CitationCore,
    pub pincite: Option<String>,
}

/// A `Party, supra` short-form reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupraCitation {
    pub core: CitationCore,
    pub party_name: String,
    pub pincite: Option<String>,
}

/// A bare "volume reporter at page" short-form case reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortFormCaseCitation {
    pub core: CitationCore,
    pub volume: String,
    pub reporter: String,
    pub pincite: Option<String>,
}

/// Tagged union over every citation kind the engine can emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Citation {
    Case(CaseCitation),
    Statute(StatuteCitation),
    Journal(JournalCitation),
    Neutral(NeutralCitation),
    PublicLaw(PublicLawCitation),
    FederalRegister(FederalRegisterCitation),
    Id(IdCitation),
    Ibid(IbidCitation),
    Supra(SupraCitation),
    ShortFormCase(ShortFormCaseCitation),
}

impl Citation {
    pub fn core(&self) -> &CitationCore {
        match self {
            Citation::Case(c) => &c.core,
            Citation::Statute(c) => &c.core,
            Citation::Journal(c) => &c.core,
            Citation::Neutral(c) => &c.core,
            Citation::PublicLaw(c) => &c.core,
            Citation::FederalRegister(c) => &c.core,
            Citation::Id(c) => &c.core,
            Citation::Ibid(c) => &c.core,
            Citation::Supra(c) => &c.core,
            Citation::ShortFormCase(c) => &c.core,
        }
    }

    pub fn core_mut(&mut self) -> &mut CitationCore {
        match self {
            Citation::Case(c) => &mut c.core,
            Citation::Statute(c) => &mut c.core,
            Citation::Journal(c) => &mut c.core,
            Citation::Neutral(c) => &mut c.core,
            Citation::PublicLaw(c) => &mut c.core,
            Citation::FederalRegister(c) => &mut c.core,
            Citation::Id(c) => &mut c.core,
            Citation::Ibid(c) => &mut c.core,
            Citation::Supra(c) => &mut c.core,
            Citation::ShortFormCase(c) => &mut c.core,
        }
    }

    pub fn span(&self) -> Span {
        self.core().span
    }

    pub fn confidence(&self) -> f32 {
        self.core().confidence
    }

    pub fn is_case(&self) -> bool {
        matches!(self, Citation::Case(_))
    }

    pub fn as_case(&self) -> Option<&CaseCitation> {
        match self {
            Citation::Case(c) => Some(c),
            _ => None,
        }
    }
}

/// Outcome of resolving a short-form citation against document history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub resolved_to: Option<usize>,
    pub failure_reason: Option<String>,
    pub confidence: Option<f32>,
    pub warnings: Vec<Warning>,
}

/// A citation annotated with its resolution outcome. Never mutates the
/// input citation; this is a new record referencing it by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCitation {
    pub citation: Citation,
    pub resolution: Resolution,
}

/// Scope boundary strategy used when resolving `Id.`/short-forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeStrategy {
    Paragraph,
    Section,
    Footnote,
    None,
}

impl Default for ScopeStrategy {
    fn default() -> Self {
        ScopeStrategy::Paragraph
    }
}

/// Options controlling `resolve_citations`.
#[derive(Debug, Clone)]
pub struct ResolutionOptions {
    pub scope_strategy: ScopeStrategy,
    pub paragraph_boundary_pattern: regex::Regex,
    pub party_match_threshold: f32,
    pub allow_nested_resolution: bool,
    pub report_unresolved: bool,
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        Self {
            scope_strategy: ScopeStrategy::Paragraph,
            paragraph_boundary_pattern: regex::Regex::new(r"\n\n+").unwrap(),
            party_match_threshold: 0.8,
            allow_nested_resolution: false,
            report_unresolved: true,
        }
    }
}

/// Options controlling `extract_citations`.
#[derive(Clone, Default)]
pub struct ExtractOptions {
    pub cleaners: Option<Vec<cleaner::CleanerKind>>,
    pub patterns: Option<Vec<patterns::PatternId>>,
    pub resolve: bool,
    pub resolution_options: ResolutionOptions,
    pub reporter_db: Option<std::sync::Arc<dyn reporter_db::ReporterDb>>,
    pub validate: bool,
}

impl std::fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("cleaners", &self.cleaners)
            .field("patterns", &self.patterns)
            .field("resolve", &self.resolve)
            .field("resolution_options", &self.resolution_options)
            .field("reporter_db", &self.reporter_db.as_ref().map(|_| "<dyn ReporterDb>"))
            .field("validate", &self.validate)
            .finish()
    }
}

/// Output of the combined extract-then-resolve entry point.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub citations: Vec<Citation>,
    pub resolved: Option<Vec<ResolvedCitation>>,
}

/// Synchronous entry point: clean, tokenize, detect parallels, extract
/// metadata. Returns citations in source order. Resolution is a separate
/// explicit step via [`resolve::resolve_citations`] or [`extract`].
pub fn extract_citations(text: &str, options: &ExtractOptions) -> Result<Vec<Citation>> {
    let start = std::time::Instant::now();

    let cleaned = {
        let _span = tracing::debug_span!("clean", input_len = text.len()).entered();
        let cleaner_pipeline = options
            .cleaners
            .clone()
            .unwrap_or_else(cleaner::default_pipeline);
        cleaner::clean(text, &cleaner_pipeline)?
    };

    let tokens = {
        let _span = tracing::debug_span!("tokenize").entered();
        let pattern_ids = options.patterns.clone();
        let catalogue = patterns::catalogue_for(pattern_ids.as_deref());
        extract::dedup_tokens(tokenizer::tokenize(&cleaned.cleaned, &catalogue))
    };

    let groups = {
        let _span = tracing::debug_span!("detect_parallel").entered();
        parallel::detect_parallel(&tokens, &cleaned.cleaned)
    };

    let citations = {
        let _span = tracing::debug_span!("extract").entered();
        extract::extract_all(
            &tokens,
            &groups,
            &cleaned,
            options.reporter_db.as_deref().filter(|_| options.validate),
        )
    };

    for citation in &citations {
        for warning in &citation.core().warnings {
            match warning.level {
                WarningLevel::Warning | WarningLevel::Error => tracing::warn!("{}", warning.message),
                WarningLevel::Info => tracing::debug!("{}", warning.message),
            }
        }
    }

    tracing::info!(
        "extracted {} citations in {}ms",
        citations.len(),
        start.elapsed().as_millis()
    );

    Ok(citations)
}

/// Awaitable wrapper around [`extract_citations`]. Introduces no
/// suspension points of its own; it exists purely for ecosystem
/// compatibility with async call sites.
pub async fn extract_citations_async(text: &str, options: &ExtractOptions) -> Result<Vec<Citation>> {
    extract_citations(text, options)
}

/// Runs the synchronous pipeline and, if requested, resolution, returning
/// the combined outcome the CLI and tests consume.
pub fn extract(text: &str, options: &ExtractOptions) -> Result<ExtractionOutcome> {
    let citations = extract_citations(text, options)?;
    let resolved = if options.resolve {
        let _span = tracing::debug_span!("resolve", citation_count = citations.len()).entered();
        let resolved = resolve::resolve_citations(&citations, text, &options.resolution_options);
        let resolved_count = resolved.iter().filter(|r| r.resolution.resolved_to.is_some()).count();
        tracing::info!("resolved {}/{} short-form citations", resolved_count, resolved.len());
        Some(resolved)
    } else {
        None
    };
    Ok(ExtractionOutcome { citations, resolved })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_fields_roundtrip() {
        let s = Span::new(1, 2, 3, 4);
        assert_eq!(s.clean_start, 1);
        assert_eq!(s.original_end, 4);
    }

    #[test]
    fn citation_core_accessor_matches_variant() {
        let core = CitationCore {
            span: Span::new(0, 1, 0, 1),
            matched_text: "x".into(),
            confidence: 0.5,
            warnings: vec![],
            process_time_ms: 0.0,
            patterns_checked: 1,
        };
        let c = Citation::Id(IdCitation {
            core: core.clone(),
            pincite: None,
        });
        assert_eq!(c.core().matched_text, "x");
        assert!(!c.is_case());
    }
}
