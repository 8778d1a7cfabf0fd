//! # Tokenizer
//!
//! ## Purpose
//! Sweeps the pattern catalogue over cleaned text and collects every
//! candidate match as a [`Token`], tagged with its kind and originating
//! pattern. Deliberately does not deduplicate — overlapping tokens are
//! resolved later by the extractor's deduplicator (spec §4.6).

use crate::patterns::{Pattern, PatternId, TokenKind, DEFAULT_PATTERN_BUDGET};
use crate::Warning;
use rayon::prelude::*;
use std::time::Instant;

/// Below this length, sequential iteration avoids rayon's thread-pool
/// dispatch overhead; above it, sweeping patterns in parallel wins.
const PARALLEL_SWEEP_THRESHOLD: usize = 20_000;

/// A candidate match emitted by one pattern sweep.
#[derive(Debug, Clone)]
pub struct Token {
    pub clean_start: usize,
    pub clean_end: usize,
    pub matched_text: String,
    pub kind: TokenKind,
    pub pattern_id: PatternId,
    pub priority: u8,
    pub captures: Vec<Option<String>>,
}

/// `tokenize(cleaned, patterns) -> Token[]`. Applies each pattern's global
/// match over the full cleaned text. Patterns exceeding their time budget
/// are skipped (with a warning) and the sweep continues with the rest.
pub fn tokenize(cleaned: &str, catalogue: &[Pattern]) -> Vec<Token> {
    let (tokens, _warnings) = tokenize_with_warnings(cleaned, catalogue);
    tokens
}

/// Same as [`tokenize`] but also surfaces the per-pattern budget warnings,
/// for callers (the CLI, tests) that want to report skipped patterns.
pub fn tokenize_with_warnings(cleaned: &str, catalogue: &[Pattern]) -> (Vec<Token>, Vec<Warning>) {
    let sweep = |pattern: &Pattern| -> Result<Vec<Token>, Warning> {
        let start = Instant::now();
        let mut found = Vec::new();
        for captures in pattern.regex.captures_iter(cleaned) {
            let Some(whole) = captures.get(0) else { continue };
            found.push(Token {
                clean_start: whole.start(),
                clean_end: whole.end(),
                matched_text: whole.as_str().to_string(),
                kind: pattern.kind,
                pattern_id: pattern.id,
                priority: pattern.priority,
                captures: (1..captures.len())
                    .map(|i| captures.get(i).map(|m| m.as_str().to_string()))
                    .collect(),
            });
            if start.elapsed() > DEFAULT_PATTERN_BUDGET {
                return Err(Warning::warning(
                    format!(
                        "pattern {:?} exceeded its {:?} budget and was skipped",
                        pattern.id, DEFAULT_PATTERN_BUDGET
                    ),
                    None,
                ));
            }
        }
        Ok(found)
    };

    let results: Vec<Result<Vec<Token>, Warning>> = if cleaned.len() >= PARALLEL_SWEEP_THRESHOLD {
        catalogue.par_iter().map(sweep).collect()
    } else {
        catalogue.iter().map(sweep).collect()
    };

    let mut tokens = Vec::new();
    let mut warnings = Vec::new();
    for result in results {
        match result {
            Ok(mut found) => tokens.append(&mut found),
            Err(warning) => warnings.push(warning),
        }
    }

    tokens.sort_by_key(|t| t.clean_start);
    (tokens, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::catalogue_for;

    #[test]
    fn tokenizes_simple_case_citation() {
        let catalogue = catalogue_for(None);
        let tokens = tokenize("500 F.2d 123 (9th Cir. 1974)", &catalogue);
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Case && t.matched_text.starts_with("500")));
    }

    #[test]
    fn does_not_deduplicate_overlapping_matches() {
        let catalogue = catalogue_for(None);
        // "123 U.S. at 100" matches both the short-form pattern and the
        // broad state-reporter / journal patterns; the tokenizer keeps all.
        let tokens = tokenize("123 U.S. at 100", &catalogue);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&TokenKind::ShortFormCase));
    }

    #[test]
    fn tokens_are_returned_in_source_order() {
        let catalogue = catalogue_for(None);
        let tokens = tokenize("Id. at 5. 410 U.S. 113 (1973).", &catalogue);
        for pair in tokens.windows(2) {
            assert!(pair[0].clean_start <= pair[1].clean_start);
        }
    }

    #[test]
    fn parallel_sweep_above_threshold_matches_sequential_below_it() {
        let catalogue = catalogue_for(None);
        let snippet = "Smith v. Doe, 500 F.2d 123 (9th Cir. 1974). ";
        let small = snippet.to_string();
        let mut large = String::with_capacity(PARALLEL_SWEEP_THRESHOLD + snippet.len());
        while large.len() < PARALLEL_SWEEP_THRESHOLD {
            large.push_str("The parties dispute the underlying facts. ");
        }
        large.push_str(snippet);

        let small_tokens = tokenize(&small, &catalogue);
        let large_tokens = tokenize(&large, &catalogue);

        let small_kinds: Vec<_> = small_tokens.iter().map(|t| (t.kind, t.matched_text.clone())).collect();
        let large_case_kinds: Vec<_> = large_tokens
            .iter()
            .filter(|t| t.matched_text.contains("500"))
            .map(|t| (t.kind, t.matched_text.clone()))
            .collect();
        assert_eq!(small_kinds, large_case_kinds);
    }
}
