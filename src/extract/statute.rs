//! # Statute Extractor
//!
//! Parses a `statute`-kind token (`42 U.S.C. § 1983(a)(1)(A)`) into a
//! [`StatuteCitation`]: leading title number, the code abbreviation, the
//! section, and any trailing `(a)(1)(A)`-style subsections.

use crate::cleaner::TransformationMap;
use crate::extract::span_from_token;
use crate::tokenizer::Token;
use crate::{CitationCore, StatuteCitation};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;

static SUBSECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(([A-Za-z0-9]+)\)").unwrap());

pub fn extract_statute(token: &Token, map: &TransformationMap, cleaned: &str) -> Option<StatuteCitation> {
    let start = Instant::now();

    let title = token.captures.first()?.clone();
    let section = token.captures.get(1)?.clone()?;

    let tail = &cleaned[token.clean_end.min(cleaned.len())..];
    let (subsections, consumed) = parse_subsections(tail);

    let mut confidence: f32 = 0.85;
    if !subsections.is_empty() {
        confidence += 0.05;
    }
    confidence = confidence.clamp(0.0, 1.0);

    let mut span = span_from_token(map, token);
    if consumed > 0 {
        span.clean_end = (token.clean_end + consumed).min(cleaned.len());
        span.original_end = map.clean_to_original(span.clean_end).max(span.original_end);
    }

    Some(StatuteCitation {
        core: CitationCore {
            span,
            matched_text: token.matched_text.clone(),
            confidence,
            warnings: Vec::new(),
            process_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            patterns_checked: 1,
        },
        code: "U.S.C.".to_string(),
        section,
        title,
        subsections,
        section_range: None,
    })
}

/// Consumes a contiguous run of `(x)` groups right at the start of `tail`,
/// returning the inner contents and how many bytes were consumed.
fn parse_subsections(tail: &str) -> (Vec<String>, usize) {
    let mut subsections = Vec::new();
    let mut pos = 0;
    loop {
        let rest = &tail[pos..];
        match SUBSECTION_RE.captures(rest) {
            Some(captures) => {
                let whole = captures.get(0).unwrap();
                subsections.push(captures.get(1).unwrap().as_str().to_string());
                pos += whole.end();
            }
            None => break,
        }
    }
    (subsections, pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::{clean, default_pipeline};
    use crate::patterns::{catalogue_for, TokenKind};
    use crate::tokenizer::tokenize;

    fn first_statute_token(text: &str) -> (Token, String, TransformationMap) {
        let cleaned = clean(text, &default_pipeline()).unwrap();
        let catalogue = catalogue_for(None);
        let tokens = tokenize(&cleaned.cleaned, &catalogue);
        let token = tokens
            .into_iter()
            .find(|t| t.kind == TokenKind::Statute)
            .expect("expected a statute token");
        (token, cleaned.cleaned, cleaned.map)
    }

    #[test]
    fn parses_title_code_and_section() {
        let (token, cleaned, map) = first_statute_token("42 U.S.C. \u{00A7} 1983.");
        let citation = extract_statute(&token, &map, &cleaned).unwrap();
        assert_eq!(citation.title.as_deref(), Some("42"));
        assert_eq!(citation.code, "U.S.C.");
        assert_eq!(citation.section, "1983");
        assert!(citation.subsections.is_empty());
    }

    #[test]
    fn parses_trailing_subsections() {
        let (token, cleaned, map) = first_statute_token("42 U.S.C. \u{00A7} 1983(a)(1)(A) requires...");
        let citation = extract_statute(&token, &map, &cleaned).unwrap();
        assert_eq!(citation.subsections, vec!["a", "1", "A"]);
    }
}
