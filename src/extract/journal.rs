//! # Journal Extractor
//!
//! Parses a `journal`-kind token (`123 Harv. L. Rev. 456`) into a
//! [`JournalCitation`]: volume, abbreviation, page, and an optional trailing
//! `(pincite,) (year)` lookahead mirroring the case extractor's convention.

use crate::cleaner::TransformationMap;
use crate::extract::span_from_token;
use crate::tokenizer::Token;
use crate::{CitationCore, JournalCitation};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;

static PINCITE_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*,\s*(\d+)\s*\((\d{4})\)").unwrap());
static YEAR_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\((\d{4})\)").unwrap());

pub fn extract_journal(token: &Token, map: &TransformationMap, cleaned: &str) -> Option<JournalCitation> {
    let start = Instant::now();

    let volume = token.captures.first()?.clone();
    let abbreviation = token.captures.get(1)?.clone()?.trim().to_string();
    let page = token.captures.get(2)?.clone();

    let tail = &cleaned[token.clean_end.min(cleaned.len())..];
    let (pincite, year) = if let Some(captures) = PINCITE_YEAR_RE.captures(tail) {
        (
            captures.get(1).map(|m| m.as_str().to_string()),
            captures.get(2).and_then(|m| m.as_str().parse().ok()),
        )
    } else if let Some(captures) = YEAR_ONLY_RE.captures(tail) {
        (None, captures.get(1).and_then(|m| m.as_str().parse().ok()))
    } else {
        (None, None)
    };

    let confidence: f32 = if year.is_some() { 0.75 } else { 0.6 };

    Some(JournalCitation {
        core: CitationCore {
            span: span_from_token(map, token),
            matched_text: token.matched_text.clone(),
            confidence,
            warnings: Vec::new(),
            process_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            patterns_checked: 1,
        },
        journal: abbreviation.clone(),
        abbreviation,
        volume,
        page,
        pincite,
        year,
        author: None,
        title: None,
    })
}
