//! # Federal Register Extractor
//!
//! Parses a `federalRegister`-kind token (`85 Fed. Reg. 12345`) into a
//! [`FederalRegisterCitation`]: volume and starting page, plus an optional
//! trailing `(year)` lookahead.

use crate::cleaner::TransformationMap;
use crate::extract::span_from_token;
use crate::tokenizer::Token;
use crate::{CitationCore, FederalRegisterCitation};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;

static YEAR_LOOKAHEAD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\((\d{4})\)").unwrap());

pub fn extract_federal_register(
    token: &Token,
    map: &TransformationMap,
    cleaned: &str,
) -> Option<FederalRegisterCitation> {
    let start = Instant::now();

    let volume = token.captures.first()?.clone()?;
    let page = token.captures.get(1)?.clone()?;

    let tail = &cleaned[token.clean_end.min(cleaned.len())..];
    let year = YEAR_LOOKAHEAD_RE
        .captures(tail)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());

    Some(FederalRegisterCitation {
        core: CitationCore {
            span: span_from_token(map, token),
            matched_text: token.matched_text.clone(),
            confidence: 0.9,
            warnings: Vec::new(),
            process_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            patterns_checked: 1,
        },
        volume,
        page,
        year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::{clean, default_pipeline};
    use crate::patterns::{catalogue_for, TokenKind};
    use crate::tokenizer::tokenize;

    #[test]
    fn parses_volume_and_page() {
        let text = "85 Fed. Reg. 12345 (2020).";
        let cleaned = clean(text, &default_pipeline()).unwrap();
        let catalogue = catalogue_for(None);
        let tokens = tokenize(&cleaned.cleaned, &catalogue);
        let token = tokens
            .into_iter()
            .find(|t| t.kind == TokenKind::FederalRegister)
            .expect("expected a federal-register token");
        let citation = extract_federal_register(&token, &cleaned.map, &cleaned.cleaned).unwrap();
        assert_eq!(citation.volume, "85");
        assert_eq!(citation.page, "12345");
        assert_eq!(citation.year, Some(2020));
    }
}
