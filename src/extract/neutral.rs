//! # Neutral Citation Extractor
//!
//! Parses a `neutral`-kind token (`2020 WL 123456` / `2020 U.S. LEXIS 789`)
//! into a [`NeutralCitation`]. The pattern alone carries no court — the
//! vendor database that would supply one is out of scope (spec.md §1) — so
//! `court` stays unset, matching the engine's degraded-mode posture for
//! fields it cannot source from the matched text itself.

use crate::cleaner::TransformationMap;
use crate::extract::span_from_token;
use crate::tokenizer::Token;
use crate::{CitationCore, NeutralCitation};
use std::time::Instant;

pub fn extract_neutral(token: &Token, map: &TransformationMap) -> Option<NeutralCitation> {
    let start = Instant::now();

    let year: i32 = token.captures.first()?.clone()?.parse().ok()?;
    let document_number = token.captures.get(1)?.clone()?;

    Some(NeutralCitation {
        core: CitationCore {
            span: span_from_token(map, token),
            matched_text: token.matched_text.clone(),
            confidence: 0.9,
            warnings: Vec::new(),
            process_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            patterns_checked: 1,
        },
        year,
        court: None,
        document_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::{clean, default_pipeline};
    use crate::patterns::{catalogue_for, TokenKind};
    use crate::tokenizer::tokenize;

    #[test]
    fn parses_westlaw_citation() {
        let text = "See 2020 WL 123456.";
        let cleaned = clean(text, &default_pipeline()).unwrap();
        let catalogue = catalogue_for(None);
        let tokens = tokenize(&cleaned.cleaned, &catalogue);
        let token = tokens
            .into_iter()
            .find(|t| t.kind == TokenKind::Neutral)
            .expect("expected a neutral token");
        let citation = extract_neutral(&token, &cleaned.map).unwrap();
        assert_eq!(citation.year, 2020);
        assert_eq!(citation.document_number, "123456");
    }
}
