//! # Public Law Extractor
//!
//! Parses a `publicLaw`-kind token (`Pub. L. No. 111-148`) into a
//! [`PublicLawCitation`]: congress number and law number.

use crate::cleaner::TransformationMap;
use crate::extract::span_from_token;
use crate::tokenizer::Token;
use crate::{CitationCore, PublicLawCitation};
use std::time::Instant;

pub fn extract_public_law(token: &Token, map: &TransformationMap) -> Option<PublicLawCitation> {
    let start = Instant::now();

    let congress = token.captures.first()?.clone()?;
    let law_number = token.captures.get(1)?.clone()?;

    Some(PublicLawCitation {
        core: CitationCore {
            span: span_from_token(map, token),
            matched_text: token.matched_text.clone(),
            confidence: 0.9,
            warnings: Vec::new(),
            process_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            patterns_checked: 1,
        },
        congress,
        law_number,
        title: None,
    })
}
