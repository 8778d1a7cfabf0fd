//! # Short-Form Extractors
//!
//! Covers the four bare-reference kinds that exist to be resolved against
//! document history rather than parsed standalone: `Id.`, `Ibid.`, `Party,
//! supra`, and a bare `volume reporter at page`. Each carries little or no
//! metadata of its own — the document-scoped resolver (`resolve` module)
//! does the real work of linking them to an antecedent.

use crate::cleaner::TransformationMap;
use crate::extract::span_from_token;
use crate::tokenizer::Token;
use crate::{CitationCore, IbidCitation, IdCitation, ShortFormCaseCitation, SupraCitation};
use std::time::Instant;

pub fn extract_id(token: &Token, map: &TransformationMap) -> Option<IdCitation> {
    let start = Instant::now();
    Some(IdCitation {
        core: CitationCore {
            span: span_from_token(map, token),
            matched_text: token.matched_text.clone(),
            confidence: 0.9,
            warnings: Vec::new(),
            process_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            patterns_checked: 1,
        },
        pincite: token.captures.first().cloned().flatten(),
    })
}

pub fn extract_ibid(token: &Token, map: &TransformationMap) -> Option<IbidCitation> {
    let start = Instant::now();
    Some(IbidCitation {
        core: CitationCore {
            span: span_from_token(map, token),
            matched_text: token.matched_text.clone(),
            confidence: 0.9,
            warnings: Vec::new(),
            process_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            patterns_checked: 1,
        },
        pincite: token.captures.first().cloned().flatten(),
    })
}

pub fn extract_supra(token: &Token, map: &TransformationMap) -> Option<SupraCitation> {
    let start = Instant::now();
    let party_name = token.captures.first()?.clone()?.trim().to_string();
    Some(SupraCitation {
        core: CitationCore {
            span: span_from_token(map, token),
            matched_text: token.matched_text.clone(),
            confidence: 0.7,
            warnings: Vec::new(),
            process_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            patterns_checked: 1,
        },
        party_name,
        pincite: token.captures.get(1).cloned().flatten(),
    })
}

pub fn extract_short_form_case(token: &Token, map: &TransformationMap) -> Option<ShortFormCaseCitation> {
    let start = Instant::now();
    let volume = token.captures.first()?.clone()?;
    let reporter = token.captures.get(1)?.clone()?;
    let pincite = token.captures.get(2).cloned().flatten();
    Some(ShortFormCaseCitation {
        core: CitationCore {
            span: span_from_token(map, token),
            matched_text: token.matched_text.clone(),
            confidence: 0.9,
            warnings: Vec::new(),
            process_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            patterns_checked: 1,
        },
        volume,
        reporter,
        pincite,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::{clean, default_pipeline};
    use crate::patterns::{catalogue_for, TokenKind};
    use crate::tokenizer::tokenize;

    fn tokens_of(text: &str) -> (Vec<Token>, String, TransformationMap) {
        let cleaned = clean(text, &default_pipeline()).unwrap();
        let catalogue = catalogue_for(None);
        let tokens = tokenize(&cleaned.cleaned, &catalogue);
        (tokens, cleaned.cleaned, cleaned.map)
    }

    #[test]
    fn id_with_pincite() {
        let (tokens, _, map) = tokens_of("Id. at 125.");
        let token = tokens.into_iter().find(|t| t.kind == TokenKind::Id).unwrap();
        let citation = extract_id(&token, &map).unwrap();
        assert_eq!(citation.pincite.as_deref(), Some("125"));
    }

    #[test]
    fn supra_captures_party_and_pincite() {
        let (tokens, _, map) = tokens_of("See Smith, supra, at 55.");
        let token = tokens.into_iter().find(|t| t.kind == TokenKind::Supra).unwrap();
        let citation = extract_supra(&token, &map).unwrap();
        assert_eq!(citation.party_name, "Smith");
        assert_eq!(citation.pincite.as_deref(), Some("55"));
    }

    #[test]
    fn short_form_case_captures_volume_reporter_pincite() {
        let (tokens, _, map) = tokens_of("123 U.S. at 100.");
        let token = tokens.into_iter().find(|t| t.kind == TokenKind::ShortFormCase).unwrap();
        let citation = extract_short_form_case(&token, &map).unwrap();
        assert_eq!(citation.volume, "123");
        assert_eq!(citation.reporter, "U.S.");
        assert_eq!(citation.pincite.as_deref(), Some("100"));
    }
}
