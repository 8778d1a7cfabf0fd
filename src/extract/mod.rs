//! # Extraction Dispatch and Deduplication
//!
//! ## Purpose
//! Ties the per-kind metadata extractors together: deduplicates overlapping
//! tokens by pattern priority (spec.md §4.6), dispatches each surviving
//! token to its kind-specific parser, and folds parallel-group membership
//! (spec.md §4.3) into the resulting case citations.

pub mod case;
pub mod federal_register;
pub mod journal;
pub mod neutral;
pub mod public_law;
pub mod short_form;
pub mod statute;

use crate::cleaner::{CleanResult, TransformationMap};
use crate::parallel::ParallelGroups;
use crate::patterns::TokenKind;
use crate::reporter_db::ReporterDb;
use crate::tokenizer::Token;
use crate::{Citation, ParallelRef, Span};
use chrono::Datelike;
use std::collections::HashMap;

pub(crate) fn span_from_token(map: &TransformationMap, token: &Token) -> Span {
    let original_start = map.clean_to_original(token.clean_start);
    let original_end = map.clean_to_original(token.clean_end);
    Span::new(token.clean_start, token.clean_end, original_start, original_end)
}

fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// `dedup(tokens) -> Token[]` (spec.md §4.6). Sorts by `(cleanStart,
/// priority)`; when two tokens' spans overlap, keeps the one whose pattern
/// sorts earlier in the priority order (neutral > shortFormCase > case >
/// statute > journal > publicLaw > federalRegister), breaking ties in favor
/// of the longer match.
pub fn dedup_tokens(tokens: Vec<Token>) -> Vec<Token> {
    let mut ordered = tokens;
    ordered.sort_by_key(|t| (t.clean_start, t.priority));

    let mut kept: Vec<Token> = Vec::new();
    'outer: for token in ordered {
        for existing in kept.iter_mut() {
            if spans_overlap(existing, &token) {
                if token.priority < existing.priority
                    || (token.priority == existing.priority && token_len(&token) > token_len(existing))
                {
                    *existing = token;
                }
                continue 'outer;
            }
        }
        kept.push(token);
    }

    kept.sort_by_key(|t| t.clean_start);
    kept
}

fn spans_overlap(a: &Token, b: &Token) -> bool {
    a.clean_start < b.clean_end && b.clean_start < a.clean_end
}

fn token_len(t: &Token) -> usize {
    t.clean_end - t.clean_start
}

/// `extractAll(tokens, groups, cleaned, reporterDb?) -> Citation[]`.
/// Dispatches each (already deduplicated) token to its kind-specific
/// extractor in source order, then assigns `groupId`/`parallelCitations` to
/// every member of a parallel-citation group.
pub fn extract_all(
    tokens: &[Token],
    groups: &ParallelGroups,
    cleaned: &CleanResult,
    reporter_db: Option<&dyn ReporterDb>,
) -> Vec<Citation> {
    let current_year = current_year();

    let mut tail_of: HashMap<usize, usize> = HashMap::new();
    for (&primary, secondaries) in groups {
        let tail = secondaries.last().copied().unwrap_or(primary);
        tail_of.insert(primary, tail);
        for &secondary in secondaries {
            tail_of.insert(secondary, tail);
        }
    }

    let mut slots: Vec<Option<Citation>> = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let citation = match token.kind {
            TokenKind::Case => {
                let lookahead_start = tail_of
                    .get(&i)
                    .and_then(|&tail_idx| tokens.get(tail_idx))
                    .map(|t| t.clean_end)
                    .unwrap_or(token.clean_end);
                case::extract_case(
                    token,
                    &cleaned.map,
                    &cleaned.cleaned,
                    current_year,
                    reporter_db,
                    lookahead_start,
                )
                .map(Citation::Case)
            }
            TokenKind::Statute => {
                statute::extract_statute(token, &cleaned.map, &cleaned.cleaned).map(Citation::Statute)
            }
            TokenKind::Journal => {
                journal::extract_journal(token, &cleaned.map, &cleaned.cleaned).map(Citation::Journal)
            }
            TokenKind::Neutral => neutral::extract_neutral(token, &cleaned.map).map(Citation::Neutral),
            TokenKind::PublicLaw => {
                public_law::extract_public_law(token, &cleaned.map).map(Citation::PublicLaw)
            }
            TokenKind::FederalRegister => {
                federal_register::extract_federal_register(token, &cleaned.map, &cleaned.cleaned)
                    .map(Citation::FederalRegister)
            }
            TokenKind::Id => short_form::extract_id(token, &cleaned.map).map(Citation::Id),
            TokenKind::Ibid => short_form::extract_ibid(token, &cleaned.map).map(Citation::Ibid),
            TokenKind::Supra => short_form::extract_supra(token, &cleaned.map).map(Citation::Supra),
            TokenKind::ShortFormCase => {
                short_form::extract_short_form_case(token, &cleaned.map).map(Citation::ShortFormCase)
            }
            // Section headings exist only to drive the resolver's `section`
            // scope strategy; they never surface as citations themselves.
            TokenKind::SectionHeading => None,
        };
        slots.push(citation);
    }

    for (&primary_idx, secondaries) in groups {
        let parallel_citations: Vec<ParallelRef> = secondaries
            .iter()
            .filter_map(|&idx| slots.get(idx).and_then(|c| c.as_ref()).and_then(|c| c.as_case()))
            .map(|c| ParallelRef {
                volume: c.volume.clone(),
                reporter: c.reporter.clone(),
                page: c.page.clone().unwrap_or_default(),
            })
            .collect();

        let group_id = slots
            .get(primary_idx)
            .and_then(|c| c.as_ref())
            .and_then(|c| c.as_case())
            .map(|c| format!("{}-{}-{}", c.volume, c.reporter, c.page.clone().unwrap_or_default()));
        let Some(group_id) = group_id else { continue };
        if parallel_citations.is_empty() {
            continue;
        }

        if let Some(Citation::Case(primary)) = slots.get_mut(primary_idx).and_then(|c| c.as_mut()) {
            primary.group_id = Some(group_id.clone());
            primary.parallel_citations = parallel_citations;
        }
        for &idx in secondaries {
            if let Some(Citation::Case(secondary)) = slots.get_mut(idx).and_then(|c| c.as_mut()) {
                secondary.group_id = Some(group_id.clone());
            }
        }
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::{clean, default_pipeline};
    use crate::parallel::detect_parallel;
    use crate::patterns::catalogue_for;
    use crate::tokenizer::tokenize;

    #[test]
    fn dedup_prefers_higher_priority_pattern_on_overlap() {
        let cleaned = clean("123 U.S. at 100", &default_pipeline()).unwrap();
        let catalogue = catalogue_for(None);
        let tokens = tokenize(&cleaned.cleaned, &catalogue);
        let deduped = dedup_tokens(tokens);
        let overlapping: Vec<_> = deduped
            .iter()
            .filter(|t| t.clean_start == 0)
            .collect();
        assert_eq!(overlapping.len(), 1);
        assert_eq!(overlapping[0].kind, TokenKind::ShortFormCase);
    }

    #[test]
    fn parallel_group_shares_year_and_group_id() {
        let text = "Roe v. Wade, 410 U.S. 113, 93 S. Ct. 705, 35 L. Ed. 2d 147 (1973).";
        let cleaned = clean(text, &default_pipeline()).unwrap();
        let catalogue = catalogue_for(None);
        let tokens = dedup_tokens(tokenize(&cleaned.cleaned, &catalogue));
        let groups = detect_parallel(&tokens, &cleaned.cleaned);
        let citations = extract_all(&tokens, &groups, &cleaned, None);
        let cases: Vec<_> = citations.iter().filter_map(|c| c.as_case()).collect();
        assert_eq!(cases.len(), 3);
        assert!(cases.iter().all(|c| c.year == Some(1973)));
        let group_ids: std::collections::HashSet<_> =
            cases.iter().filter_map(|c| c.group_id.as_deref()).collect();
        assert_eq!(group_ids.len(), 1);
        let primary = cases.iter().find(|c| !c.parallel_citations.is_empty()).unwrap();
        assert_eq!(primary.parallel_citations.len(), 2);
    }

    #[test]
    fn historical_citation_yields_no_citation() {
        let text = "3 Edw. 1, ch. 29 (1297).";
        let cleaned = clean(text, &default_pipeline()).unwrap();
        let catalogue = catalogue_for(None);
        let tokens = dedup_tokens(tokenize(&cleaned.cleaned, &catalogue));
        let groups = detect_parallel(&tokens, &cleaned.cleaned);
        let citations = extract_all(&tokens, &groups, &cleaned, None);
        assert!(citations.iter().all(|c| !c.is_case()));
    }
}
