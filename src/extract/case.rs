//! # Case Citation Extractor
//!
//! ## Purpose
//! Parses a `case`-kind token plus its surrounding cleaned text into a
//! fully populated [`CaseCitation`]: volume/reporter/page, the trailing
//! parenthetical (pincite, year, structured date, court, disposition), and
//! a backward case-name lookup (`Party v. Party`, `In re X`, ...).

use crate::cleaner::TransformationMap;
use crate::reporter_db::ReporterDb;
use crate::tokenizer::Token;
use crate::{CaseCitation, CitationCore, ParsedDate, PossibleInterpretation, Span, Warning};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;
use unicode_normalization::UnicodeNormalization;

const MAX_CASE_NAME_LOOKBACK: usize = 200;

static PINCITE_PAREN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*,\s*(\d+)?\s*\(([^)]+)\)").unwrap()
});
static PAREN_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\(([^)]+)\)").unwrap());
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").unwrap());
static MONTH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(Jan\.?|Feb\.?|Mar\.?|Apr\.?|May|Jun\.?|Jul\.?|Aug\.?|Sep\.?|Sept\.?|Oct\.?|Nov\.?|Dec\.?)\s+(\d{1,2}),?\s*(\d{4})\b").unwrap()
});
static SLASH_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap());
static V_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\sv\.?\s").unwrap());
static PROCEDURAL_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(In re|Ex parte|Matter of)\s+").unwrap());
const SIGNAL_WORDS: &[&str] = &[
    "see", "see,", "accord", "cf", "cf.", "compare", "but", "e.g", "e.g.", "contra", "citing",
    "quoting", "also", "id", "id.",
];
const MAX_LOOKBACK_WORDS: usize = 6;
static CORPORATE_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i),?\s*(Inc|Corp|Corporation|LLC|L\.L\.C|Ltd|Co)\.?\s*$").unwrap()
});
static ET_AL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*,?\s*et\s+al\.?\s*$").unwrap());
static PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

const COMMON_REPORTERS: &[&str] = &[
    "F.", "F.2d", "F.3d", "F.4th", "F. Supp.", "F. Supp. 2d", "F. Supp. 3d", "U.S.", "S. Ct.",
    "L. Ed.", "L. Ed. 2d", "P.", "P.2d", "P.3d", "A.", "A.2d", "A.3d", "N.E.", "N.E.2d", "N.E.3d",
    "N.W.", "N.W.2d", "S.E.", "S.E.2d", "S.W.", "S.W.2d", "S.W.3d", "So.", "So. 2d", "So. 3d",
];

/// `extractCase(token, map, cleaned, reporterDb?) -> FullCaseCitation`.
///
/// `lookahead_start` is usually `token.clean_end`, but for a member of a
/// parallel-citation group it is the end of the *last* member: every member
/// of the group shares the one trailing parenthetical (spec.md §8 scenario
/// 2), so only the tail member's own trailing text actually contains it.
pub fn extract_case(
    token: &Token,
    map: &TransformationMap,
    cleaned: &str,
    current_year: i32,
    reporter_db: Option<&dyn ReporterDb>,
    lookahead_start: usize,
) -> Option<CaseCitation> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let volume = token.captures.first()?.clone()?;
    let reporter_raw = token.captures.get(1)?.clone()?;
    let reporter = normalize_reporter_spacing(&reporter_raw);
    let page_raw = token.captures.get(2)?.clone()?;
    let has_blank_page = page_raw.chars().all(|c| c == '_' || c == '-') && page_raw.len() >= 3;
    let page = if has_blank_page { None } else { Some(page_raw.clone()) };

    let lookahead_start = lookahead_start.min(cleaned.len());
    let tail = &cleaned[lookahead_start..];
    let (pincite, paren_body, paren_len) = parse_lookahead(tail);

    let (year, date) = paren_body.as_deref().map(parse_year_and_date).unwrap_or((None, None));
    if let Some(y) = year {
        if y < 1700 {
            return None; // historical false positive, silently dropped
        }
    }

    let (court, disposition) = paren_body
        .as_deref()
        .map(|body| parse_court_and_disposition(body, &reporter))
        .unwrap_or((None, None));

    let (case_name, plaintiff, defendant) = lookback_case_name(cleaned, token.clean_start);

    let mut confidence: f32 = 0.5;
    if is_common_reporter(&reporter) {
        confidence += 0.3;
    }
    if let Some(y) = year {
        if y <= current_year {
            confidence += 0.2;
        }
    }

    let mut possible_interpretations = Vec::new();
    if let Some(db) = reporter_db {
        let matches = db.find_by_abbreviation(&normalize_reporter_for_lookup(&reporter));
        match matches.len() {
            0 => {
                confidence -= 0.3;
                warnings.push(Warning::warning(
                    format!("reporter '{}' not found in reporter database", reporter),
                    Some(token.clean_start),
                ));
            }
            1 => confidence += 0.2,
            n => {
                confidence -= 0.1 * (n as f32 - 1.0);
                let weight = 1.0 / n as f32;
                possible_interpretations = matches
                    .iter()
                    .map(|entry| PossibleInterpretation {
                        reporter_name: entry.canonical_name.clone(),
                        confidence: weight,
                    })
                    .collect();
            }
        }
    }

    if has_blank_page {
        confidence = 0.8;
        warnings.push(Warning::info("blank page placeholder", Some(token.clean_start)));
    }
    confidence = confidence.clamp(0.0, 1.0);

    let original_start = map.clean_to_original(token.clean_start);
    let original_end = map.clean_to_original(token.clean_end);
    let span = Span::new(token.clean_start, token.clean_end, original_start, original_end);

    let full_span_start = case_name
        .as_ref()
        .map(|_| {
            let lookback_clean_start = token.clean_start.saturating_sub(MAX_CASE_NAME_LOOKBACK);
            map.clean_to_original(lookback_clean_start)
        })
        .unwrap_or(original_start);
    let full_span_clean_end = (lookahead_start + paren_len).min(cleaned.len());
    let full_span_end = map.clean_to_original(full_span_clean_end);
    let full_span = Some(Span::new(
        token.clean_start,
        full_span_clean_end,
        full_span_start.min(original_start),
        full_span_end.max(original_end),
    ));

    Some(CaseCitation {
        core: CitationCore {
            span,
            matched_text: token.matched_text.clone(),
            confidence,
            warnings,
            process_time_ms: start.elapsed().as_secs_f64() * 1000.0,
            patterns_checked: 1,
        },
        volume,
        reporter,
        page,
        has_blank_page,
        pincite,
        court,
        year,
        date,
        case_name,
        plaintiff,
        defendant,
        parenthetical: paren_body,
        disposition,
        full_span,
        group_id: None,
        parallel_citations: Vec::new(),
        possible_interpretations,
    })
}

fn normalize_reporter_spacing(reporter: &str) -> String {
    reporter.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn normalize_reporter_for_lookup(reporter: &str) -> String {
    reporter.chars().filter(|c| !c.is_whitespace() && *c != '.').collect()
}

fn is_common_reporter(reporter: &str) -> bool {
    let normalized = normalize_reporter_for_lookup(reporter).to_lowercase();
    COMMON_REPORTERS
        .iter()
        .any(|r| normalize_reporter_for_lookup(r).to_lowercase() == normalized)
}

/// Parses `, <pincite> (<parenthetical body>)` (or a bare parenthetical
/// with no pincite) starting right after the case token. Returns the
/// pincite, the parenthetical's inner text, and how many cleaned-text
/// bytes the whole lookahead consumed (for `fullSpan`).
fn parse_lookahead(tail: &str) -> (Option<String>, Option<String>, usize) {
    if let Some(captures) = PINCITE_PAREN_RE.captures(tail) {
        let whole = captures.get(0).unwrap();
        let pincite = captures.get(1).map(|m| m.as_str().to_string());
        let body = captures.get(2).map(|m| m.as_str().to_string());
        return (pincite, body, whole.end());
    }
    if let Some(captures) = PAREN_ONLY_RE.captures(tail) {
        let whole = captures.get(0).unwrap();
        let body = captures.get(1).map(|m| m.as_str().to_string());
        return (None, body, whole.end());
    }
    (None, None, 0)
}

fn parse_year_and_date(body: &str) -> (Option<i32>, Option<ParsedDate>) {
    if let Some(captures) = MONTH_DATE_RE.captures(body) {
        let month_name = captures.get(1).unwrap().as_str().to_lowercase();
        let day: u32 = captures.get(2).unwrap().as_str().parse().unwrap_or(1);
        let year: i32 = captures.get(3).unwrap().as_str().parse().unwrap_or(0);
        let month = month_number(&month_name);
        let iso = format!("{:04}-{:02}-{:02}", year, month.unwrap_or(1), day);
        return (Some(year), Some(ParsedDate { iso, year, month, day: Some(day) }));
    }
    if let Some(captures) = SLASH_DATE_RE.captures(body) {
        let month: u32 = captures.get(1).unwrap().as_str().parse().unwrap_or(1);
        let day: u32 = captures.get(2).unwrap().as_str().parse().unwrap_or(1);
        let year: i32 = captures.get(3).unwrap().as_str().parse().unwrap_or(0);
        let iso = format!("{:04}-{:02}-{:02}", year, month, day);
        return (Some(year), Some(ParsedDate { iso, year, month: Some(month), day: Some(day) }));
    }
    let year = YEAR_RE
        .find_iter(body)
        .last()
        .and_then(|m| m.as_str().parse().ok());
    (year, None)
}

fn month_number(name: &str) -> Option<u32> {
    let trimmed = name.trim_end_matches('.');
    Some(match trimmed {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" | "sept" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    })
}

fn parse_court_and_disposition(body: &str, reporter: &str) -> (Option<String>, Option<String>) {
    let mut disposition = None;
    let lower = body.to_lowercase();
    if lower.contains("en banc") {
        disposition = Some("en banc".to_string());
    } else if lower.contains("per curiam") {
        disposition = Some("per curiam".to_string());
    }

    let mut stripped = YEAR_RE.replace_all(body, "").to_string();
    stripped = MONTH_DATE_RE.replace_all(&stripped, "").to_string();
    stripped = SLASH_DATE_RE.replace_all(&stripped, "").to_string();
    if let Some(d) = &disposition {
        let pos = stripped.to_lowercase().find(d.as_str());
        if let Some(pos) = pos {
            stripped.replace_range(pos..pos + d.len(), "");
        }
    }
    // Trailing periods are part of court abbreviations ("9th Cir.") and
    // must survive; only whitespace and stray commas are stripped.
    let court_text = stripped.trim_matches(|c: char| c.is_whitespace() || c == ',');

    let normalized_reporter = normalize_reporter_for_lookup(reporter);
    let is_scotus_reporter = ["U.S.", "S.Ct.", "LEd", "LEd2d"]
        .iter()
        .any(|r| normalize_reporter_for_lookup(r) == normalized_reporter);

    if !court_text.is_empty() && court_text.chars().any(|c| c.is_alphabetic()) {
        (Some(court_text.to_string()), disposition)
    } else if is_scotus_reporter {
        (Some("scotus".to_string()), disposition)
    } else {
        (None, disposition)
    }
}

/// Scans up to [`MAX_CASE_NAME_LOOKBACK`] characters backward from the case
/// token's start for a `Party v. Party,` or procedural-prefix case name.
///
/// The case name must sit immediately before the citation's leading comma.
/// Anything further back — a signal word like "See" or "Accord", the end of
/// the previous sentence — stops the backward scan rather than being
/// swallowed into the plaintiff, which a single greedy regex would do.
fn lookback_case_name(cleaned: &str, clean_start: usize) -> (Option<String>, Option<String>, Option<String>) {
    let window_start = clean_start.saturating_sub(MAX_CASE_NAME_LOOKBACK);
    let window = match cleaned.get(window_start..clean_start) {
        Some(w) => w,
        None => return (None, None, None),
    };
    let trimmed_end = window.trim_end();
    let Some(before_comma) = trimmed_end.strip_suffix(',') else {
        return (None, None, None);
    };
    let before_comma = before_comma.trim_end();

    if let Some(v_match) = V_MARKER_RE.find_iter(before_comma).last() {
        let defendant = before_comma[v_match.end()..].trim();
        let plaintiff = backward_capitalized_phrase(&before_comma[..v_match.start()]);
        if let (Some(plaintiff), false) = (plaintiff, defendant.is_empty()) {
            let case_name = format!("{} v. {}", plaintiff, defendant);
            return (Some(case_name), Some(plaintiff), Some(defendant.to_string()));
        }
    }

    if let Some(prefix_match) = PROCEDURAL_PREFIX_RE.find_iter(before_comma).last() {
        let prefix = before_comma[prefix_match.start()..prefix_match.end()]
            .trim_end()
            .to_string();
        let party = before_comma[prefix_match.end()..].trim();
        if !party.is_empty() {
            let case_name = format!("{} {}", prefix, party);
            return (Some(case_name), Some(party.to_string()), None);
        }
    }

    (None, None, None)
}

/// Scans `text` backward, word by word, collecting a capitalized phrase and
/// stopping at the first non-capitalized word, a known citation signal word
/// (case-insensitive), or the word cap.
fn backward_capitalized_phrase(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut collected = Vec::new();
    for word in words.iter().rev() {
        if collected.len() >= MAX_LOOKBACK_WORDS {
            break;
        }
        let bare = word.trim_matches(|c: char| c == '.' || c == ',');
        if SIGNAL_WORDS.contains(&bare.to_lowercase().as_str()) {
            break;
        }
        if !word.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
            break;
        }
        collected.push(*word);
    }
    collected.reverse();
    if collected.is_empty() {
        None
    } else {
        Some(collected.join(" "))
    }
}

/// Seven-step party-name normalization pipeline, in the pinned order
/// (spec.md §9 Open Question): trim, collapse whitespace, strip trailing
/// corporate suffix, strip "et al.", lowercase, strip punctuation, strip
/// diacritics. Used for fuzzy-matching purposes only — `case_name` on the
/// citation keeps the original casing and suffixes.
pub fn normalize_party(raw: &str) -> String {
    let step1 = raw.trim();
    let step2 = step1.split_whitespace().collect::<Vec<_>>().join(" ");
    let step3 = CORPORATE_SUFFIX_RE.replace(&step2, "").to_string();
    let step4 = ET_AL_RE.replace(&step3, "").to_string();
    let step5 = step4.to_lowercase();
    let step6 = PUNCT_RE.replace_all(&step5, "").to_string();
    let step7: String = step6.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    step7.trim().to_string()
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::{clean, default_pipeline};
    use crate::patterns::catalogue_for;
    use crate::tokenizer::tokenize;

    fn first_case_token(text: &str) -> (Token, String, TransformationMap) {
        let cleaned = clean(text, &default_pipeline()).unwrap();
        let catalogue = catalogue_for(None);
        let tokens = tokenize(&cleaned.cleaned, &catalogue);
        let token = tokens
            .into_iter()
            .find(|t| t.kind == crate::patterns::TokenKind::Case)
            .expect("expected a case token");
        (token, cleaned.cleaned, cleaned.map)
    }

    #[test]
    fn simple_full_citation() {
        let text = "See Smith v. Doe, 500 F.2d 123 (9th Cir. 1974).";
        let (token, cleaned, map) = first_case_token(text);
        let lookahead_start = token.clean_end;
        let citation = extract_case(&token, &map, &cleaned, 2026, None, lookahead_start).unwrap();
        assert_eq!(citation.volume, "500");
        assert_eq!(citation.page.as_deref(), Some("123"));
        assert_eq!(citation.year, Some(1974));
        assert_eq!(citation.court.as_deref(), Some("9th Cir."));
        assert_eq!(citation.plaintiff.as_deref(), Some("Smith"));
        assert_eq!(citation.defendant.as_deref(), Some("Doe"));
        assert_eq!(citation.case_name.as_deref(), Some("Smith v. Doe"));
        assert!(citation.core.confidence >= 0.9);
    }

    #[test]
    fn historical_citation_is_rejected() {
        let text = "3 Edw. 1, ch. 29 (1297).";
        let cleaned = clean(text, &default_pipeline()).unwrap();
        let catalogue = catalogue_for(None);
        let tokens = tokenize(&cleaned.cleaned, &catalogue);
        for token in tokens.iter().filter(|t| t.kind == crate::patterns::TokenKind::Case) {
            let lookahead_start = token.clean_end;
            assert!(extract_case(token, &cleaned.map, &cleaned.cleaned, 2026, None, lookahead_start).is_none());
        }
    }

    #[test]
    fn blank_page_overrides_confidence() {
        let text = "500 F.2d ___ (1974).";
        let (token, cleaned, map) = first_case_token(text);
        let lookahead_start = token.clean_end;
        let citation = extract_case(&token, &map, &cleaned, 2026, None, lookahead_start).unwrap();
        assert!(citation.has_blank_page);
        assert_eq!(citation.core.confidence, 0.8);
    }

    #[test]
    fn party_normalization_strips_suffix_and_diacritics() {
        assert_eq!(normalize_party("Caf\u{00e9} Corp., et al."), "cafe");
    }
}
