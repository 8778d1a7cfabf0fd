//! # Text Cleaner
//!
//! ## Purpose
//! Normalizes raw legal text while maintaining a bidirectional map between
//! cleaned and original byte offsets, so every later pipeline stage can
//! translate a match in the cleaned text back to a span in the caller's
//! original input.
//!
//! ## Key Features
//! - Ordered, pure, idempotent transformations (`CleanerKind`)
//! - A bounded-lookahead aligner that rebuilds the offset map after each step
//! - A length-preserving fast path that skips realignment entirely for
//!   cleaners that only substitute characters one-for-one

use crate::errors::{CitationError, Result};
use crate::Warning;
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

/// Maximum lookahead (in bytes) the aligner scans when `before` and `after`
/// diverge, per the position-map rebuild algorithm.
const LOOKAHEAD_WINDOW: usize = 20;

/// Above this input size, length-preserving cleaners skip the generic
/// aligner entirely and reuse the identity map, since their output is
/// trivially in lockstep with their input.
pub const LARGE_INPUT_THRESHOLD: usize = 500 * 1024;

/// One ordered, pure text transformation in the cleaning pipeline.
#[derive(Clone)]
pub enum CleanerKind {
    StripHtmlTags,
    DecodeHtmlEntities,
    NormalizeWhitespace,
    NormalizeUnicode,
    FixSmartQuotes,
    NormalizeDashes,
    RemoveOcrArtifacts,
    /// A caller-supplied transformation. Must be total (never panic) —
    /// a custom cleaner that returns `Err` aborts the whole clean with no
    /// partial result, matching the built-ins' failure contract.
    Custom {
        name: String,
        apply: Arc<dyn Fn(&str) -> std::result::Result<String, String> + Send + Sync>,
    },
}

impl std::fmt::Debug for CleanerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanerKind::StripHtmlTags => write!(f, "StripHtmlTags"),
            CleanerKind::DecodeHtmlEntities => write!(f, "DecodeHtmlEntities"),
            CleanerKind::NormalizeWhitespace => write!(f, "NormalizeWhitespace"),
            CleanerKind::NormalizeUnicode => write!(f, "NormalizeUnicode"),
            CleanerKind::FixSmartQuotes => write!(f, "FixSmartQuotes"),
            CleanerKind::NormalizeDashes => write!(f, "NormalizeDashes"),
            CleanerKind::RemoveOcrArtifacts => write!(f, "RemoveOcrArtifacts"),
            CleanerKind::Custom { name, .. } => write!(f, "Custom({})", name),
        }
    }
}

impl CleanerKind {
    fn name(&self) -> &str {
        match self {
            CleanerKind::StripHtmlTags => "stripHtmlTags",
            CleanerKind::DecodeHtmlEntities => "decodeHtmlEntities",
            CleanerKind::NormalizeWhitespace => "normalizeWhitespace",
            CleanerKind::NormalizeUnicode => "normalizeUnicode",
            CleanerKind::FixSmartQuotes => "fixSmartQuotes",
            CleanerKind::NormalizeDashes => "normalizeDashes",
            CleanerKind::RemoveOcrArtifacts => "removeOcrArtifacts",
            CleanerKind::Custom { name, .. } => name.as_str(),
        }
    }

    /// Cleaners that only ever substitute one character for another of the
    /// same byte length never shift any later offset, so the identity map
    /// can be reused verbatim instead of re-running the aligner.
    fn is_length_preserving(&self) -> bool {
        matches!(
            self,
            CleanerKind::FixSmartQuotes | CleanerKind::NormalizeDashes
        )
    }

    fn apply(&self, text: &str) -> std::result::Result<String, String> {
        match self {
            CleanerKind::StripHtmlTags => Ok(strip_html_tags(text)),
            CleanerKind::DecodeHtmlEntities => Ok(decode_html_entities(text)),
            CleanerKind::NormalizeWhitespace => Ok(normalize_whitespace(text)),
            CleanerKind::NormalizeUnicode => Ok(text.nfkc().collect()),
            CleanerKind::FixSmartQuotes => Ok(fix_smart_quotes(text)),
            CleanerKind::NormalizeDashes => Ok(normalize_dashes(text)),
            CleanerKind::RemoveOcrArtifacts => Ok(remove_ocr_artifacts(text)),
            CleanerKind::Custom { apply, .. } => apply(text),
        }
    }
}

/// The default cleaning pipeline applied when the caller supplies none.
pub fn default_pipeline() -> Vec<CleanerKind> {
    vec![
        CleanerKind::StripHtmlTags,
        CleanerKind::NormalizeWhitespace,
        CleanerKind::NormalizeUnicode,
        CleanerKind::FixSmartQuotes,
    ]
}

/// Bidirectional offset map between cleaned and original text. Dense
/// parallel-array representation: `O(1)` lookups in both directions, built
/// once during cleaning and discarded at the end of extraction.
#[derive(Debug, Clone)]
pub struct TransformationMap {
    clean_to_original: Vec<usize>,
    original_to_clean: Vec<usize>,
}

impl TransformationMap {
    fn identity(len: usize) -> Self {
        let table: Vec<usize> = (0..=len).collect();
        Self {
            clean_to_original: table.clone(),
            original_to_clean: table,
        }
    }

    /// Translate a cleaned-text offset to the original text. Falls back to
    /// the clean offset itself if the map holds no entry for it.
    pub fn clean_to_original(&self, offset: usize) -> usize {
        self.clean_to_original
            .get(offset)
            .copied()
            .unwrap_or(offset)
    }

    /// Translate an original-text offset to the cleaned text.
    pub fn original_to_clean(&self, offset: usize) -> usize {
        self.original_to_clean
            .get(offset)
            .copied()
            .unwrap_or(offset)
    }

    fn from_clean_to_original(clean_to_original: Vec<usize>, original_len: usize) -> Self {
        let original_to_clean = invert(&clean_to_original, original_len);
        Self {
            clean_to_original,
            original_to_clean,
        }
    }
}

/// Invert a monotonic-ish `clean -> original` table into `original -> clean`,
/// filling offsets the forward table skipped (deleted regions) with the
/// nearest preceding mapped clean offset, per the cleaner's conservative
/// end-of-string rule extended to interior gaps.
fn invert(clean_to_original: &[usize], original_len: usize) -> Vec<usize> {
    let mut table = vec![usize::MAX; original_len + 1];
    for (clean_offset, &orig_offset) in clean_to_original.iter().enumerate() {
        if orig_offset <= original_len && table[orig_offset] == usize::MAX {
            table[orig_offset] = clean_offset;
        }
    }
    let mut last = 0;
    for slot in table.iter_mut() {
        if *slot == usize::MAX {
            *slot = last;
        } else {
            last = *slot;
        }
    }
    table
}

/// Result of running the cleaning pipeline.
#[derive(Debug, Clone)]
pub struct CleanResult {
    pub cleaned: String,
    pub map: TransformationMap,
    pub warnings: Vec<Warning>,
}

/// `clean(text, cleaners) -> {cleaned, map, warnings}`. Applies each
/// cleaner in order, rebuilding the offset map after every step. Fatal if
/// any cleaner fails; no partial cleaning is ever returned.
pub fn clean(text: &str, cleaners: &[CleanerKind]) -> Result<CleanResult> {
    let mut current = text.to_string();
    let mut map = TransformationMap::identity(text.len());
    let mut warnings = Vec::new();
    let large_input = text.len() > LARGE_INPUT_THRESHOLD;

    for cleaner in cleaners {
        let before = current;
        let after = cleaner.apply(&before).map_err(|details| CitationError::CleanerFailed {
            cleaner: cleaner.name().to_string(),
            details,
        })?;

        if large_input && cleaner.is_length_preserving() && after.len() == before.len() {
            // Character-for-character substitution: no offset shifts, so
            // the existing map is still valid verbatim.
            warnings.push(Warning::info(
                format!("{}: skipped realignment (length-preserving)", cleaner.name()),
                None,
            ));
        } else {
            let before_to_original: Vec<usize> = (0..=before.len())
                .map(|i| map.clean_to_original(i))
                .collect();
            let after_to_original = realign(before.as_bytes(), after.as_bytes(), &before_to_original);
            map = TransformationMap::from_clean_to_original(after_to_original, text.len());
        }

        current = after;
    }

    Ok(CleanResult {
        cleaned: current,
        map,
        warnings,
    })
}

/// Bounded-lookahead aligner: walks `before` and `after` in lockstep,
/// inheriting the existing mapping on exact matches and scanning up to
/// [`LOOKAHEAD_WINDOW`] bytes ahead to classify a divergence as a deletion,
/// insertion, or substitution.
fn realign(before: &[u8], after: &[u8], before_to_original: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(after.len() + 1);
    let mut i = 0usize;
    let mut j = 0usize;
    let last_original = *before_to_original.last().unwrap_or(&0);

    while j < after.len() {
        if i < before.len() && before[i] == after[j] {
            out.push(before_to_original.get(i).copied().unwrap_or(last_original));
            i += 1;
            j += 1;
            continue;
        }

        let mut resolved = false;
        for k in 1..=LOOKAHEAD_WINDOW {
            if i + k <= before.len() && before[i + k..].first() == after[j..].first() {
                // `before` has k extra bytes here: treat as deletion.
                i += k;
                resolved = true;
                break;
            }
            if j + k <= after.len() && after.get(j + k) == before.get(i) {
                // `after` has k extra bytes here: treat as insertion,
                // inheriting the mapping at the current `before` position.
                let origin = before_to_original.get(i).copied().unwrap_or(last_original);
                for _ in 0..k {
                    out.push(origin);
                    j += 1;
                }
                resolved = true;
                break;
            }
        }

        if !resolved {
            // Substitution: advance both sides, inherit the mapping from
            // the current `before` position.
            out.push(before_to_original.get(i).copied().unwrap_or(last_original));
            i = (i + 1).min(before.len());
            j += 1;
        }
    }

    out.push(before_to_original.get(i).copied().unwrap_or(last_original));
    out
}

fn strip_html_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn decode_html_entities(text: &str) -> String {
    let named: &[(&str, &str)] = &[
        ("&amp;", "&"),
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&apos;", "'"),
        ("&nbsp;", " "),
        ("&sect;", "\u{00A7}"),
        ("&para;", "\u{00B6}"),
        ("&ndash;", "\u{2013}"),
        ("&mdash;", "\u{2014}"),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'outer: while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        if let Some(semi) = tail.find(';') {
            let entity = &tail[..=semi];
            for (name, replacement) in named {
                if entity.eq_ignore_ascii_case(name) {
                    out.push_str(replacement);
                    rest = &tail[semi + 1..];
                    continue 'outer;
                }
            }
            if let Some(numeric) = decode_numeric_entity(entity) {
                out.push(numeric);
                rest = &tail[semi + 1..];
                continue 'outer;
            }
        }
        out.push('&');
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let body = entity.strip_prefix('&')?.strip_suffix(';')?;
    let body = body.strip_prefix('#')?;
    let code = if let Some(hex) = body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        body.parse::<u32>().ok()?
    };
    char::from_u32(code)
}

fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_was_space = false;
    for ch in text.chars() {
        let is_ws = matches!(ch, '\t' | '\n' | '\r' | ' ');
        if is_ws {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out
}

fn fix_smart_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201B}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201F}' => '"',
            other => other,
        })
        .collect()
}

fn normalize_dashes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' | '\u{2012}' | '\u{2015}' => '-',
            other => other,
        })
        .collect()
}

fn remove_ocr_artifacts(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for ch in text.chars() {
        if ch == '_' {
            run += 1;
        } else {
            if run > 0 && run < 3 {
                out.extend(std::iter::repeat('_').take(run));
            }
            run = 0;
            out.push(ch);
        }
    }
    if run > 0 && run < 3 {
        out.extend(std::iter::repeat('_').take(run));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_html_removes_tags_only() {
        assert_eq!(strip_html_tags("a <b>bold</b> c"), "a bold c");
    }

    #[test]
    fn decode_entities_handles_named_and_numeric() {
        assert_eq!(decode_html_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_html_entities("&#167; 1983"), "\u{00A7} 1983");
        assert_eq!(decode_html_entities("&#x00A7; 1983"), "\u{00A7} 1983");
    }

    #[test]
    fn normalize_whitespace_collapses_runs() {
        assert_eq!(normalize_whitespace("a\n\n  b\t c"), "a b c");
    }

    #[test]
    fn position_roundtrip_on_pure_substring_preserve() {
        let text = "Smith v. Doe, 500 F.2d 123 (1974).";
        let result = clean(text, &default_pipeline()).unwrap();
        // "500" survives the default pipeline unchanged; its original
        // offset must round-trip through both directions of the map.
        let original_pos = text.find("500").unwrap();
        let clean_pos = result.map.original_to_clean(original_pos);
        assert_eq!(result.map.clean_to_original(clean_pos), original_pos);
    }

    #[test]
    fn cleaning_is_idempotent_under_default_pipeline() {
        let text = "  Smith   v.  Doe <i>500</i> F.2d  123 (1974).  ";
        let once = clean(text, &default_pipeline()).unwrap();
        let twice = clean(&once.cleaned, &default_pipeline()).unwrap();
        assert_eq!(once.cleaned, twice.cleaned);
    }

    #[test]
    fn custom_cleaner_error_is_fatal() {
        let cleaners = vec![CleanerKind::Custom {
            name: "boom".into(),
            apply: Arc::new(|_| Err("exploded".to_string())),
        }];
        let err = clean("text", &cleaners).unwrap_err();
        assert_eq!(err.category(), "cleaning");
    }

    #[test]
    fn large_input_skips_realignment_for_length_preserving_cleaners() {
        let body = "a".repeat(LARGE_INPUT_THRESHOLD + 10);
        let text = format!("{}\u{2019}", body);
        let result = clean(&text, &[CleanerKind::FixSmartQuotes]).unwrap();
        assert!(result.warnings.iter().any(|w| w.message.contains("skipped realignment")));
        assert!(result.cleaned.ends_with('\''));
    }
}
