//! # Scope Engine
//!
//! Paragraph/section/footnote/none boundary checks used by Id./Ibid.
//! resolution to decide whether an antecedent lies close enough to its
//! reference to resolve against it.

use crate::patterns::{catalogue_for, PatternId};
use crate::{ScopeStrategy, Warning};
use regex::Regex;

/// Paragraph index containing byte offset `pos`, counting the boundary
/// matches of `boundary` that end at or before `pos`.
fn paragraph_index(text: &str, boundary: &Regex, pos: usize) -> usize {
    boundary.find_iter(text).take_while(|m| m.end() <= pos).count()
}

/// The nearest `Section N` / `§ N` heading at or before `pos`, or `None` if
/// no heading precedes it.
fn section_heading_before(text: &str, pos: usize) -> Option<String> {
    let catalogue = catalogue_for(Some(&[PatternId::SectionHeading]));
    let pattern = catalogue.first()?;
    pattern
        .regex
        .find_iter(text)
        .take_while(|m| m.start() <= pos)
        .last()
        .map(|m| m.as_str().trim().to_string())
}

/// Returns whether `reference_pos` may resolve against `antecedent_pos`
/// under `strategy`, plus a degradation warning when `footnote` falls back
/// to `none` for lack of caller-supplied footnote metadata.
pub fn in_scope(
    text: &str,
    boundary: &Regex,
    antecedent_pos: usize,
    reference_pos: usize,
    strategy: ScopeStrategy,
) -> (bool, Option<Warning>) {
    match strategy {
        ScopeStrategy::None => (true, None),
        ScopeStrategy::Paragraph => {
            let same = paragraph_index(text, boundary, antecedent_pos)
                == paragraph_index(text, boundary, reference_pos);
            (same, None)
        }
        ScopeStrategy::Section => {
            let same = section_heading_before(text, antecedent_pos) == section_heading_before(text, reference_pos);
            (same, None)
        }
        ScopeStrategy::Footnote => {
            let warning = Warning::warning(
                "footnote scope requires caller-supplied footnote metadata; degraded to no scope limit",
                Some(reference_pos),
            );
            (true, Some(warning))
        }
    }
}
