//! # Parallel-Group Detector
//!
//! ## Purpose
//! Links comma-separated case citations that share a single trailing
//! parenthetical into a parallel-citation group (e.g. the U.S., S. Ct.,
//! and L. Ed. 2d reporters for the same Supreme Court decision).
//!
//! ## Algorithm
//! For each case token, examine its immediate successor: both must be
//! `case` tokens, the gap between them must be whitespace-and-comma only
//! (`^\s*,\s*$`), contain no closing parenthesis, and span no more than 30
//! characters. Chains extend transitively, so three-way parallel cites
//! link naturally. Semicolons are never treated as a parallel separator.

use crate::patterns::TokenKind;
use crate::tokenizer::Token;
use std::collections::HashMap;

/// Maximum gap (in cleaned-text characters) between two case tokens for
/// them to be considered parallel.
const MAX_GAP: usize = 30;

/// Maps the index of a primary citation token to the ordered indices of
/// its secondary (parallel) citation tokens.
pub type ParallelGroups = HashMap<usize, Vec<usize>>;

/// `detectParallel(tokens, cleaned) -> Map<primaryIndex, secondaryIndex[]>`.
pub fn detect_parallel(tokens: &[Token], cleaned: &str) -> ParallelGroups {
    let mut groups: ParallelGroups = HashMap::new();
    let mut absorbed: Vec<bool> = vec![false; tokens.len()];

    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind != TokenKind::Case || absorbed[i] {
            i += 1;
            continue;
        }

        let mut secondaries = Vec::new();
        let mut current = i;
        loop {
            let Some(next) = tokens.get(current + 1) else {
                break;
            };
            if next.kind != TokenKind::Case {
                break;
            }
            if !gap_allows_parallel(cleaned, tokens[current].clean_end, next.clean_start) {
                break;
            }
            secondaries.push(current + 1);
            absorbed[current + 1] = true;
            current += 1;
        }

        if !secondaries.is_empty() {
            groups.insert(i, secondaries);
        }
        i += 1;
    }

    groups
}

fn gap_allows_parallel(cleaned: &str, end: usize, start: usize) -> bool {
    if start < end || start - end > MAX_GAP {
        return false;
    }
    let Some(gap) = cleaned.get(end..start) else {
        return false;
    };
    if gap.contains(')') {
        return false;
    }
    let trimmed = gap.trim();
    trimmed == "," && gap.chars().all(|c| c == ',' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{catalogue_for, PatternId};
    use crate::tokenizer::tokenize;

    #[test]
    fn links_three_way_parallel_group() {
        let catalogue = catalogue_for(None);
        let text = "410 U.S. 113, 93 S. Ct. 705, 35 L. Ed. 2d 147 (1973)";
        let tokens = tokenize(text, &catalogue);
        let case_tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| t.kind == TokenKind::Case)
            .collect();
        let groups = detect_parallel(&case_tokens, text);
        assert_eq!(groups.len(), 1);
        let secondaries = groups.values().next().unwrap();
        assert_eq!(secondaries.len(), 2);
    }

    #[test]
    fn does_not_link_across_separate_parentheticals() {
        let catalogue = catalogue_for(None);
        let text = "500 F.2d 1 (1970), 501 F.2d 2 (1971)";
        let tokens: Vec<Token> = tokenize(text, &catalogue)
            .into_iter()
            .filter(|t| t.kind == TokenKind::Case)
            .collect();
        let groups = detect_parallel(&tokens, text);
        assert!(groups.is_empty());
    }

    #[test]
    fn semicolons_never_link() {
        let catalogue = catalogue_for(None);
        let text = "500 F.2d 1; 501 F.2d 2";
        let tokens: Vec<Token> = tokenize(text, &catalogue)
            .into_iter()
            .filter(|t| t.kind == TokenKind::Case)
            .collect();
        let groups = detect_parallel(&tokens, text);
        assert!(groups.is_empty());
        // Also confirm PatternId stays distinguishable across both tokens.
        assert_eq!(tokens[0].pattern_id, PatternId::FederalReporter);
    }
}
