//! # Document-Scoped Resolver
//!
//! ## Purpose
//! Links short-form citations (`Id.`, `Ibid.`, `Party, supra`, bare
//! `volume reporter at page`) to the full case citation they refer back to,
//! walking the document once in source order. Stateless at module scope:
//! every call builds its own history and discards it when it returns.

pub mod fuzzy;
pub mod scope;

use crate::extract::case::normalize_party;
use crate::{Citation, Resolution, ResolvedCitation, ResolutionOptions, Warning};

const SUPRA_MAX_CONFIDENCE_ON_AMBIGUITY: f32 = 0.8;
const SHORT_FORM_PINCITE_WINDOW: u32 = 150;

fn unresolved() -> Resolution {
    Resolution {
        resolved_to: None,
        failure_reason: None,
        confidence: None,
        warnings: Vec::new(),
    }
}

fn failed(reason: impl Into<String>, pos: Option<usize>, report: bool) -> Resolution {
    let reason = reason.into();
    let warnings = if report {
        vec![Warning::warning(reason.clone(), pos)]
    } else {
        Vec::new()
    };
    Resolution {
        resolved_to: None,
        failure_reason: Some(reason),
        confidence: None,
        warnings,
    }
}

/// `resolveCitations(citations[], options?) -> ResolvedCitation[]` (spec.md
/// §4.7). Walks `citations` once, left to right; `text` is the original
/// (uncleaned) input, used for scope boundary and section-heading checks.
pub fn resolve_citations(
    citations: &[Citation],
    text: &str,
    options: &ResolutionOptions,
) -> Vec<ResolvedCitation> {
    let mut full_case_history: Vec<usize> = Vec::new();
    let mut results: Vec<ResolvedCitation> = Vec::with_capacity(citations.len());

    for (i, citation) in citations.iter().enumerate() {
        let resolution = match citation {
            Citation::Case(_) => unresolved(),
            Citation::Id(id) => {
                resolve_id_or_ibid(citations, &results, text, options, i, id.pincite.as_deref())
            }
            Citation::Ibid(ibid) => {
                resolve_id_or_ibid(citations, &results, text, options, i, ibid.pincite.as_deref())
            }
            Citation::Supra(supra) => resolve_supra(
                citations,
                &full_case_history,
                options,
                &supra.party_name,
                supra.pincite.as_deref(),
            ),
            Citation::ShortFormCase(sf) => {
                resolve_short_form(citations, &full_case_history, options, &sf.volume, &sf.reporter)
            }
            _ => unresolved(),
        };

        if citation.is_case() {
            full_case_history.push(i);
        }
        results.push(ResolvedCitation {
            citation: citation.clone(),
            resolution,
        });
    }

    results
}

/// Finds the antecedent for an `Id.`/`Ibid.` reference at `ref_idx`: the
/// nearest preceding case citation, or — when `allowNestedResolution` is
/// set — the nearest preceding citation of any short-form kind that has
/// already resolved to one (its `resolvedTo` is always a case citation, by
/// construction, so one hop is sufficient; no recursion needed).
fn nearest_antecedent(
    citations: &[Citation],
    results: &[ResolvedCitation],
    ref_idx: usize,
    allow_nested: bool,
) -> Option<usize> {
    for j in (0..ref_idx).rev() {
        match &citations[j] {
            Citation::Case(_) => return Some(j),
            Citation::Id(_) | Citation::Ibid(_) | Citation::Supra(_) | Citation::ShortFormCase(_) => {
                if allow_nested {
                    return results[j].resolution.resolved_to;
                }
                continue;
            }
            _ => continue,
        }
    }
    None
}

fn resolve_id_or_ibid(
    citations: &[Citation],
    results: &[ResolvedCitation],
    text: &str,
    options: &ResolutionOptions,
    ref_idx: usize,
    pincite: Option<&str>,
) -> Resolution {
    let reference_pos = citations[ref_idx].span().original_start;

    let Some(antecedent_idx) = nearest_antecedent(citations, results, ref_idx, options.allow_nested_resolution)
    else {
        return failed("no preceding case citation", Some(reference_pos), options.report_unresolved);
    };
    let antecedent = citations[antecedent_idx].as_case().expect("antecedent is always a case citation");

    let (in_scope, scope_warning) = scope::in_scope(
        text,
        &options.paragraph_boundary_pattern,
        antecedent.core.span.original_start,
        reference_pos,
        options.scope_strategy,
    );
    if !in_scope {
        return failed(
            format!("antecedent outside {:?} scope", options.scope_strategy),
            Some(reference_pos),
            options.report_unresolved,
        );
    }

    let mut warnings: Vec<Warning> = scope_warning.into_iter().collect();
    if let (Some(pincite), Some(page)) = (pincite, antecedent.page.as_deref()) {
        if let (Ok(pincite_n), Ok(page_n)) = (pincite.parse::<u32>(), page.parse::<u32>()) {
            if pincite_n < page_n || pincite_n > page_n + SHORT_FORM_PINCITE_WINDOW {
                warnings.push(Warning::warning(
                    format!("pincite {} falls outside antecedent page range", pincite_n),
                    Some(reference_pos),
                ));
            }
        }
    }

    Resolution {
        resolved_to: Some(antecedent_idx),
        failure_reason: None,
        confidence: Some(1.0),
        warnings,
    }
}

fn resolve_supra(
    citations: &[Citation],
    full_case_history: &[usize],
    options: &ResolutionOptions,
    party_name: &str,
    _pincite: Option<&str>,
) -> Resolution {
    let reference_pos = 0; // supra carries no span lookup here beyond the failure message
    let threshold = options.party_match_threshold;

    let mut matches: Vec<(usize, f32)> = Vec::new();
    for &idx in full_case_history.iter().rev() {
        let case = citations[idx].as_case().expect("full_case_history holds only case indices");

        let defendant_sim = case
            .defendant
            .as_deref()
            .map(|d| fuzzy::party_similarity(party_name, d));
        let plaintiff_sim = case
            .plaintiff
            .as_deref()
            .map(|p| fuzzy::party_similarity(party_name, p));

        // Defendant-first (Bluebook convention) when both clear the threshold.
        let best = match (defendant_sim, plaintiff_sim) {
            (Some(d), Some(p)) if d >= threshold && p >= threshold => Some(d),
            (Some(d), _) if d >= threshold => Some(d),
            (_, Some(p)) if p >= threshold => Some(p),
            _ => None,
        };

        if let Some(sim) = best {
            matches.push((idx, sim));
        }
    }

    let Some(&(best_idx, best_sim)) = matches.first() else {
        return failed(
            "no matching party within document",
            Some(reference_pos),
            options.report_unresolved,
        );
    };

    let confidence = if matches.len() > 1 {
        best_sim.min(SUPRA_MAX_CONFIDENCE_ON_AMBIGUITY)
    } else {
        best_sim.clamp(0.0, 1.0)
    };

    let mut warnings = Vec::new();
    if matches.len() > 1 {
        warnings.push(Warning::info(
            format!("{} candidate antecedents matched \"{}\"", matches.len(), normalize_party(party_name)),
            Some(reference_pos),
        ));
    }

    Resolution {
        resolved_to: Some(best_idx),
        failure_reason: None,
        confidence: Some(confidence),
        warnings,
    }
}

fn resolve_short_form(
    citations: &[Citation],
    full_case_history: &[usize],
    options: &ResolutionOptions,
    volume: &str,
    reporter: &str,
) -> Resolution {
    use crate::extract::case::normalize_reporter_for_lookup;

    let normalized_reporter = normalize_reporter_for_lookup(reporter);
    let matches: Vec<usize> = full_case_history
        .iter()
        .rev()
        .copied()
        .filter(|&idx| {
            let case = citations[idx].as_case().expect("full_case_history holds only case indices");
            case.volume == volume && normalize_reporter_for_lookup(&case.reporter) == normalized_reporter
        })
        .collect();

    let Some(&best_idx) = matches.first() else {
        return failed("no matching volume/reporter within document", None, options.report_unresolved);
    };

    let (confidence, warnings) = if matches.len() > 1 {
        (0.7, vec![Warning::info(
            format!("{} candidate antecedents matched {} {}", matches.len(), volume, reporter),
            None,
        )])
    } else {
        (0.95, Vec::new())
    };

    Resolution {
        resolved_to: Some(best_idx),
        failure_reason: None,
        confidence: Some(confidence),
        warnings,
    }
}
