use citation_extractor::{extract, resolve::resolve_citations, Citation, ExtractOptions, ResolutionOptions};

fn case_citations(text: &str) -> Vec<citation_extractor::CaseCitation> {
    let citations = citation_extractor::extract_citations(text, &ExtractOptions::default()).unwrap();
    citations.into_iter().filter_map(|c| c.as_case().cloned()).collect()
}

#[test]
fn simple_full_citation() {
    let text = "See Smith v. Doe, 500 F.2d 123 (9th Cir. 1974).";
    let cases = case_citations(text);
    assert_eq!(cases.len(), 1);
    let c = &cases[0];
    assert_eq!(c.volume, "500");
    assert_eq!(c.reporter, "F.2d");
    assert_eq!(c.page.as_deref(), Some("123"));
    assert_eq!(c.court.as_deref(), Some("9th Cir."));
    assert_eq!(c.year, Some(1974));
    assert_eq!(c.plaintiff.as_deref(), Some("Smith"));
    assert_eq!(c.defendant.as_deref(), Some("Doe"));
    assert_eq!(c.case_name.as_deref(), Some("Smith v. Doe"));
    assert!(c.core.confidence >= 0.9);
}

#[test]
fn parallel_group() {
    let text = "Roe v. Wade, 410 U.S. 113, 93 S. Ct. 705, 35 L. Ed. 2d 147 (1973).";
    let cases = case_citations(text);
    assert_eq!(cases.len(), 3);
    assert!(cases.iter().all(|c| c.group_id.as_deref() == Some("410-U.S.-113")));
    assert!(cases.iter().all(|c| c.year == Some(1973)));

    let primary = cases.iter().find(|c| !c.parallel_citations.is_empty()).expect("primary carries the parallel refs");
    assert_eq!(primary.parallel_citations[0].volume, "93");
    assert_eq!(primary.parallel_citations[0].reporter, "S. Ct.");
    assert_eq!(primary.parallel_citations[0].page, "705");
    assert_eq!(primary.parallel_citations[1].volume, "35");
    assert_eq!(primary.parallel_citations[1].reporter, "L. Ed. 2d");
    assert_eq!(primary.parallel_citations[1].page, "147");
}

#[test]
fn id_within_scope_resolves() {
    let text = "Smith v. Doe, 500 F.2d 123 (1974). Id. at 125.";
    let outcome = extract(text, &ExtractOptions { resolve: true, ..Default::default() }).unwrap();
    let resolved = outcome.resolved.unwrap();
    assert_eq!(resolved.len(), 2);

    let id = resolved.iter().find(|r| matches!(r.citation, Citation::Id(_))).unwrap();
    assert_eq!(id.resolution.resolved_to, Some(0));
    assert_eq!(id.resolution.confidence, Some(1.0));
    let Citation::Id(id_citation) = &id.citation else { panic!("expected an id citation") };
    assert_eq!(id_citation.pincite.as_deref(), Some("125"));
}

#[test]
fn id_across_paragraph_is_unresolved() {
    let text = "Smith v. Doe, 500 F.2d 123 (1974).\n\nId. at 125.";
    let citations = citation_extractor::extract_citations(text, &ExtractOptions::default()).unwrap();
    let resolved = resolve_citations(&citations, text, &ResolutionOptions::default());

    let id = resolved.iter().find(|r| matches!(r.citation, Citation::Id(_))).unwrap();
    assert!(id.resolution.resolved_to.is_none());
    assert!(id.resolution.failure_reason.as_deref().unwrap().contains("scope"));
}

#[test]
fn supra_resolves_via_fuzzy_plaintiff_match() {
    let text = "Smith v. Jones, 100 F.3d 50 (2000). The parties then briefed the merits. See Smith, supra, at 55.";
    let outcome = extract(text, &ExtractOptions { resolve: true, ..Default::default() }).unwrap();
    let resolved = outcome.resolved.unwrap();

    let supra = resolved.iter().find(|r| matches!(r.citation, Citation::Supra(_))).unwrap();
    assert_eq!(supra.resolution.resolved_to, Some(0));
    assert_eq!(supra.resolution.confidence, Some(1.0));
    let Citation::Supra(supra_citation) = &supra.citation else { panic!("expected a supra citation") };
    assert_eq!(supra_citation.pincite.as_deref(), Some("55"));
}

#[test]
fn historical_false_positive_yields_no_citations() {
    let text = "3 Edw. 1, ch. 29 (1297).";
    let citations = citation_extractor::extract_citations(text, &ExtractOptions::default()).unwrap();
    assert!(citations.is_empty());
}
