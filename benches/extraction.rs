// End-to-end extraction benchmark, guarding the "10KB legal document within
// 100ms on commodity hardware" bound across a range of document sizes.

use citation_extractor::{extract_citations, ExtractOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_document(num_citations: usize) -> String {
    let mut text = String::from("This opinion addresses several matters of first impression. ");
    for i in 0..num_citations {
        text.push_str(&format!(
            "See Smith v. Defendant{i}, {vol} F.2d {page} ({year} Cir. {year}). \
             The court in Id. at {pincite} held that the statute, 42 U.S.C. \u{00A7} {section}, controls. ",
            i = i,
            vol = 100 + i,
            page = 200 + i * 3,
            year = 1970 + (i % 50),
            pincite = 201 + i,
            section = 1983 + i,
        ));
    }
    text.push_str("The judgment below is affirmed.");
    text
}

fn end_to_end_extraction_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end_extraction");
    for num_citations in [5, 25, 100, 400].iter() {
        let text = generate_document(*num_citations);
        group.bench_with_input(
            BenchmarkId::new("extract_citations", format!("{}_bytes", text.len())),
            &text,
            |b, text| {
                b.iter(|| extract_citations(black_box(text), &ExtractOptions::default()));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, end_to_end_extraction_benchmark);
criterion_main!(benches);
