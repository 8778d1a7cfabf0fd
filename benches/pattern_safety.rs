// Benchmarks each cataloged pattern against its adversarial smoke-test
// corpus, guarding the 100ms-per-pattern-per-10KB-input bound.

use citation_extractor::patterns::catalogue_for;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn adversarial_inputs() -> Vec<(&'static str, String)> {
    vec![
        ("long_digit_run", "9".repeat(10_000)),
        ("unmatched_parens", "(".repeat(10_000)),
        ("repeated_section_marks", "\u{00A7}".repeat(10_000)),
        ("dense_citation_lookalikes", "123 U.S. 456 ".repeat(700)),
    ]
}

fn pattern_catalogue_benchmark(c: &mut Criterion) {
    let catalogue = catalogue_for(None);
    let inputs = adversarial_inputs();

    let mut group = c.benchmark_group("pattern_catalogue");
    for pattern in &catalogue {
        for (label, input) in &inputs {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", pattern.id), label),
                input,
                |b, input| {
                    b.iter(|| pattern.regex.find(black_box(input)));
                },
            );
        }
    }
    group.finish();
}

fn smoke_corpus_benchmark(c: &mut Criterion) {
    let catalogue = catalogue_for(None);

    let mut group = c.benchmark_group("smoke_test_corpus");
    for pattern in &catalogue {
        for probe in pattern.smoke_test_corpus {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", pattern.id), probe.len()),
                probe,
                |b, probe| {
                    b.iter(|| pattern.regex.find(black_box(probe)));
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, pattern_catalogue_benchmark, smoke_corpus_benchmark);
criterion_main!(benches);
