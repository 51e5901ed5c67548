use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use stagelex::grammar::LanguageProfile;
use stagelex::lexical::{normalize_whitespace, scan_literals, strip_comments};
use stagelex::pipeline::process_source;

fn sample_source() -> String {
    let snippet = r#"
// Accumulate squares of the odd entries
#include <vector>
static int accumulate(const std::vector<int>& values) {
    int total = 0; /* running sum */
    for (auto v : values) {
        if (v % 2 != 0) { total += v * v; }
    }
    const char* label = "total // not a comment";
    float scale = 1.5e3f; unsigned mask = 0xFFu;
    return total >>= 1;
}
"#;
    snippet.repeat(256)
}

fn bench_pipeline(c: &mut Criterion) {
    let source = sample_source();
    let profile = LanguageProfile::cpp();

    let mut group = c.benchmark_group("pipeline_throughput");
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("all_stages", |b| {
        b.iter(|| black_box(process_source(black_box(&source), &profile)))
    });

    let stripped = strip_comments(&source).text;
    group.bench_function("strip_comments", |b| {
        b.iter(|| black_box(strip_comments(black_box(&source))))
    });

    let normalized = normalize_whitespace(&stripped).text;
    group.bench_function("scan_literals", |b| {
        b.iter(|| black_box(scan_literals(black_box(&normalized))))
    });

    group.finish();
}

criterion_group!(pipeline_throughput, bench_pipeline);
criterion_main!(pipeline_throughput);
