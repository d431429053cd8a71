//! Analysis pipeline performance benchmarks.
//!
//! Measures the rule-based detector, the response sanitizer, and the full
//! upload path with a mock generator.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use assay::{Assay, AssayConfig, Identity, MockProvider, Parser, RuleDetector, Sanitizer};

/// Generate a customer table with some nulls, repeats and outliers.
fn generate_customer_data(rows: usize) -> String {
    let cities = ["Boston", "boston", "N.Y.", "New York", "Chicago", "NA"];
    let mut data = String::from("customer_id,city,age,spend,segment\n");

    for row in 0..rows {
        let age = if row % 97 == 0 { 240 } else { 20 + (row % 50) };
        let spend = if row % 13 == 0 { String::new() } else { format!("{:.2}", 10.0 + row as f64 * 0.75) };
        data.push_str(&format!(
            "{},{},{},{},{}\n",
            row % (rows - rows / 20).max(1),
            cities[row % cities.len()],
            age,
            spend,
            if row % 2 == 0 { "retail" } else { "wholesale" },
        ));
    }

    data
}

/// Raw model output of `entries` suggestions, fenced and truncated.
fn generate_model_output(entries: usize) -> String {
    let mut out = String::from("Here are the fixes:\n```json\n[");
    for i in 0..entries {
        out.push_str(&format!(
            r#"{{"column":"city","original":"N.Y. {i}","fix":"New York {i}","confidence":0.{}}},"#,
            i % 10
        ));
    }
    out.push_str(r#"{"column":"city","orig"#);
    out
}

fn bench_detector(c: &mut Criterion) {
    let mut group = c.benchmark_group("detector");

    for rows in [20, 100, 500, 10_000].iter() {
        let data = generate_customer_data(*rows);
        let (table, _) = Parser::new().parse_bytes("bench.csv", data.as_bytes()).unwrap();

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            let detector = RuleDetector::new();
            b.iter(|| black_box(detector.detect(table)))
        });
    }

    group.finish();
}

fn bench_sanitizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("sanitizer");
    let sanitizer = Sanitizer::new();

    for entries in [1, 5, 50].iter() {
        let raw = generate_model_output(*entries);

        group.throughput(Throughput::Bytes(raw.len() as u64));
        group.bench_with_input(BenchmarkId::new("truncated_entries", entries), &raw, |b, raw| {
            b.iter(|| black_box(sanitizer.run(raw)))
        });
    }

    group.bench_function("garbage", |b| {
        let raw = "I'm sorry, I can't help with that. {[}".repeat(20);
        b.iter(|| black_box(sanitizer.run(&raw)))
    });

    group.finish();
}

fn bench_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_analysis");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let identity = Identity::new("bench");

    for rows in [20, 100, 500].iter() {
        let data = generate_customer_data(*rows);
        let assay = Assay::with_config(AssayConfig::default())
            .with_generator(Arc::new(MockProvider::with_response(generate_model_output(5))));

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("mock_rows", rows), &data, |b, data| {
            b.iter(|| {
                runtime.block_on(async {
                    black_box(
                        assay
                            .analyze_bytes("bench.csv", data.as_bytes(), &identity)
                            .await
                            .unwrap(),
                    )
                })
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detector, bench_sanitizer, bench_full_analysis);
criterion_main!(benches);
