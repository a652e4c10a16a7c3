//! Decode, parse, and evaluate benchmarks for jsonq-core
//!
//! Measures each stage separately over a synthetic document so regressions
//! can be pinned to the decoder, the expression parser, or the evaluator.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use jsonq_core::{decode, encode, evaluate, parse_expression, Map, Value};

/// Build `{"items": [{"id": 0, "name": "item-0", "tags": [..]}, ...]}`.
fn sample_document(items: usize) -> String {
    let rows: Vec<Value> = (0..items)
        .map(|i| {
            let mut row = Map::new();
            row.insert("id".to_string(), Value::from(i as f64));
            row.insert("name".to_string(), Value::from(format!("item-{i}")));
            row.insert(
                "tags".to_string(),
                Value::Array(vec![Value::from("a"), Value::from("b\n"), Value::Null]),
            );
            row.insert("score".to_string(), Value::from(i as f64 * 0.25));
            Value::Object(row)
        })
        .collect();
    let mut root = Map::new();
    root.insert("items".to_string(), Value::Array(rows));
    encode(&Value::Object(root))
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for items in [10usize, 100, 1000] {
        let text = sample_document(items);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(items), &text, |b, text| {
            b.iter(|| black_box(decode(black_box(text)).unwrap()))
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let doc = decode(&sample_document(1000)).unwrap();
    c.bench_function("encode_1000_items", |b| b.iter(|| black_box(encode(black_box(&doc)))));
}

fn bench_parse_expression(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_expression");
    for text in [
        "items[3].name",
        "max(items[0].score, items[1].score, items[2].score, 15)",
        "size(items[items[2].id].tags)",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(text), text, |b, text| {
            b.iter(|| black_box(parse_expression(black_box(text)).unwrap()))
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let doc = decode(&sample_document(1000)).unwrap();
    let mut group = c.benchmark_group("evaluate");
    for text in [
        "items[999].name",
        "max(items[0].score, items[500].score, items[999].score)",
        "size(items)",
    ] {
        let ast = parse_expression(text).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(text), &ast, |b, ast| {
            b.iter(|| black_box(evaluate(black_box(ast), &doc).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_decode,
    bench_encode,
    bench_parse_expression,
    bench_evaluate
);
criterion_main!(benches);
