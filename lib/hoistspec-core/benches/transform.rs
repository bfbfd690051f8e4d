use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hoistspec_core::{EMBEDDED_ARRAY_OBJECT_SEARCH, Node, Query, RESPONSE_SEARCH, transform};
use serde_json::json;
use std::hint::black_box;

/// A document with `endpoints` operations, each with an inline request body and
/// inline responses sharing nested objects.
fn generate_document(endpoints: usize) -> Node {
    let mut paths = serde_json::Map::new();
    for index in 0..endpoints {
        let item = json!({
            "type": "object",
            "properties": {"label": {"type": "string"}, "rank": {"type": "integer"}}
        });
        let schema = json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "owner": {"type": "object", "properties": {"name": {"type": "string"}}},
                "items": {"type": "array", "items": item}
            }
        });
        let body = json!({"content": {"application/json": {"schema": schema}}});
        let error = json!({"content": {"application/json": {"schema": {
            "type": "object",
            "properties": {"message": {"type": "string"}, "code": {"type": "integer"}}
        }}}});
        paths.insert(
            format!("/v1/resource-{index}"),
            json!({
                "post": {
                    "requestBody": body,
                    "responses": {"201": body, "400": error}
                }
            }),
        );
    }

    serde_json::from_value(json!({"openapi": "3.0.3", "paths": paths}))
        .unwrap_or_else(|error| panic!("invalid generated document: {error}"))
}

fn benchmark_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");

    for endpoints in [10, 100, 500] {
        let document = generate_document(endpoints);
        let responses = Query::from(RESPONSE_SEARCH);
        let embedded = Query::from(EMBEDDED_ARRAY_OBJECT_SEARCH);

        group.bench_with_input(
            BenchmarkId::new("responses", endpoints),
            &document,
            |b, document| b.iter(|| black_box(document.find(black_box(&responses)))),
        );
        group.bench_with_input(
            BenchmarkId::new("embedded_array_objects", endpoints),
            &document,
            |b, document| b.iter(|| black_box(document.find(black_box(&embedded)))),
        );
    }

    group.finish();
}

fn benchmark_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    for endpoints in [10, 100, 500] {
        let document = generate_document(endpoints);
        group.bench_with_input(
            BenchmarkId::from_parameter(endpoints),
            &document,
            |b, document| {
                b.iter(|| {
                    let result = transform(black_box(document.clone()));
                    black_box(result)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_find, benchmark_transform);
criterion_main!(benches);
