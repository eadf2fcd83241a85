//! Response Parsing Benchmarks
//!
//! Measures decoding of connector list responses in both wire formats, and
//! the cost of canonicalizing and schema-checking the decoded accounts.

use connector_validator::client::{Account, ResponseBatch};
use connector_validator::schema::{AccountSchemaAttribute, AttributeIndex, canonicalize_attributes};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::collections::BTreeSet;

fn create_account(id: usize) -> Value {
    json!({
        "identity": format!("user{}@example.com", id),
        "uuid": format!("uuid-{}", id),
        "key": {"compound": {"lookupId": format!("user{}", id), "uniqueId": format!("uuid-{}", id)}},
        "attributes": {
            "email": format!("user{}@example.com", id),
            "firstName": format!("User{}", id),
            "lastName": "Test",
            "age": id % 90,
            "active": id % 2 == 0,
            "groups": ["users", format!("team-{}", id % 7), "all"]
        }
    })
}

fn deprecated_body(size: usize) -> Vec<u8> {
    (0..size)
        .map(|id| create_account(id).to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .into_bytes()
}

fn enveloped_body(size: usize) -> Vec<u8> {
    let mut body: String = (0..size)
        .map(|id| json!({"type": "output", "data": create_account(id)}).to_string())
        .collect();
    body.push_str(&json!({"type": "state", "data": {"cursor": size}}).to_string());
    body.into_bytes()
}

fn bench_parse_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("response_parsing");

    for size in [1, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*size as u64));

        let deprecated = deprecated_body(*size);
        group.bench_with_input(
            BenchmarkId::new("deprecated", size),
            &deprecated,
            |b, body| b.iter(|| black_box(ResponseBatch::parse(black_box(body)))),
        );

        let enveloped = enveloped_body(*size);
        group.bench_with_input(
            BenchmarkId::new("enveloped", size),
            &enveloped,
            |b, body| b.iter(|| black_box(ResponseBatch::parse(black_box(body)))),
        );
    }

    group.finish();
}

fn bench_decode_and_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_and_check");

    let attributes: Vec<AccountSchemaAttribute> = serde_json::from_value(json!([
        {"name": "email", "type": "string"},
        {"name": "firstName", "type": "string"},
        {"name": "age", "type": "int"},
        {"name": "active", "type": "boolean"},
        {"name": "groups", "type": "string", "multi": true, "entitlement": true}
    ]))
    .expect("benchmark schema should parse");
    let index = AttributeIndex::new("account", &attributes).expect("unique attribute names");

    let body = enveloped_body(100);
    group.throughput(Throughput::Elements(100));
    group.bench_function("accounts_100", |b| {
        b.iter(|| {
            let (outputs, _) = ResponseBatch::parse(&body)
                .expect("benchmark body should parse")
                .into_parts();
            let mut undeclared = BTreeSet::new();
            for output in outputs {
                let mut account: Account =
                    serde_json::from_value(output).expect("benchmark account should decode");
                black_box(index.check_attributes(&account.attributes, &mut undeclared));
                canonicalize_attributes(&mut account.attributes);
                black_box(account);
            }
        });
    });

    group.finish();
}

criterion_group!(
    response_parsing_benches,
    bench_parse_formats,
    bench_decode_and_check
);
criterion_main!(response_parsing_benches);
