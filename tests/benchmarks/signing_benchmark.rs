//! Signing hot-path benchmarks
//!
//! Run:
//!   cargo bench --bench signing_benchmark

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndbroker_client::prelude::*;
use std::hint::black_box;

const INFO_PATH: &str = "/api/v1/broker/nd/info?begin=20240101&end=20240131&tradeType=1";

fn signer() -> BrokerSigner {
    BrokerSigner::new(Credential::new("ak1", "sk1", "pp1")).unwrap()
}

fn bench_sign(c: &mut Criterion) {
    let signer = signer();
    let mut group = c.benchmark_group("signing/sign");

    for &body_len in &[0usize, 64, 1024, 16 * 1024] {
        let body = "x".repeat(body_len);
        let input = SigningInput::with_timestamp("1700000000000", "POST", "/api/v1/broker/nd/transfer", Some(&body));
        group.throughput(Throughput::Bytes(body_len as u64));
        group.bench_with_input(BenchmarkId::new("post_body", body_len), &input, |b, input| {
            b.iter(|| signer.sign(black_box(input)))
        });
    }

    let input = SigningInput::with_timestamp("1700000000000", "GET", INFO_PATH, None);
    group.bench_function("get_with_query", |b| b.iter(|| signer.sign(black_box(&input))));
    group.finish();
}

fn bench_query_rendering(c: &mut Criterion) {
    c.bench_function("signing/query_render", |b| {
        b.iter(|| {
            QueryString::new()
                .push("begin", black_box("20240101"))
                .push("end", black_box("20240131"))
                .push("tradeType", 1)
                .request_path("/api/v1/broker/nd/info")
        })
    });
}

fn bench_gate(c: &mut Criterion) {
    let gate = CredentialGate::new(MemoryCredentialStore::with_credential("ak1", "sk1", "pp1"));
    c.bench_function("signing/gate_is_configured", |b| b.iter(|| black_box(gate.is_configured())));
}

criterion_group!(benches, bench_sign, bench_query_rendering, bench_gate);
criterion_main!(benches);
