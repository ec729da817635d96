//! Document service benchmarks
//!
//! Measures the typed-value codec and the in-memory store behind the
//! `Database` facade. No network access.
//!
//! ## Running Benchmarks
//! ```bash
//! cargo bench --bench document_store_bench
//!
//! # Specific benchmark
//! cargo bench --bench document_store_bench -- memory_set/64
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use firebase_bridge::firestore::value::{decode_fields, encode_fields};
use firebase_bridge::{App, FirebaseConfig, MemoryAuthBackend, MemoryDocumentStore, Services};
use futures::future::join_all;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create runtime")
}

fn memory_services(rt: &Runtime) -> Services {
    rt.block_on(async {
        App::with_backends(
            FirebaseConfig::new("bench-key", "bench-project"),
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(MemoryAuthBackend::new()),
        )
        .expect("Failed to initialize")
        .into_services()
    })
}

fn sample_document() -> serde_json::Map<String, Value> {
    match json!({
        "nombre": "Ana",
        "edad": 30,
        "activo": true,
        "saldo": 1234.5,
        "perfil": {
            "ciudad": "Lima",
            "intereses": ["musica", "cine", "futbol"],
            "direccion": { "calle": "Av. Arequipa", "numero": 100 }
        }
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn bench_codec(c: &mut Criterion) {
    let data = sample_document();
    let encoded = encode_fields(&data);

    let mut group = c.benchmark_group("value_codec");
    group.bench_function("encode", |b| b.iter(|| encode_fields(black_box(&data))));
    group.bench_function("decode", |b| {
        b.iter(|| decode_fields(black_box(&encoded)).expect("decode"))
    });
    group.finish();
}

fn bench_memory_store(c: &mut Criterion) {
    let rt = runtime();
    let services = memory_services(&rt);
    let data = sample_document();

    let mut group = c.benchmark_group("memory_set");
    for concurrency in [1usize, 8, 64] {
        group.throughput(Throughput::Elements(concurrency as u64));
        group.bench_with_input(BenchmarkId::from_parameter(concurrency), &concurrency, |b, &n| {
            b.to_async(&rt).iter(|| {
                let db = services.db.clone();
                let data = data.clone();
                async move {
                    join_all((0..n).map(|i| {
                        let db = db.clone();
                        let data = data.clone();
                        async move { db.set("bench", &format!("doc{}", i), data).await }
                    }))
                    .await
                }
            })
        });
    }
    group.finish();

    rt.block_on(async {
        services
            .db
            .set("bench", "hot", data.clone())
            .await
            .expect("seed document");
    });

    let db = &services.db;
    c.bench_function("memory_get", |b| {
        b.to_async(&rt)
            .iter(|| async move { db.get("bench", "hot").await.expect("get") })
    });
}

criterion_group!(benches, bench_codec, bench_memory_store);
criterion_main!(benches);
