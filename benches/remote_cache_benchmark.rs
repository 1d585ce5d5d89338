/*
 *
 *  *
 *  *      Copyright (c) 2018-2025, SnackCloud All rights reserved.
 *  *
 *  *   Redistribution and use in source and binary forms, with or without
 *  *   modification, are permitted provided that the following conditions are met:
 *  *
 *  *   Redistributions of source code must retain the above copyright notice,
 *  *   this list of conditions and the following disclaimer.
 *  *   Redistributions in binary form must reproduce the above copyright
 *  *   notice, this list of conditions and the following disclaimer in the
 *  *   documentation and/or other materials provided with the distribution.
 *  *   Neither the name of the www.snackcloud.cn developer nor the names of its
 *  *   contributors may be used to endorse or promote products derived from
 *  *   this software without specific prior written permission.
 *  *   Author: SnackCloud
 *  *
 *
 */
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use crud_cache_redis::{Cache, JsonCodec, MemoryStore, RemoteCache};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
struct BenchmarkData {
    id: u64,
    name: String,
    value: f64,
    tags: Vec<String>,
    metadata: HashMap<String, String>,
}

impl Default for BenchmarkData {
    fn default() -> Self {
        Self {
            id: 0,
            name: "Test".to_string(),
            value: 123.456,
            tags: vec!["tag1".to_string(), "tag2".to_string()],
            metadata: HashMap::from([
                ("key1".to_string(), "value1".to_string()),
                ("key2".to_string(), "value2".to_string()),
            ]),
        }
    }
}

fn create_cache() -> RemoteCache {
    RemoteCache::with_store(Arc::new(MemoryStore::new()), "bench:", JsonCodec)
}

fn bench_set_get(c: &mut Criterion) {
    let cache = create_cache();
    let data = BenchmarkData::default();

    c.bench_function("set_then_get", |b| {
        b.iter(|| {
            cache.set("item", black_box(&data)).unwrap();
            let found: BenchmarkData = cache.get("item").unwrap();
            black_box(found);
        });
    });

    c.bench_function("set_with_ttl", |b| {
        b.iter(|| {
            cache
                .set_with_ttl("item:ttl", black_box(&data), Duration::from_secs(60))
                .unwrap();
        });
    });
}

fn bench_payload_sizes(c: &mut Criterion) {
    let cache = create_cache();
    let mut group = c.benchmark_group("payload_size");

    for tags in [1usize, 10, 100, 1000] {
        let data = BenchmarkData {
            tags: (0..tags).map(|i| format!("tag{}", i)).collect(),
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(tags), &data, |b, data| {
            b.iter(|| {
                cache.set("payload", data).unwrap();
                black_box(cache.get::<BenchmarkData>("payload").unwrap());
            });
        });
    }

    group.finish();
}

fn bench_missing_key(c: &mut Criterion) {
    let cache = create_cache();

    c.bench_function("get_not_found", |b| {
        b.iter(|| {
            let err = cache.get::<BenchmarkData>(black_box("missing")).unwrap_err();
            black_box(err.is_not_found());
        });
    });
}

criterion_group!(benches, bench_set_get, bench_payload_sizes, bench_missing_key);
criterion_main!(benches);
