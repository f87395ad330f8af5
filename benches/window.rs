// Copyright (c) 2021, KTH Royal Institute of Technology.
// SPDX-License-Identifier: AGPL-3.0-only

use criterion::{criterion_group, criterion_main, Bencher, Criterion, Throughput};
use timewin::prelude::*;

const TOTAL_RECORDS: u64 = 10000;

fn window(c: &mut Criterion) {
    let mut group = c.benchmark_group("window");
    group.throughput(Throughput::Elements(TOTAL_RECORDS));

    group.bench_function("Tumbling", |b| route_and_close(1000, 1000, b));
    group.bench_function("Sliding 4 overlapping", |b| route_and_close(1000, 250, b));
    group.bench_function("Sliding 20 overlapping", |b| route_and_close(1000, 50, b));

    group.finish()
}

fn route_and_close(length: u64, slide: u64, b: &mut Bencher) {
    b.iter(|| {
        let options = WindowOptions::new(length, slide, |acc: u64, record: &Record| {
            Ok(acc + record.value().len() as u64)
        })
        .unwrap()
        .serializer(display_serializer::<u64>())
        .output("bench");
        let mut runtime = LocalRuntime::new(options, 0, discard_logger()).unwrap();
        for i in 0..TOTAL_RECORDS {
            runtime.deliver_at(i, "key", "value").unwrap();
        }
        runtime.advance_by(length).unwrap();
        runtime.take_outputs().len()
    });
}

criterion_group!(benches, window);
criterion_main!(benches);
