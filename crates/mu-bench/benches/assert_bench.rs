//! Assertion evaluation benchmarks.
//!
//! Measures the per-assertion cost of the counter update on the pass path,
//! the reporting cost on the failure path, and counter contention.

use std::sync::Arc;
use std::thread;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mu::{ReportConfig, RunCounters, Session, mu_assert, mu_assert_int_eq, mu_assert_str_eq};

fn bench_passing_assertions(c: &mut Criterion) {
    let session = Session::buffered();
    session.begin("bench");
    let mut group = c.benchmark_group("assert_pass");
    group.throughput(Throughput::Elements(1));

    group.bench_function("generic", |b| {
        b.iter(|| mu_assert!(in &session; black_box(3) < 4));
    });
    group.bench_function("int_eq", |b| {
        b.iter(|| mu_assert_int_eq!(in &session; black_box(7_i32), 7));
    });
    group.bench_function("str_eq", |b| {
        b.iter(|| mu_assert_str_eq!(in &session; black_box("needle"), "needle"));
    });
    group.finish();
    session.counters().take();
}

fn bench_failing_assertions(c: &mut Criterion) {
    let session = Session::buffered().with_report(ReportConfig::silent());
    session.begin("bench");
    let mut group = c.benchmark_group("assert_fail");
    group.throughput(Throughput::Elements(1));

    group.bench_function("int_eq", |b| {
        b.iter(|| {
            mu_assert_int_eq!(in &session; black_box(7_i32), 8);
            black_box(session.take_output());
        });
    });
    group.finish();
}

fn bench_counter_contention(c: &mut Criterion) {
    let threads: &[usize] = &[1, 2, 4, 8];
    let per_thread = 10_000_u32;
    let mut group = c.benchmark_group("counter_record");

    for &n in threads {
        group.throughput(Throughput::Elements(u64::from(per_thread) * n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let counters = Arc::new(RunCounters::new());
                let handles: Vec<_> = (0..n)
                    .map(|t| {
                        let counters = Arc::clone(&counters);
                        thread::spawn(move || {
                            for i in 0..per_thread {
                                counters.record((i as usize + t) % 16 != 0);
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    let _ = handle.join();
                }
                black_box(counters.take());
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_passing_assertions,
    bench_failing_assertions,
    bench_counter_contention
);
criterion_main!(benches);
