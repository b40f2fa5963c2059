//! Isolated body overhead: fork + shared block + wait versus inline.

use criterion::{Criterion, criterion_group, criterion_main};
use mu::{InlineWorker, IsolatedWorker, ReportConfig, Session, mu_assert};

fn run_with(session: &Session, worker: &dyn IsolatedWorker) {
    let _ = session.run_isolated_with(worker, &mut || {
        mu_assert!(in session; true);
    });
}

fn bench_isolated_body(c: &mut Criterion) {
    let session = Session::buffered().with_report(ReportConfig::silent());
    session.begin("bench");
    let mut group = c.benchmark_group("isolated_body");
    group.sample_size(20);

    group.bench_function("inline", |b| b.iter(|| run_with(&session, &InlineWorker)));
    #[cfg(unix)]
    group.bench_function("fork", |b| b.iter(|| run_with(&session, &mu::ForkWorker)));
    group.finish();
    session.finalize();
}

criterion_group!(benches, bench_isolated_body);
criterion_main!(benches);
