//! Recovery engine benchmarks
//!
//! Covers the hot paths taken on every failed attempt: classification,
//! strategy selection and backoff computation, plus full orchestrator runs
//! with zero-delay configs.
//!
//! Run with: `cargo bench --bench recovery_bench -p recipebox-common`

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use recipebox_common::recovery::{
    BackoffCalculator, ErrorCategory, ErrorClassifier, OperationKind, RetryConfig,
    RetryOrchestrator, StrategySelector,
};
use recipebox_common::CommonError;
use tokio::runtime::Builder as RuntimeBuilder;

fn bench_classifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier");

    for message in [
        "permission denied: /photos",
        "request timeout while saving recipe",
        "database is locked",
        "something odd happened in the meal planner",
    ] {
        group.bench_with_input(BenchmarkId::new("keywords", message), message, |b, message| {
            b.iter(|| ErrorClassifier::classify_message(black_box(message)));
        });
    }

    let structured = CommonError::storage("database is locked");
    group.bench_function("structured", |b| {
        b.iter(|| ErrorClassifier::classify(black_box(&structured)));
    });

    group.finish();
}

fn bench_selection_and_backoff(c: &mut Criterion) {
    let config = RetryConfig::persistent();

    c.bench_function("strategy_select", |b| {
        b.iter(|| {
            for attempt in 1..=5 {
                black_box(StrategySelector::select(
                    black_box(ErrorCategory::Unknown),
                    black_box(OperationKind::Download),
                    attempt,
                    &config,
                ));
            }
        });
    });

    c.bench_function("backoff_delay", |b| {
        b.iter(|| {
            for attempt in 1..=64 {
                black_box(BackoffCalculator::delay(black_box(attempt), &config));
            }
        });
    });
}

fn build_runtime() -> tokio::runtime::Runtime {
    RuntimeBuilder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime should build for benchmarks")
}

fn bench_orchestrator(c: &mut Criterion) {
    let runtime = build_runtime();
    let orchestrator = RetryOrchestrator::new();
    let no_delay = RetryConfig::builder()
        .max_attempts(5)
        .no_delay()
        .build()
        .expect("valid zero-delay config for benchmarks");

    let mut group = c.benchmark_group("orchestrator");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("first_attempt_success", |b| {
        b.to_async(&runtime).iter(|| async {
            orchestrator
                .execute("bench_save", OperationKind::Save, &no_delay, || async {
                    Ok::<_, &str>(42_u32)
                })
                .await
        });
    });

    group.bench_function("exhaust_then_fallback", |b| {
        b.to_async(&runtime).iter(|| async {
            orchestrator
                .execute_with_fallback(
                    "bench_load",
                    OperationKind::Load,
                    &no_delay,
                    || async { Err::<u32, _>("database is locked") },
                    || async { Ok::<_, &str>(7_u32) },
                )
                .await
        });
    });

    group.finish();
}

criterion_group!(recovery, bench_classifier, bench_selection_and_backoff, bench_orchestrator);
criterion_main!(recovery);
