use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use keytrace::math::{Consistency, Counts, Rates, accuracy};

fn benchmark_rate_calculations(c: &mut Criterion) {
    let mut group = c.benchmark_group("rate_calculations");

    let test_cases = vec![
        (100, 5, 10.0),      // Short test
        (1000, 50, 120.0),   // Typical test
        (10000, 500, 900.0), // Marathon
    ];

    for (correct, incorrect, seconds) in test_cases {
        let counts = Counts {
            correct,
            incorrect,
            spaces: correct / 5,
            keystrokes: correct + incorrect,
        };

        group.bench_with_input(
            BenchmarkId::new("calculate", format!("{}chars_{}s", correct, seconds as u32)),
            &(counts, seconds),
            |b, &(counts, seconds)| {
                b.iter(|| Rates::calculate(black_box(&counts), black_box(seconds)))
            },
        );
    }

    group.bench_function("zero_elapsed", |b| {
        let counts = Counts::default();
        b.iter(|| Rates::calculate(black_box(&counts), black_box(0.0)))
    });

    group.finish();
}

fn benchmark_accuracy_calculations(c: &mut Criterion) {
    let mut group = c.benchmark_group("accuracy_calculations");

    for (correct, incorrect) in [(0, 0), (95, 5), (9000, 1000)] {
        group.bench_with_input(
            BenchmarkId::new("accuracy", format!("{}of{}", correct, correct + incorrect)),
            &(correct, incorrect),
            |b, &(correct, incorrect)| {
                b.iter(|| accuracy(black_box(correct), black_box(incorrect)))
            },
        );
    }

    group.finish();
}

fn benchmark_consistency_calculations(c: &mut Criterion) {
    let mut group = c.benchmark_group("consistency_calculations");

    // One sample per second: a minute, ten minutes and an hour
    for size in [60, 600, 3600] {
        let wpm_series: Vec<f64> = (0..size)
            .map(|i| 60.0 + (i as f64 * 0.1).sin() * 8.0)
            .collect();

        group.bench_with_input(
            BenchmarkId::new("calculate", format!("{}samples", size)),
            &wpm_series,
            |b, series| b.iter(|| Consistency::calculate(black_box(series))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_rate_calculations,
    benchmark_accuracy_calculations,
    benchmark_consistency_calculations
);
criterion_main!(benches);
