use chartscan::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

#[derive(Debug, Clone, Copy)]
struct Bar(f64);

impl Ohlcv for Bar {
    fn open(&self) -> f64 {
        self.0
    }

    fn high(&self) -> f64 {
        self.0 + 1.0
    }

    fn low(&self) -> f64 {
        self.0 - 1.0
    }

    fn close(&self) -> f64 {
        self.0
    }
}

/// Deterministic noisy price walk
fn synthetic_bars(n: usize) -> Vec<Bar> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    (0..n)
        .map(|i| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let noise = (state >> 40) as f64 / (1u64 << 24) as f64 - 0.5;
            let trend = (i as f64 * 0.05).sin() * 10.0;
            Bar(100.0 + trend + noise * 4.0)
        })
        .collect()
}

fn bench_extrema(c: &mut Criterion) {
    let mut group = c.benchmark_group("extrema");
    for n in [1_000usize, 10_000, 100_000] {
        let close: Vec<f64> = synthetic_bars(n).iter().map(Ohlcv::close).collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &close, |b, close| {
            b.iter(|| Extrema::find(black_box(close), 20));
        });
    }
    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let scanner = ScannerBuilder::new().with_all_defaults().build();
    let mut group = c.benchmark_group("scan");
    for n in [1_000usize, 10_000, 100_000] {
        let series = synthetic_bars(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, series| {
            b.iter(|| scanner.scan(black_box(series)).unwrap());
        });
    }
    group.finish();
}

fn bench_backtest(c: &mut Criterion) {
    let scanner = ScannerBuilder::new().with_all_defaults().build();
    let series = synthetic_bars(10_000);
    let report = scanner.scan(&series).unwrap();

    c.bench_function("backtest/10000", |b| {
        b.iter(|| evaluate(black_box(&series), black_box(&report), Horizon::default()).unwrap());
    });
}

criterion_group!(benches, bench_extrema, bench_scan, bench_backtest);
criterion_main!(benches);
