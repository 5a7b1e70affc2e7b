//! Benchmarks for buffering and frame redraws
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lrcurve_rs::axis::{compute_axis_ticks, PadSide, ScaleKind, Y_TICK_POLICY};
use lrcurve_rs::chart::ChartController;
use lrcurve_rs::{ChartSettings, DrawList, Sample, SeriesStore};

fn sample(epoch: usize) -> Sample {
    let x = epoch as f64;
    Sample::new(x)
        .with("loss", 1.0 / (x + 1.0))
        .with("val_loss", 1.2 / (x + 1.0))
}

fn bench_store_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_append");
    let settings = ChartSettings::default();

    group.throughput(Throughput::Elements(1));
    group.bench_function("two_channels", |b| {
        let mut store = SeriesStore::new();
        store.configure(&settings.mappings);
        let mut epoch = 0usize;
        b.iter(|| {
            store.append(black_box(&sample(epoch)));
            epoch = epoch.wrapping_add(1);
        });
    });

    group.bench_function("unmapped_channel", |b| {
        let mut store = SeriesStore::new();
        store.configure(&settings.mappings);
        let row = Sample::new(0.0).with("lr", 0.001);
        b.iter(|| store.append(black_box(&row)));
    });

    group.finish();
}

fn bench_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("redraw");

    for size in [100, 1_000, 10_000].iter() {
        let mut controller = ChartController::new(DrawList::new());
        if controller.configure(ChartSettings::default()).is_err() {
            return;
        }
        let rows: Vec<Sample> = (0..*size).map(sample).collect();
        controller.append_all(&rows);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("frame", size), size, |b, _| {
            b.iter(|| black_box(controller.redraw_now()).is_ok());
        });
    }

    group.finish();
}

fn bench_axis_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("axis_ticks");

    group.bench_function("linear", |b| {
        b.iter(|| compute_axis_ticks(ScaleKind::Linear, black_box((0.013, 2.71)), Y_TICK_POLICY, PadSide::Both))
    });

    group.bench_function("log10", |b| {
        b.iter(|| compute_axis_ticks(ScaleKind::Log10, black_box((0.0004, 3.2)), Y_TICK_POLICY, PadSide::Both))
    });

    group.finish();
}

criterion_group!(benches, bench_store_append, bench_redraw, bench_axis_ticks);
criterion_main!(benches);
