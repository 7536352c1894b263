//! Analysis pipeline performance benchmarks.
//!
//! Measures curve construction, interpolation and the end-to-end run,
//! including file import.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use geoclass::input::STANDARD_SIEVES;
use geoclass::{AnalysisInput, Analyzer, AtterbergLimits, CurveBuilder, EngineConfig, MctCoefficients, Parser, SieveReading};
use std::io::Write;
use tempfile::NamedTempFile;

/// Readings on the full standard series with a smooth distribution.
fn standard_readings() -> Vec<SieveReading> {
    STANDARD_SIEVES
        .iter()
        .enumerate()
        .map(|(i, sieve)| SieveReading::new(sieve.aperture_mm, 20.0 + (i % 5) as f64 * 15.0))
        .collect()
}

/// Readings on `count` log-spaced apertures between 0.01 mm and 100 mm.
fn dense_readings(count: usize) -> Vec<SieveReading> {
    (0..count)
        .map(|i| {
            let t = i as f64 / (count - 1) as f64;
            SieveReading::new(10f64.powf(-2.0 + 4.0 * t), 1.0)
        })
        .collect()
}

fn readings_csv(readings: &[SieveReading]) -> String {
    let mut data = String::from("aperture_mm,retained_g\n");
    for r in readings {
        data.push_str(&format!("{},{}\n", r.aperture_mm, r.retained_mass_g));
    }
    data
}

/// Benchmark curve construction at increasing reading counts.
fn bench_curve_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("curve_build");

    for count in [17, 100, 1000].iter() {
        let readings = dense_readings(*count);
        let total: f64 = readings.iter().map(|r| r.retained_mass_g).sum();

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("readings", count), &readings, |b, readings| {
            b.iter(|| black_box(CurveBuilder::new().build(readings, total).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark both interpolation directions.
fn bench_interpolation(c: &mut Criterion) {
    let mut group = c.benchmark_group("interpolation");

    let readings = standard_readings();
    let total: f64 = readings.iter().map(|r| r.retained_mass_g).sum();
    let curve = CurveBuilder::new().build(&readings, total).unwrap();

    group.bench_function("passing_at", |b| {
        b.iter(|| black_box(curve.passing_at(black_box(0.42))))
    });

    group.bench_function("aperture_at", |b| {
        b.iter(|| black_box(curve.aperture_at(black_box(60.0))))
    });

    group.finish();
}

/// Benchmark the full in-memory run.
fn bench_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_analysis");

    let readings = standard_readings();
    let total: f64 = readings.iter().map(|r| r.retained_mass_g).sum();
    let input = AnalysisInput {
        readings,
        total_dry_mass_g: total,
        limits: AtterbergLimits::new(42.0, 26.0).unwrap(),
        mct: Some(MctCoefficients::new(1.6, 24.0).with_immersion_loss(1.2)),
    };

    group.bench_function("default_config", |b| {
        let analyzer = Analyzer::new();
        b.iter(|| black_box(analyzer.analyze(&input).unwrap()))
    });

    group.bench_function("calibrated_mct", |b| {
        let analyzer = Analyzer::with_config(EngineConfig::default().with_d_prime_threshold(20.0));
        b.iter(|| black_box(analyzer.analyze(&input).unwrap()))
    });

    group.finish();
}

/// Benchmark import plus analysis from a file.
fn bench_file_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_analysis");

    let readings = standard_readings();
    let total: f64 = readings.iter().map(|r| r.retained_mass_g).sum();
    let data = readings_csv(&readings);

    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
    temp.write_all(data.as_bytes()).unwrap();
    let path = temp.path().to_path_buf();

    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("parse_only", |b| {
        let parser = Parser::new();
        b.iter(|| black_box(parser.parse_file(&path).unwrap()))
    });

    group.bench_function("parse_and_analyze", |b| {
        let analyzer = Analyzer::new();
        let limits = AtterbergLimits::new(35.0, 20.0).unwrap();
        b.iter(|| black_box(analyzer.analyze_file(&path, total, limits, None).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_curve_build,
    bench_interpolation,
    bench_full_analysis,
    bench_file_analysis,
);

criterion_main!(benches);
