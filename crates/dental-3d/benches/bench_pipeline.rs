use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use dental_3d::{augment, normalize, sampling};

fn random_points(rng: &mut StdRng, n: usize) -> Vec<[f64; 3]> {
    (0..n)
        .map(|_| {
            [
                rng.random_range(-20.0..20.0),
                rng.random_range(-20.0..20.0),
                rng.random_range(-5.0..5.0),
            ]
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pipeline");
    let mut rng = StdRng::seed_from_u64(0);

    for num_points in [20_000, 100_000].iter() {
        let points = random_points(&mut rng, *num_points);
        group.throughput(criterion::Throughput::Elements(*num_points as u64));

        group.bench_with_input(
            BenchmarkId::new("normalize_points", num_points),
            &points,
            |b, points| b.iter(|| black_box(normalize::normalize_points(points))),
        );

        group.bench_with_input(
            BenchmarkId::new("sample_10000", num_points),
            &points,
            |b, points| {
                let mut rng = StdRng::seed_from_u64(1);
                b.iter(|| black_box(sampling::sample_indices(points.len(), 10_000, &mut rng)))
            },
        );

        group.bench_with_input(
            BenchmarkId::new("augment_segmentation", num_points),
            &points,
            |b, points| {
                let mut rng = StdRng::seed_from_u64(2);
                let config = augment::AugmentConfig::segmentation();
                b.iter(|| {
                    let mut p = points.clone();
                    black_box(augment::augment(
                        &mut p,
                        augment::Targets::None,
                        &config,
                        &mut rng,
                    ))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
