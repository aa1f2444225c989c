//! Compare sequential vs parallel seeded batch run times.
//!
//! Run with: `cargo bench --bench monte_carlo_parallel`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use woundsim::combat::{run_batch_seeded, FaceConvention, TrialParameters, MAX_RUN_NUMBER};
use woundsim::parallel::{run_batch_parallel, WorkerPool};

fn heavy_params() -> TrialParameters {
    TrialParameters {
        dice_number: 200,
        touch_difficulty: 3,
        hurt_difficulty: 4,
        armor_save: 5,
        invu_save: 6,
        run_number: MAX_RUN_NUMBER,
        faces: FaceConvention::Standard,
    }
}

fn bench_batch_sequential_vs_parallel(c: &mut Criterion) {
    let params = heavy_params();
    let seed = 42u64;
    let pool = WorkerPool::default_workers();

    let mut group = c.benchmark_group("monte_carlo");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("sequential", |b| {
        b.iter(|| black_box(run_batch_seeded(&params, seed)));
    });

    group.bench_function("parallel", |b| {
        b.iter(|| black_box(run_batch_parallel(&params, seed, &pool)));
    });

    group.finish();
}

criterion_group!(benches, bench_batch_sequential_vs_parallel);
criterion_main!(benches);
