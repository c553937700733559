//! Run these benches with `cargo bench --bench fog -- --verbose`
use criterion::{criterion_group, criterion_main, Criterion};
use fog_analysis::{FogFrame, FogThresholds, GridShape};

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(200)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(fog_benches);

criterion_group!(
    name = fog_benches;
    config = build_tester();
    targets = fog_flag_bench, classify_frame_bench
);

fn fog_flag_bench(c: &mut Criterion) {
    let start = chrono::NaiveDate::from_ymd_opt(2023, 10, 23).expect("bad date");
    let times = utils::valid_times(start, 1);
    let frame = utils::load_frame(times[0], GridShape::new(32, 32));

    c.bench_function("fog_flag", |b| {
        b.iter(|| {
            for sample in frame.samples().iter().flatten() {
                let _x = fog_analysis::fog_flag(sample);
            }
        });
    });
}

fn classify_frame_bench(c: &mut Criterion) {
    let start = chrono::NaiveDate::from_ymd_opt(2023, 10, 23).expect("bad date");
    let times = utils::valid_times(start, 1);
    let frame = utils::load_frame(times[0], fog_analysis::Region::southeast_us().shape());
    let thresholds = FogThresholds::default();

    c.bench_function("classify_frame", |b| {
        b.iter(|| FogFrame::classify(&frame, &thresholds));
    });
}
