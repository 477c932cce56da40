//! Detector throughput: frames of tracked boxes moving through the band.
//! Run with: cargo bench -p linewatch-analysis --bench detector_bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use linewatch_analysis::{CrossingDetector, DetectorSettings};
use linewatch_core::types::{Observation, Timestamp};

/// `tracks` vehicles moving down 4 px per frame, staggered by 7 px.
fn frames(tracks: i64, count: usize) -> Vec<Vec<Observation>> {
    (0..count)
        .map(|f| {
            (0..tracks)
                .map(|id| {
                    let y = ((id * 7) as f32 + f as f32 * 4.0) % 1000.0;
                    Observation::new(id, 2, 0.8, y)
                })
                .collect()
        })
        .collect()
}

fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("detector_process");
    for tracks in [10_i64, 100, 1000] {
        let input = frames(tracks, 250);
        group.bench_with_input(BenchmarkId::from_parameter(tracks), &input, |b, input| {
            b.iter(|| {
                let mut det = CrossingDetector::new(DetectorSettings::default()).unwrap();
                let mut counted = 0usize;
                for (i, obs) in input.iter().enumerate() {
                    let out = det.process(1000, obs, Timestamp(i as f64 / 30.0));
                    for c in &out.candidates {
                        det.confirm(c.track_id);
                    }
                    counted += out.candidates.len();
                }
                counted
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_process);
criterion_main!(benches);
