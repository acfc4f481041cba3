//! Benchmarks for change scoring, peak selection and GIF assembly.
//!
//! Run with: cargo bench
//! Run with all features: cargo bench --all-features
//!
//! The synthetic benchmarks need no fixtures. The `video` benchmarks read
//! `tests/fixtures/sample_video.mp4` and are skipped when it is absent.

use criterion::{BenchmarkId, Criterion};
use vidpeek::{
    ChannelOrder, MemorySource, NormalizedSignal, PeakSelector, PreviewOptions, RawFrame,
};

/// A 640x360 clip with a hard cut every `scene_length` frames.
fn synthetic_frames(count: usize, scene_length: usize) -> Vec<RawFrame> {
    (0..count)
        .map(|index| {
            let scene = (index / scene_length) as u8;
            let drift = (index % scene_length) as u8;
            RawFrame::solid(
                640,
                360,
                ChannelOrder::Rgb,
                [scene.wrapping_mul(53), scene.wrapping_mul(97), drift],
            )
        })
        .collect()
}

fn benchmark_scoring(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("score_frames");
    for count in [30_usize, 120] {
        let frames = synthetic_frames(count, 24);
        group.bench_with_input(BenchmarkId::from_parameter(count), &frames, |bencher, frames| {
            bencher.iter(|| vidpeek::score_frames(frames).unwrap());
        });
    }
    group.finish();
}

fn benchmark_peak_selection(criterion: &mut Criterion) {
    // One hour at 30 fps: a sawtooth with a spike every 90 positions.
    let values: Vec<f64> = (0..108_000)
        .map(|position| {
            if position % 90 == 45 {
                1.0
            } else {
                (position % 17) as f64 / 40.0
            }
        })
        .collect();
    let signal = NormalizedSignal::from(values);
    let selector = PeakSelector::new(0.5, 30);

    criterion.bench_function("select 10 peaks from 108k positions", |bencher| {
        bencher.iter(|| selector.select(&signal, 10));
    });
}

fn benchmark_pipeline(criterion: &mut Criterion) {
    let frames = synthetic_frames(240, 30);
    let options = PreviewOptions::new().with_num_frames(8);

    criterion.bench_function("extract_key_frames 240 synthetic frames", |bencher| {
        bencher.iter(|| {
            let mut source = MemorySource::new(frames.clone(), 30);
            vidpeek::extract_key_frames(&mut source, &options).unwrap()
        });
    });
}

#[cfg(feature = "gif")]
fn benchmark_gif(criterion: &mut Criterion) {
    use vidpeek::{GifOptions, ThumbnailAssembler};

    let images: Vec<_> = synthetic_frames(10, 1)
        .into_iter()
        .map(RawFrame::into_rgb)
        .collect();
    let assembler = ThumbnailAssembler::new(GifOptions::new().width(320));

    criterion.bench_function("encode 10-frame GIF at 320px", |bencher| {
        bencher.iter(|| assembler.to_bytes(&images).unwrap());
    });
}

#[cfg(not(feature = "gif"))]
fn benchmark_gif(_criterion: &mut Criterion) {}

#[cfg(feature = "video")]
fn benchmark_video(criterion: &mut Criterion) {
    use std::path::Path;

    const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }

    let mut group = criterion.benchmark_group("video");
    group.sample_size(10);
    group.bench_function("select_key_frames_from_path", |bencher| {
        bencher.iter(|| {
            vidpeek::select_key_frames_from_path(SAMPLE_VIDEO, &PreviewOptions::new()).unwrap()
        });
    });
    group.finish();
}

#[cfg(not(feature = "video"))]
fn benchmark_video(_criterion: &mut Criterion) {}

criterion::criterion_group!(
    benches,
    benchmark_scoring,
    benchmark_peak_selection,
    benchmark_pipeline,
    benchmark_gif,
    benchmark_video,
);
criterion::criterion_main!(benches);
