//! FFmpeg-backed source tests.
//!
//! Tests require fixture files from `tests/fixtures/generate_fixtures.sh`.

#![cfg(feature = "video")]

use std::path::Path;

use vidpeek::{FrameSource, PreviewError, PreviewOptions, VideoSource};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

#[test]
fn missing_file_fails_to_open() {
    let result = VideoSource::open("tests/fixtures/does_not_exist.mp4");
    assert!(matches!(result, Err(PreviewError::FileOpen { .. })));
}

#[test]
fn metadata_matches_fixture() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let source = VideoSource::open(path).unwrap();
    let metadata = source.metadata();
    assert_eq!((metadata.width, metadata.height), (640, 480));
    assert_eq!(source.frames_per_second(), 30);
    assert!(source.frame_count() >= 140);
    assert_eq!(source.path(), Path::new(path));
}

#[test]
fn random_reads_match_sequential_scan() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = VideoSource::open(path).unwrap();
    let mut sequential = Vec::new();
    let scanned = source
        .scan(&mut |index, frame| {
            if index == 0 || index == 45 {
                sequential.push(frame);
            }
            Ok(())
        })
        .unwrap();
    assert!(scanned >= 140);
    assert_eq!(sequential.len(), 2);

    let first = source.read_at(0).unwrap().unwrap();
    assert_eq!(first.width(), sequential[0].width());
    assert_eq!(first.height(), sequential[0].height());
}

#[test]
fn selects_requested_number_of_key_frames() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let options = PreviewOptions::new().with_num_frames(6);
    let selection = vidpeek::select_key_frames_from_path(path, &options).unwrap();
    assert_eq!(selection.key_frames.len(), 6);
    assert!(selection.key_frames.iter().all(|index| index < selection.frame_count));

    let frames = vidpeek::extract_key_frames_from_path(path, &options).unwrap();
    assert!(!frames.is_empty() && frames.len() <= 6);
    assert!(frames.iter().all(|frame| frame.dimensions() == (640, 480)));
}

#[cfg(feature = "gif")]
#[test]
fn preview_is_written_to_disk() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("preview.gif");
    let written = vidpeek::save_preview(
        path,
        &output,
        &PreviewOptions::new().with_num_frames(4),
        &vidpeek::GifOptions::new().width(160),
    )
    .unwrap();
    assert_eq!(written, 4);
    assert!(std::fs::read(&output).unwrap().starts_with(b"GIF89a"));
}
