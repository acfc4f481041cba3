//! Async preview generation tests.

#![cfg(feature = "async")]

use std::path::Path;

use vidpeek::{GifOptions, PreviewError, PreviewOptions, PreviewTask};

#[tokio::test]
async fn missing_file_surfaces_open_error() {
    let result = PreviewTask::spawn(
        "tests/fixtures/does_not_exist.mp4",
        PreviewOptions::new(),
        GifOptions::new(),
    )
    .await;
    assert!(matches!(result, Err(PreviewError::FileOpen { .. })));
}

#[tokio::test]
async fn preview_resolves_to_gif_bytes() {
    let path = "tests/fixtures/sample_video.mp4";
    if !Path::new(path).exists() {
        return;
    }

    let bytes = PreviewTask::spawn(
        path,
        PreviewOptions::new().with_num_frames(3),
        GifOptions::new().width(120),
    )
    .await
    .unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
}
