//! Path-based entry points.
//!
//! These open a [`VideoSource`] once per pass: the scoring pass and the
//! extraction pass each get their own demuxer, which is closed as soon as
//! the pass ends (including on early errors).
//!
//! This module is available when the `video` feature is enabled.

use std::path::Path;

use image::RgbImage;

use crate::{
    config::PreviewOptions,
    error::PreviewError,
    pipeline::{KeyFrameSelection, extract_frames, select_key_frames},
    video_source::VideoSource,
};

#[cfg(feature = "gif")]
use std::sync::Arc;

#[cfg(feature = "gif")]
use crate::assembler::{GifOptions, ThumbnailAssembler};

/// Choose the key frames of the video at `path`.
///
/// # Errors
///
/// See [`VideoSource::open`] and [`select_key_frames`].
pub fn select_key_frames_from_path<P: AsRef<Path>>(
    path: P,
    options: &PreviewOptions,
) -> Result<KeyFrameSelection, PreviewError> {
    let mut source = VideoSource::open(path)?;
    select_key_frames(&mut source, options)
}

/// Choose and extract the key frames of the video at `path`.
///
/// # Errors
///
/// See [`VideoSource::open`], [`select_key_frames`] and [`extract_frames`].
pub fn extract_key_frames_from_path<P: AsRef<Path>>(
    path: P,
    options: &PreviewOptions,
) -> Result<Vec<RgbImage>, PreviewError> {
    let path = path.as_ref();
    let selection = select_key_frames_from_path(path, options)?;

    let mut source = VideoSource::open(path)?;
    extract_frames(&mut source, &selection.key_frames, options)
}

/// Build the animated preview of the video at `path` and return the GIF
/// bytes.
///
/// # Errors
///
/// See [`extract_key_frames_from_path`] and
/// [`ThumbnailAssembler::write`].
///
/// # Example
///
/// ```no_run
/// use vidpeek::{GifOptions, PreviewError, PreviewOptions};
///
/// let gif = vidpeek::generate_preview(
///     "input.mp4",
///     &PreviewOptions::new().with_num_frames(8),
///     &GifOptions::new().width(480),
/// )?;
/// std::fs::write("thumbnail.gif", gif)?;
/// # Ok::<(), PreviewError>(())
/// ```
#[cfg(feature = "gif")]
pub fn generate_preview<P: AsRef<Path>>(
    path: P,
    options: &PreviewOptions,
    gif_options: &GifOptions,
) -> Result<Vec<u8>, PreviewError> {
    let frames = extract_key_frames_from_path(path, options)?;
    ThumbnailAssembler::new(gif_options.clone())
        .with_progress(Arc::clone(&options.progress), options.batch_size)
        .to_bytes(&frames)
}

/// Build the animated preview of the video at `path` and write it to
/// `output`.
///
/// # Errors
///
/// See [`extract_key_frames_from_path`] and [`ThumbnailAssembler::save`].
#[cfg(feature = "gif")]
pub fn save_preview<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    output: Q,
    options: &PreviewOptions,
    gif_options: &GifOptions,
) -> Result<usize, PreviewError> {
    let frames = extract_key_frames_from_path(path, options)?;
    ThumbnailAssembler::new(gif_options.clone())
        .with_progress(Arc::clone(&options.progress), options.batch_size)
        .save(output, &frames)?;
    Ok(frames.len())
}
