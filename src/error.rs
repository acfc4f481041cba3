//! Error types for the `vidpeek` crate.
//!
//! This module defines [`PreviewError`], the unified error type returned by
//! every fallible operation in the crate. Running out of scene changes is not
//! an error: the peak selector reconciles its candidate count on its own.
//! Only unprocessable input (no frames, unreadable source, bad options)
//! surfaces here.

use std::{io::Error as IoError, path::PathBuf};

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `vidpeek` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreviewError {
    /// The video file could not be opened.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to the source constructor.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The source produced no decodable frames at all.
    #[error("Video contains no decodable frames")]
    NoFrames,

    /// Key frames were selected but none of them could be read back.
    #[error("None of the {requested} selected key frames could be extracted")]
    NoFramesExtracted {
        /// How many frame indices the extractor was asked for.
        requested: usize,
    },

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// Raw pixel data did not describe a valid frame.
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Two consecutive frames have different dimensions and cannot be
    /// differenced.
    #[error(
        "Frame {index} is {width}x{height} but the previous frame is \
         {previous_width}x{previous_height}"
    )]
    FrameSizeMismatch {
        /// Index of the offending frame.
        index: u64,
        /// Width of the offending frame.
        width: u32,
        /// Height of the offending frame.
        height: u32,
        /// Width of the frame before it.
        previous_width: u32,
        /// Height of the frame before it.
        previous_height: u32,
    },

    /// A [`PreviewOptions`](crate::PreviewOptions) value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An error originating from the FFmpeg libraries.
    #[cfg(feature = "video")]
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// GIF encoding failed.
    #[cfg(feature = "gif")]
    #[error("GIF encoding error: {0}")]
    GifEncodeError(String),

    /// The background task running the pipeline was aborted or panicked.
    #[cfg(feature = "async")]
    #[error("Background task failed: {0}")]
    TaskFailed(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate during frame conversion or resizing.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

#[cfg(feature = "video")]
impl From<ffmpeg_next::Error> for PreviewError {
    fn from(error: ffmpeg_next::Error) -> Self {
        PreviewError::FfmpegError(error.to_string())
    }
}
