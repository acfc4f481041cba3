//! Animated GIF assembly.
//!
//! [`ThumbnailAssembler`] turns the extracted key frames into a looping
//! animated GIF, showing each frame for a fixed time (one second by
//! default).
//!
//! This module is available when the `gif` feature is enabled.
//!
//! # Example
//!
//! ```no_run
//! use vidpeek::{
//!     ChannelOrder, GifOptions, MemorySource, PreviewError, PreviewOptions, RawFrame,
//!     ThumbnailAssembler,
//! };
//!
//! let decoded: Vec<RawFrame> = (0..60u8)
//!     .map(|i| RawFrame::solid(64, 36, ChannelOrder::Rgb, [i * 4, 0, 255 - i * 4]))
//!     .collect();
//! let mut source = MemorySource::new(decoded, 24);
//! let frames = vidpeek::extract_key_frames(&mut source, &PreviewOptions::new())?;
//!
//! ThumbnailAssembler::new(GifOptions::new().width(320)).save("thumbnail.gif", &frames)?;
//! # Ok::<(), PreviewError>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use gif::{Encoder, Frame, Repeat};
use image::{RgbImage, imageops, imageops::FilterType};

use crate::error::PreviewError;
use crate::progress::{NoOpProgress, OperationType, ProgressCallback, ProgressTracker};

/// Display time of each key frame, in hundredths of a second.
pub const DEFAULT_FRAME_DELAY: u16 = 100;

/// Configuration for animated GIF output.
#[derive(Debug, Clone)]
pub struct GifOptions {
    /// Target width in pixels. Height follows the aspect ratio.
    /// `None` keeps the source resolution.
    pub width: Option<u32>,
    /// How long each frame is shown, in hundredths of a second.
    pub frame_delay: u16,
    /// How many times the animation repeats. `None` loops forever.
    pub repeat: Option<u16>,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            width: None,
            frame_delay: DEFAULT_FRAME_DELAY,
            repeat: None,
        }
    }
}

impl GifOptions {
    /// Create options with the defaults: source size, one second per frame,
    /// infinite loop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale frames to `width` pixels wide.
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the per-frame display time in hundredths of a second.
    pub fn frame_delay(mut self, delay: u16) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Set the repeat count. `None` loops forever.
    pub fn repeat(mut self, repeat: Option<u16>) -> Self {
        self.repeat = repeat;
        self
    }

    /// Output dimensions for frames of the given source size.
    fn output_dimensions(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        match self.width {
            Some(width) if width > 0 && width != source_width && source_width > 0 => {
                let ratio = f64::from(width) / f64::from(source_width);
                let height = (f64::from(source_height) * ratio).round() as u32;
                (width, height.max(1))
            }
            _ => (source_width, source_height),
        }
    }
}

/// Encodes an ordered list of frames into a looping animated GIF.
pub struct ThumbnailAssembler {
    options: GifOptions,
    progress: Arc<dyn ProgressCallback>,
    batch_size: u64,
}

impl ThumbnailAssembler {
    /// Create an assembler with the given output options.
    pub fn new(options: GifOptions) -> Self {
        Self {
            options,
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
        }
    }

    /// Report encoding progress to `callback` every `batch_size` frames.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>, batch_size: u64) -> Self {
        self.progress = callback;
        self.batch_size = batch_size.max(1);
        self
    }

    /// Write the animation to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::IoError`] if the file cannot be created, or
    /// the errors of [`write`](ThumbnailAssembler::write).
    pub fn save<P: AsRef<Path>>(&self, path: P, frames: &[RgbImage]) -> Result<(), PreviewError> {
        log::debug!("Writing GIF preview to {:?}", path.as_ref());
        let file = File::create(path.as_ref())?;
        self.write(BufWriter::new(file), frames)
    }

    /// Encode the animation into memory and return the GIF bytes.
    ///
    /// # Errors
    ///
    /// See [`write`](ThumbnailAssembler::write).
    pub fn to_bytes(&self, frames: &[RgbImage]) -> Result<Vec<u8>, PreviewError> {
        let mut buffer = Vec::new();
        self.write(&mut buffer, frames)?;
        Ok(buffer)
    }

    /// Encode the animation into `writer`.
    ///
    /// Every frame is scaled to the size of the first one (after applying
    /// [`GifOptions::width`]) and quantized to a 256-colour palette.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::GifEncodeError`] if `frames` is empty, the
    /// output is larger than GIF allows, or encoding fails (including the
    /// trailer), and [`PreviewError::IoError`] if the final flush fails.
    pub fn write<W: Write>(&self, writer: W, frames: &[RgbImage]) -> Result<(), PreviewError> {
        let first = frames.first().ok_or_else(|| {
            PreviewError::GifEncodeError("No frames to encode".to_string())
        })?;
        let (width, height) = self.options.output_dimensions(first.width(), first.height());
        let (gif_width, gif_height) = match (u16::try_from(width), u16::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(PreviewError::GifEncodeError(format!(
                    "{width}x{height} exceeds the GIF size limit"
                )));
            }
        };
        log::debug!(
            "Encoding {} frames to GIF ({}x{}, delay={}, repeat={:?})",
            frames.len(),
            width,
            height,
            self.options.frame_delay,
            self.options.repeat,
        );

        let mut encoder = Encoder::new(writer, gif_width, gif_height, &[]).map_err(|e| {
            PreviewError::GifEncodeError(format!("Failed to create GIF encoder: {e}"))
        })?;
        let repeat = match self.options.repeat {
            None => Repeat::Infinite,
            Some(n) => Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| PreviewError::GifEncodeError(format!("Failed to set GIF repeat: {e}")))?;

        let mut tracker = ProgressTracker::new(
            Arc::clone(&self.progress),
            OperationType::GifEncoding,
            Some(frames.len() as u64),
            self.batch_size,
        );
        for (index, image) in frames.iter().enumerate() {
            let pixels = if image.dimensions() == (width, height) {
                image.as_raw().clone()
            } else {
                imageops::resize(image, width, height, FilterType::Triangle).into_raw()
            };

            let mut gif_frame = Frame::from_rgb_speed(gif_width, gif_height, &pixels, 10);
            gif_frame.delay = self.options.frame_delay;

            encoder.write_frame(&gif_frame).map_err(|e| {
                PreviewError::GifEncodeError(format!("Failed to write GIF frame: {e}"))
            })?;
            tracker.advance(index as u64);
        }
        tracker.finish();

        let mut writer = encoder.into_inner().map_err(|e| {
            PreviewError::GifEncodeError(format!("Failed to finish GIF: {e}"))
        })?;
        writer.flush()?;
        Ok(())
    }
}
