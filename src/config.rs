//! Key-frame selection configuration.
//!
//! [`PreviewOptions`] is a builder carrying the selection parameters (target
//! count, peak threshold, minimum peak spacing) together with the progress
//! settings threaded through both passes over the video.
//!
//! # Example
//!
//! ```
//! use vidpeek::PreviewOptions;
//!
//! let options = PreviewOptions::new()
//!     .with_num_frames(6)
//!     .with_peak_threshold(0.4)
//!     .with_min_peak_spacing(12);
//! assert!(options.validate().is_ok());
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::PreviewError;
use crate::progress::{NoOpProgress, ProgressCallback};

/// Default number of key frames in a preview.
pub const DEFAULT_NUM_FRAMES: usize = 10;

/// Default normalized-signal height a peak must reach.
pub const DEFAULT_PEAK_THRESHOLD: f64 = 0.5;

/// Options for one key-frame selection run.
#[derive(Clone)]
#[must_use]
pub struct PreviewOptions {
    /// Target number of key frames.
    pub(crate) num_frames: usize,
    /// Normalized change a local maximum must reach to count as a peak.
    pub(crate) peak_threshold: f64,
    /// Minimum distance between peaks in signal positions. `None` uses the
    /// video's frame rate, i.e. at most one peak per second.
    pub(crate) min_peak_spacing: Option<usize>,
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// How often the progress callback fires (every N frames).
    pub(crate) batch_size: u64,
}

impl Debug for PreviewOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PreviewOptions")
            .field("num_frames", &self.num_frames)
            .field("peak_threshold", &self.peak_threshold)
            .field("min_peak_spacing", &self.min_peak_spacing)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewOptions {
    /// Create options with the default settings: 10 frames, threshold 0.5,
    /// spacing equal to the frame rate, no progress callback.
    pub fn new() -> Self {
        Self {
            num_frames: DEFAULT_NUM_FRAMES,
            peak_threshold: DEFAULT_PEAK_THRESHOLD,
            min_peak_spacing: None,
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
        }
    }

    /// Set the number of key frames to select.
    pub fn with_num_frames(mut self, num_frames: usize) -> Self {
        self.num_frames = num_frames;
        self
    }

    /// Set the normalized change (0.0 – 1.0) a peak must reach.
    pub fn with_peak_threshold(mut self, threshold: f64) -> Self {
        self.peak_threshold = threshold;
        self
    }

    /// Set a fixed minimum spacing between peaks, in frames.
    ///
    /// Without this the spacing follows the video's frame rate.
    pub fn with_min_peak_spacing(mut self, spacing: usize) -> Self {
        self.min_peak_spacing = Some(spacing);
        self
    }

    /// Attach a progress callback.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Set how often the progress callback fires. Clamped to at least 1.
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Target number of key frames.
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// Peak threshold on the normalized signal.
    pub fn peak_threshold(&self) -> f64 {
        self.peak_threshold
    }

    /// Spacing actually used for a video at `frames_per_second`.
    pub fn resolve_peak_spacing(&self, frames_per_second: u32) -> usize {
        self.min_peak_spacing
            .unwrap_or(frames_per_second as usize)
            .max(1)
    }

    /// Check that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::InvalidConfiguration`] if `num_frames` is zero
    /// or the threshold is not a finite value in `0.0..=1.0`.
    pub fn validate(&self) -> Result<(), PreviewError> {
        if self.num_frames == 0 {
            return Err(PreviewError::InvalidConfiguration(
                "num_frames must be at least 1".to_string(),
            ));
        }
        if !self.peak_threshold.is_finite() || !(0.0..=1.0).contains(&self.peak_threshold) {
            return Err(PreviewError::InvalidConfiguration(format!(
                "peak_threshold must be within 0.0..=1.0, got {}",
                self.peak_threshold
            )));
        }
        Ok(())
    }
}
