//! Key frame extraction.
//!
//! The second pass over a [`FrameSource`]: seek to every selected index and
//! keep the frame in canonical RGB. An index the decoder cannot honour is
//! skipped, so the result may be shorter than the [`PeakSet`].

use std::sync::Arc;

use image::RgbImage;

use crate::{
    error::PreviewError,
    peaks::PeakSet,
    progress::{NoOpProgress, OperationType, ProgressCallback, ProgressTracker},
    source::FrameSource,
};

/// Materializes the frames of a [`PeakSet`].
pub struct FrameExtractor {
    progress: Arc<dyn ProgressCallback>,
    batch_size: u64,
}

impl Default for FrameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameExtractor {
    /// Create an extractor without progress reporting.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
        }
    }

    /// Report progress to `callback` every `batch_size` frames.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>, batch_size: u64) -> Self {
        self.progress = callback;
        self.batch_size = batch_size.max(1);
        self
    }

    /// Read every index of `peaks` from `source`, in order.
    ///
    /// Missing or undecodable frames are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::NoFramesExtracted`] if not a single frame
    /// could be read.
    pub fn extract<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
        peaks: &PeakSet,
    ) -> Result<Vec<RgbImage>, PreviewError> {
        log::debug!("Extracting {} key frames", peaks.len());
        let mut tracker = ProgressTracker::new(
            Arc::clone(&self.progress),
            OperationType::FrameExtraction,
            Some(peaks.len() as u64),
            self.batch_size,
        );

        let mut frames = Vec::with_capacity(peaks.len());
        for index in peaks.iter() {
            match source.read_at(index) {
                Ok(Some(frame)) => frames.push(frame.into_rgb()),
                Ok(None) => log::warn!("Key frame {index} is past the end of the video, skipping"),
                Err(error) => log::warn!("Failed to read key frame {index}, skipping: {error}"),
            }
            tracker.advance(index);
        }
        tracker.finish();

        if frames.is_empty() && !peaks.is_empty() {
            return Err(PreviewError::NoFramesExtracted {
                requested: peaks.len(),
            });
        }
        if frames.len() < peaks.len() {
            log::warn!(
                "Extracted {} of {} key frames",
                frames.len(),
                peaks.len()
            );
        }
        Ok(frames)
    }
}
