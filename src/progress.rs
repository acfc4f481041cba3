//! Progress reporting.
//!
//! Both passes over a video can take a while on long inputs. Attach a
//! [`ProgressCallback`] through
//! [`PreviewOptions::with_progress`](crate::PreviewOptions::with_progress) to
//! observe them. Callbacks only observe; they cannot stop the pipeline.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use vidpeek::{PreviewOptions, ProgressCallback, ProgressInfo};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.operation);
//!         }
//!     }
//! }
//!
//! let options = PreviewOptions::new()
//!     .with_progress(Arc::new(PrintProgress))
//!     .with_batch_size(25);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// The pipeline stage currently reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Sequential pass scoring every frame transition.
    ChangeScoring,
    /// Re-reading the selected key frames.
    FrameExtraction,
    /// Encoding the animated preview.
    GifEncoding,
}

/// A snapshot of pipeline progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Which stage is reporting.
    pub operation: OperationType,
    /// Items (frames) processed so far in this stage.
    pub current: u64,
    /// Total items expected, if known ahead of time.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the stage started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// Index of the frame just processed.
    pub current_frame: Option<u64>,
}

/// Receives progress updates from the pipeline.
///
/// Implementations must be [`Send`] and [`Sync`] so options can be moved onto
/// a blocking worker thread.
pub trait ProgressCallback: Send + Sync {
    /// Called every `batch_size` items and once at the end of each stage.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all notifications. The default callback.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Tracks timing for one stage and emits callbacks at the batch cadence.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    batch_size: u64,
    start_time: Instant,
    since_last_report: u64,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
        batch_size: u64,
    ) -> Self {
        Self {
            callback,
            operation,
            total: total.filter(|&total| total > 0),
            current: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            since_last_report: 0,
        }
    }

    /// Record one processed frame.
    pub(crate) fn advance(&mut self, frame_number: u64) {
        self.current += 1;
        self.since_last_report += 1;

        if self.since_last_report >= self.batch_size {
            self.report(Some(frame_number));
            self.since_last_report = 0;
        }
    }

    /// Emit the closing report for this stage.
    pub(crate) fn finish(&mut self) {
        self.report(None);
    }

    fn report(&self, frame_number: Option<u64>) {
        let elapsed = self.start_time.elapsed();

        // Frame counts from containers are estimates; never report past 100%.
        let percentage = self
            .total
            .map(|total| (self.current.min(total) as f32 / total as f32) * 100.0);

        let estimated_remaining = match (self.total, self.current) {
            (Some(total), current) if current > 0 => {
                let remaining = total.saturating_sub(current);
                Some(elapsed.mul_f64(remaining as f64 / current as f64))
            }
            _ => None,
        };

        self.callback.on_progress(&ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_frame: frame_number,
        });
    }
}
