//! End-to-end key-frame selection.
//!
//! Ties the stages together: a sequential scoring pass over the source,
//! normalization, peak selection, then a second pass that re-reads the
//! chosen frames. Every function here is a pure function of its source and
//! options; nothing is cached between calls.

use std::sync::Arc;

use image::RgbImage;

use crate::{
    config::PreviewOptions,
    error::PreviewError,
    extract::FrameExtractor,
    normalize::{NormalizedSignal, normalize},
    peaks::{PeakSelector, PeakSet},
    progress::{OperationType, ProgressTracker},
    score::{ChangeScorer, ChangeSignal},
    source::FrameSource,
};

/// Outcome of the analysis pass.
#[derive(Debug, Clone)]
pub struct KeyFrameSelection {
    /// Frames actually decoded during the scoring pass.
    pub frame_count: u64,
    /// Integer frame rate reported by the source.
    pub frames_per_second: u32,
    /// Minimum peak spacing used, in frames.
    pub peak_spacing: usize,
    /// Peaks found before reconciliation.
    pub detected_peaks: usize,
    /// The normalized change signal, one entry per transition.
    pub signal: NormalizedSignal,
    /// The reconciled key frames, ascending.
    pub key_frames: PeakSet,
}

impl KeyFrameSelection {
    /// Normalized change that led into key frame `index`.
    ///
    /// Frame 0 has no incoming transition and reports `0.0`.
    pub fn magnitude(&self, index: u64) -> f64 {
        match index.checked_sub(1) {
            Some(position) => usize::try_from(position)
                .map(|position| self.signal.get(position))
                .unwrap_or(0.0),
            None => 0.0,
        }
    }
}

/// Run the scoring pass over `source`.
///
/// Returns the raw change signal and the number of frames decoded.
///
/// # Errors
///
/// Propagates decoder errors from the source and frame size mismatches.
pub fn score_source<S: FrameSource + ?Sized>(
    source: &mut S,
    options: &PreviewOptions,
) -> Result<(ChangeSignal, u64), PreviewError> {
    let mut scorer = ChangeScorer::new();
    let mut tracker = ProgressTracker::new(
        Arc::clone(&options.progress),
        OperationType::ChangeScoring,
        Some(source.frame_count()),
        options.batch_size,
    );

    source.scan(&mut |index, frame| {
        scorer.push(&frame)?;
        tracker.advance(index);
        Ok(())
    })?;
    tracker.finish();

    let frame_count = scorer.frames_seen();
    let signal = scorer.finish();
    log::debug!(
        "Scored {} transitions across {} frames",
        signal.len(),
        frame_count
    );
    Ok((signal, frame_count))
}

/// Analyse `source` and choose its key frames.
///
/// # Errors
///
/// - [`PreviewError::InvalidConfiguration`] if `options` do not validate.
/// - [`PreviewError::NoFrames`] if the source yields no frames at all.
/// - Any error raised by the source while scanning.
///
/// # Example
///
/// ```
/// use vidpeek::{ChannelOrder, MemorySource, PreviewOptions, RawFrame, select_key_frames};
///
/// let frames: Vec<RawFrame> = (0..20u8)
///     .map(|shade| RawFrame::solid(8, 8, ChannelOrder::Rgb, [shade * 10; 3]))
///     .collect();
/// let mut source = MemorySource::new(frames, 5);
///
/// let selection = select_key_frames(&mut source, &PreviewOptions::new().with_num_frames(4))?;
/// assert_eq!(selection.key_frames.len(), 4);
/// # Ok::<(), vidpeek::PreviewError>(())
/// ```
pub fn select_key_frames<S: FrameSource + ?Sized>(
    source: &mut S,
    options: &PreviewOptions,
) -> Result<KeyFrameSelection, PreviewError> {
    options.validate()?;

    let (raw, frame_count) = score_source(source, options)?;
    if frame_count == 0 {
        return Err(PreviewError::NoFrames);
    }

    let signal = normalize(&raw);
    let frames_per_second = source.frames_per_second().max(1);
    let peak_spacing = options.resolve_peak_spacing(frames_per_second);
    let selector = PeakSelector::new(options.peak_threshold, peak_spacing);

    let peaks = selector.detect(&signal);
    let detected_peaks = peaks.len();
    log::debug!(
        "Detected {} peaks (threshold={}, spacing={})",
        detected_peaks,
        options.peak_threshold,
        peak_spacing
    );
    let key_frames = selector.reconcile(&signal, peaks, options.num_frames);

    Ok(KeyFrameSelection {
        frame_count,
        frames_per_second,
        peak_spacing,
        detected_peaks,
        signal,
        key_frames,
    })
}

/// Read the frames of `key_frames` back from `source` in canonical RGB.
///
/// # Errors
///
/// Returns [`PreviewError::NoFramesExtracted`] if none could be read.
pub fn extract_frames<S: FrameSource + ?Sized>(
    source: &mut S,
    key_frames: &PeakSet,
    options: &PreviewOptions,
) -> Result<Vec<RgbImage>, PreviewError> {
    FrameExtractor::new()
        .with_progress(Arc::clone(&options.progress), options.batch_size)
        .extract(source, key_frames)
}

/// Select and extract key frames using one seekable source for both passes.
///
/// # Errors
///
/// See [`select_key_frames`] and [`extract_frames`].
pub fn extract_key_frames<S: FrameSource + ?Sized>(
    source: &mut S,
    options: &PreviewOptions,
) -> Result<Vec<RgbImage>, PreviewError> {
    let selection = select_key_frames(source, options)?;
    extract_frames(source, &selection.key_frames, options)
}
