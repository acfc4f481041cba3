//! Frame-to-frame change scoring.
//!
//! Every consecutive pair of frames is reduced to one number: the sum of the
//! absolute luminance differences of all pixels. The resulting
//! [`ChangeSignal`] has one entry per transition, so a video of `n` frames
//! yields `n - 1` scores and entry `i` describes the cut from frame `i` to
//! frame `i + 1`.

use image::GrayImage;

use crate::{error::PreviewError, frame::RawFrame};

/// Raw change scores, one per frame transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSignal(Vec<u64>);

impl ChangeSignal {
    /// Number of transitions scored.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when fewer than two frames were scored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The scores in transition order.
    pub fn values(&self) -> &[u64] {
        &self.0
    }
}

impl From<Vec<u64>> for ChangeSignal {
    fn from(values: Vec<u64>) -> Self {
        Self(values)
    }
}

/// Sum of absolute per-pixel differences between two luminance images of
/// the same size.
pub fn luma_difference(previous: &GrayImage, current: &GrayImage) -> u64 {
    previous
        .as_raw()
        .iter()
        .zip(current.as_raw())
        .map(|(&a, &b)| u64::from(a.abs_diff(b)))
        .sum()
}

/// Incremental scorer fed one frame at a time.
///
/// Only the luminance of the previous frame is retained, so memory use does
/// not grow with video length.
#[derive(Debug, Default)]
pub struct ChangeScorer {
    previous: Option<GrayImage>,
    frames_seen: u64,
    scores: Vec<u64>,
}

impl ChangeScorer {
    /// Create an empty scorer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Score `frame` against the frame pushed before it.
    ///
    /// The first frame only primes the scorer and produces no score.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::FrameSizeMismatch`] if `frame` does not have
    /// the dimensions of its predecessor.
    pub fn push(&mut self, frame: &RawFrame) -> Result<Option<u64>, PreviewError> {
        let current = frame.luma();
        let index = self.frames_seen;
        self.frames_seen += 1;

        let score = match &self.previous {
            None => None,
            Some(previous) => {
                if previous.dimensions() != current.dimensions() {
                    return Err(PreviewError::FrameSizeMismatch {
                        index,
                        width: current.width(),
                        height: current.height(),
                        previous_width: previous.width(),
                        previous_height: previous.height(),
                    });
                }
                let score = luma_difference(previous, &current);
                self.scores.push(score);
                Some(score)
            }
        };

        self.previous = Some(current);
        Ok(score)
    }

    /// Number of frames pushed so far.
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Finish scoring and return the signal.
    pub fn finish(self) -> ChangeSignal {
        ChangeSignal(self.scores)
    }
}

/// Score an in-order slice of frames.
///
/// # Errors
///
/// Returns [`PreviewError::FrameSizeMismatch`] if frame dimensions change.
pub fn score_frames(frames: &[RawFrame]) -> Result<ChangeSignal, PreviewError> {
    let mut scorer = ChangeScorer::new();
    for frame in frames {
        scorer.push(frame)?;
    }
    Ok(scorer.finish())
}
