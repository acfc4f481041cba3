//! Peak detection and reconciliation.
//!
//! Scene cuts show up as spikes in the [`NormalizedSignal`]. The selector
//! finds local maxima above a threshold, keeps at most one per spacing
//! window, and then forces the candidate set to the requested size:
//!
//! 1. [`PeakSelector::detect`] collects spaced local maxima.
//! 2. [`fill_underflow`] tops up a short set with the strongest remaining
//!    transitions.
//! 3. [`trim_overflow`] cuts a long set down to its strongest peaks.
//!
//! Whenever two transitions have the same magnitude the lower position wins,
//! so identical input always produces identical output.
//!
//! A peak at signal position `i` selects frame `i + 1`, the first frame that
//! shows the new content.
//!
//! # Example
//!
//! ```
//! use vidpeek::{NormalizedSignal, PeakSelector};
//!
//! let signal = NormalizedSignal::from(vec![0.0, 0.1, 1.0, 0.1, 0.0, 0.0]);
//! let peaks = PeakSelector::new(0.5, 2).select(&signal, 3);
//! assert_eq!(peaks.indices(), &[2, 3, 4]);
//! ```

use std::collections::BTreeSet;

use crate::normalize::NormalizedSignal;

/// Ascending, duplicate-free frame indices chosen as key frames.
///
/// Indices are decoded frame numbers, not signal positions. A transition
/// between frames `i` and `i + 1` is reported as frame `i + 1`, the first
/// frame after the cut rather than the last one before it. Frame 0 only
/// appears when the signal cannot supply enough transitions.
///
/// ```
/// use vidpeek::{NormalizedSignal, PeakSelector};
///
/// // The cut sits between frames 1 and 2.
/// let signal = NormalizedSignal::from(vec![0.0, 1.0, 0.0, 0.0]);
/// let peaks = PeakSelector::new(0.5, 1).select(&signal, 1);
/// assert_eq!(peaks.indices(), &[2]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeakSet(Vec<u64>);

impl PeakSet {
    /// Build a set from arbitrary indices, sorting and removing duplicates.
    pub fn from_indices(indices: impl IntoIterator<Item = u64>) -> Self {
        let unique: BTreeSet<u64> = indices.into_iter().collect();
        Self(unique.into_iter().collect())
    }

    /// Frame indices in ascending order.
    pub fn indices(&self) -> &[u64] {
        &self.0
    }

    /// Number of key frames.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no frame was selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over frame indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }
}

/// Finds scene-change peaks and reconciles them to a target count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakSelector {
    threshold: f64,
    min_spacing: usize,
}

impl PeakSelector {
    /// Create a selector. A spacing of 0 behaves like 1 (no two peaks at the
    /// same position).
    pub fn new(threshold: f64, min_spacing: usize) -> Self {
        Self {
            threshold,
            min_spacing: min_spacing.max(1),
        }
    }

    /// Minimum distance between accepted peaks, in signal positions.
    pub fn min_spacing(&self) -> usize {
        self.min_spacing
    }

    /// Signal positions of spaced local maxima at or above the threshold.
    ///
    /// A position is a local maximum when it is at least as large as both
    /// neighbours; the first and last positions lack a neighbour and never
    /// qualify. Candidates are accepted strongest first and rejected if an
    /// accepted peak lies closer than the minimum spacing.
    pub fn detect(&self, signal: &NormalizedSignal) -> BTreeSet<usize> {
        let values = signal.values();
        let candidates = (1..values.len().saturating_sub(1)).filter(|&position| {
            let value = values[position];
            value >= self.threshold
                && value >= values[position - 1]
                && value >= values[position + 1]
        });

        let reach = self.min_spacing - 1;
        let mut accepted = BTreeSet::new();
        for position in by_magnitude(signal, candidates) {
            let window = position.saturating_sub(reach)..=position.saturating_add(reach);
            if accepted.range(window).next().is_none() {
                accepted.insert(position);
            }
        }
        accepted
    }

    /// Force `peaks` to `num_frames` members and map them to frame indices.
    ///
    /// The signal is assumed to come from a video of `signal.len() + 1`
    /// frames. When the signal runs out of positions the opening frame 0 is
    /// added; a video shorter than `num_frames` yields every frame it has.
    pub fn reconcile(
        &self,
        signal: &NormalizedSignal,
        mut peaks: BTreeSet<usize>,
        num_frames: usize,
    ) -> PeakSet {
        let detected = peaks.len();
        if detected < num_frames {
            fill_underflow(signal, &mut peaks, num_frames);
        } else if detected > num_frames {
            trim_overflow(signal, &mut peaks, num_frames);
        }

        let mut indices: BTreeSet<u64> = peaks
            .into_iter()
            .map(|position| position as u64 + 1)
            .collect();
        if indices.len() < num_frames {
            indices.insert(0);
        }
        if indices.len() < num_frames {
            log::warn!(
                "Video has only {} frames, fewer than the {} key frames requested",
                indices.len(),
                num_frames
            );
        }

        log::debug!(
            "Reconciled {} detected peaks to {} key frames (target {})",
            detected,
            indices.len(),
            num_frames
        );
        PeakSet(indices.into_iter().collect())
    }

    /// Detect peaks and reconcile them to exactly `num_frames` key frames
    /// (or every frame, for videos shorter than that).
    pub fn select(&self, signal: &NormalizedSignal, num_frames: usize) -> PeakSet {
        let peaks = self.detect(signal);
        self.reconcile(signal, peaks, num_frames)
    }
}

/// Add the strongest positions not yet in `peaks` until it holds `target`
/// members or the signal is exhausted.
pub fn fill_underflow(signal: &NormalizedSignal, peaks: &mut BTreeSet<usize>, target: usize) {
    if peaks.len() >= target {
        return;
    }
    for position in by_magnitude(signal, 0..signal.len()) {
        if peaks.insert(position) && peaks.len() == target {
            break;
        }
    }
}

/// Keep only the `target` strongest members of `peaks`.
pub fn trim_overflow(signal: &NormalizedSignal, peaks: &mut BTreeSet<usize>, target: usize) {
    if peaks.len() <= target {
        return;
    }
    let keep: BTreeSet<usize> = by_magnitude(signal, peaks.iter().copied())
        .into_iter()
        .take(target)
        .collect();
    *peaks = keep;
}

/// Positions ordered by descending magnitude, ties broken by ascending
/// position.
fn by_magnitude(signal: &NormalizedSignal, positions: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut ordered: Vec<usize> = positions.collect();
    ordered.sort_by(|&a, &b| signal.get(b).total_cmp(&signal.get(a)).then(a.cmp(&b)));
    ordered
}
