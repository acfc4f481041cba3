//! Peak detection and count reconciliation tests.

use std::collections::BTreeSet;

use vidpeek::{NormalizedSignal, PeakSelector, PeakSet, fill_underflow, trim_overflow};

/// A flat signal of `len` positions with the given spikes.
fn spiky(len: usize, spikes: &[(usize, f64)]) -> NormalizedSignal {
    let mut values = vec![0.0; len];
    for &(position, value) in spikes {
        values[position] = value;
    }
    NormalizedSignal::from(values)
}

fn assert_strictly_ascending(peaks: &PeakSet) {
    assert!(
        peaks.indices().windows(2).all(|pair| pair[0] < pair[1]),
        "not strictly ascending: {:?}",
        peaks.indices()
    );
}

#[test]
fn overflow_keeps_the_largest_peaks() {
    let signal = spiky(
        50,
        &[
            (5, 0.6),
            (10, 0.9),
            (15, 0.7),
            (20, 1.0),
            (25, 0.55),
            (30, 0.8),
            (35, 0.65),
            (40, 0.95),
        ],
    );
    let selector = PeakSelector::new(0.5, 3);
    assert_eq!(selector.detect(&signal).len(), 8);

    let peaks = selector.select(&signal, 5);
    assert_eq!(peaks.indices(), &[11, 16, 21, 31, 41]);
}

#[test]
fn underflow_fills_with_strongest_remaining_positions() {
    let signal = spiky(12, &[(6, 1.0), (2, 0.3), (9, 0.2)]);
    let selector = PeakSelector::new(0.5, 4);
    assert_eq!(selector.detect(&signal), BTreeSet::from([6]));

    let peaks = selector.select(&signal, 4);
    assert_eq!(peaks.indices(), &[1, 3, 7, 10]);
}

#[test]
fn flat_signal_falls_back_to_earliest_positions() {
    let signal = NormalizedSignal::from(vec![0.0; 19]);
    let peaks = PeakSelector::new(0.5, 30).select(&signal, 5);
    assert_eq!(peaks.indices(), &[1, 2, 3, 4, 5]);
}

#[test]
fn spacing_suppresses_weaker_neighbours() {
    let signal = spiky(8, &[(3, 0.8), (5, 1.0)]);
    assert_eq!(
        PeakSelector::new(0.5, 3).detect(&signal),
        BTreeSet::from([5])
    );
    assert_eq!(
        PeakSelector::new(0.5, 2).detect(&signal),
        BTreeSet::from([3, 5])
    );
}

#[test]
fn zero_spacing_behaves_like_one() {
    let selector = PeakSelector::new(0.0, 0);
    assert_eq!(selector.min_spacing(), 1);
}

#[test]
fn exact_count_and_order_across_lengths() {
    for len in [4_usize, 9, 30, 101] {
        let values: Vec<f64> = (0..len)
            .map(|position| ((position * 7919) % 13) as f64 / 12.0)
            .collect();
        let signal = NormalizedSignal::from(values);
        for num_frames in [1_usize, 3, 5] {
            let peaks = PeakSelector::new(0.5, 2).select(&signal, num_frames);
            assert_eq!(peaks.len(), num_frames, "len={len} num_frames={num_frames}");
            assert_strictly_ascending(&peaks);
            assert!(peaks.iter().all(|index| index <= len as u64));
        }
    }
}

#[test]
fn short_video_yields_every_frame() {
    // Three frames give two transitions.
    let signal = NormalizedSignal::from(vec![1.0, 0.0]);
    let peaks = PeakSelector::new(0.5, 1).select(&signal, 5);
    assert_eq!(peaks.indices(), &[0, 1, 2]);
}

#[test]
fn frame_zero_completes_a_video_of_exactly_num_frames() {
    let signal = NormalizedSignal::from(vec![0.2, 1.0, 0.4, 0.0]);
    let peaks = PeakSelector::new(0.5, 1).select(&signal, 5);
    assert_eq!(peaks.indices(), &[0, 1, 2, 3, 4]);
}

#[test]
fn single_frame_video_selects_frame_zero() {
    let peaks = PeakSelector::new(0.5, 1).select(&NormalizedSignal::default(), 10);
    assert_eq!(peaks.indices(), &[0]);
}

#[test]
fn fill_and_trim_leave_sets_at_target_untouched() {
    let signal = spiky(6, &[(1, 0.9), (4, 0.8)]);
    let mut peaks = BTreeSet::from([1, 4]);
    fill_underflow(&signal, &mut peaks, 2);
    trim_overflow(&signal, &mut peaks, 2);
    assert_eq!(peaks, BTreeSet::from([1, 4]));
}

#[test]
fn peak_set_sorts_and_dedups() {
    let peaks = PeakSet::from_indices([9, 3, 3, 0, 9]);
    assert_eq!(peaks.indices(), &[0, 3, 9]);
    assert_eq!(peaks.len(), 3);
    assert!(PeakSet::default().is_empty());
}

#[test]
fn cut_is_reported_as_first_frame_after_it() {
    // Transition between frames 6 and 7.
    let signal = spiky(10, &[(6, 1.0)]);
    let peaks = PeakSelector::new(0.5, 1).select(&signal, 1);
    assert_eq!(peaks.indices(), &[7]);
}
