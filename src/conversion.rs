//! FFmpeg frame and timestamp helpers.
//!
//! Pixel-data copying and the conversions between frame numbers, stream
//! presentation timestamps and container seek positions that
//! [`VideoSource`](crate::VideoSource) needs.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Copy plane 0 of a packed video frame into a tightly packed buffer.
///
/// FFmpeg pads rows to an alignment boundary; the padding is dropped here.
pub(crate) fn frame_to_buffer(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_bytes = width as usize * bytes_per_pixel;
    let rows = height as usize;
    let data = video_frame.data(0);

    if stride == row_bytes {
        return data[..row_bytes * rows].to_vec();
    }

    let mut buffer = Vec::with_capacity(row_bytes * rows);
    for row in data.chunks(stride).take(rows) {
        buffer.extend_from_slice(&row[..row_bytes]);
    }
    buffer
}

/// Frame number of a presentation timestamp, relative to the stream start.
pub(crate) fn pts_to_frame_number(
    pts: i64,
    start_pts: i64,
    time_base: Rational,
    frames_per_second: f64,
) -> u64 {
    let ticks = pts.saturating_sub(start_pts).max(0);
    let seconds = ticks as f64 * f64::from(time_base.numerator())
        / f64::from(time_base.denominator());
    (seconds * frames_per_second).round() as u64
}

/// Seek position of a frame in AV_TIME_BASE units (microseconds).
///
/// Container-level seeking expects AV_TIME_BASE rather than the stream's
/// own time base.
pub(crate) fn frame_number_to_seek_timestamp(frame_number: u64, frames_per_second: f64) -> i64 {
    if frames_per_second <= 0.0 {
        return 0;
    }
    let seconds = frame_number as f64 / frames_per_second;
    (seconds * 1_000_000.0) as i64
}

/// Where a decoded frame lies relative to the frame a seek was aiming for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SeekLanding {
    /// Still before the target; keep decoding.
    Before,
    /// Exactly the target frame.
    Exact,
    /// Past the target by the given number of frames. Happens on streams
    /// with timestamp gaps or a variable frame rate.
    Past(u64),
}

/// Classify a decoded `frame_number` against the `target` index.
pub(crate) fn seek_landing(frame_number: u64, target: u64) -> SeekLanding {
    match frame_number.checked_sub(target) {
        None => SeekLanding::Before,
        Some(0) => SeekLanding::Exact,
        Some(overshoot) => SeekLanding::Past(overshoot),
    }
}

#[cfg(test)]
mod tests {
    use ffmpeg_next::Rational;

    use super::{SeekLanding, frame_number_to_seek_timestamp, pts_to_frame_number, seek_landing};

    #[test]
    fn pts_maps_to_frame_numbers() {
        let time_base = Rational::new(1, 12_800);
        assert_eq!(pts_to_frame_number(0, 0, time_base, 25.0), 0);
        assert_eq!(pts_to_frame_number(512, 0, time_base, 25.0), 1);
        assert_eq!(pts_to_frame_number(1_024 + 512, 512, time_base, 25.0), 2);
    }

    #[test]
    fn seek_timestamp_is_microseconds() {
        assert_eq!(frame_number_to_seek_timestamp(50, 25.0), 2_000_000);
        assert_eq!(frame_number_to_seek_timestamp(10, 0.0), 0);
    }

    #[test]
    fn seek_landing_reports_overshoot() {
        assert_eq!(seek_landing(3, 5), SeekLanding::Before);
        assert_eq!(seek_landing(5, 5), SeekLanding::Exact);
        assert_eq!(seek_landing(8, 5), SeekLanding::Past(3));
        assert_eq!(seek_landing(0, 0), SeekLanding::Exact);
    }
}
