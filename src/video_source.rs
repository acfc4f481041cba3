//! FFmpeg-backed frame source.
//!
//! [`VideoSource`] opens a local video file with
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next), decodes its best
//! video stream and converts every frame to packed RGB24. The scoring pass
//! decodes the stream front to back once; each key-frame read seeks to the
//! nearest keyframe before the target and decodes forward.
//!
//! Dropping a `VideoSource` closes the demuxer.
//!
//! This module is available when the `video` feature is enabled.
//!
//! # Example
//!
//! ```no_run
//! use vidpeek::{FrameSource, PreviewError, VideoSource};
//!
//! let mut source = VideoSource::open("input.mp4")?;
//! println!("{} frames @ {} fps", source.frame_count(), source.frames_per_second());
//! let first = source.read_at(0)?;
//! # Ok::<(), PreviewError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};

use crate::{
    conversion::{
        SeekLanding, frame_number_to_seek_timestamp, frame_to_buffer, pts_to_frame_number,
        seek_landing,
    },
    error::PreviewError,
    frame::{ChannelOrder, RawFrame},
    source::FrameSource,
};

/// Metadata of the decoded video stream.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Average frame rate as reported by the container.
    pub frames_per_second: f64,
    /// Frame count from the container, or estimated from duration and
    /// frame rate when the container does not record one.
    pub frame_count: u64,
    /// Codec name (e.g. `"h264"`, `"vp9"`).
    pub codec: String,
}

/// A video file opened for key-frame selection.
pub struct VideoSource {
    input_context: Input,
    stream_index: usize,
    time_base: Rational,
    start_pts: i64,
    metadata: VideoMetadata,
    path: PathBuf,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("path", &self.path)
            .field("stream_index", &self.stream_index)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open a video file and read its stream metadata.
    ///
    /// # Errors
    ///
    /// - [`PreviewError::FileOpen`] if FFmpeg cannot open or probe the file.
    /// - [`PreviewError::NoVideoStream`] if the file has no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PreviewError> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Opening video file: {}", path.display());

        ffmpeg_next::init().map_err(|error| PreviewError::FileOpen {
            path: path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| PreviewError::FileOpen {
                path: path.clone(),
                reason: error.to_string(),
            })?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or(PreviewError::NoVideoStream)?;
        let stream_index = stream.index();
        let time_base = stream.time_base();
        let start_pts = match stream.start_time() {
            i64::MIN => 0,
            start => start,
        };

        let decoder = CodecContext::from_parameters(stream.parameters())
            .and_then(|context| context.decoder().video())
            .map_err(|error| PreviewError::FileOpen {
                path: path.clone(),
                reason: format!("Failed to create video decoder: {error}"),
            })?;

        let rate = stream.avg_frame_rate();
        let rate = if rate.denominator() != 0 && rate.numerator() > 0 {
            rate
        } else {
            stream.rate()
        };
        let frames_per_second = if rate.denominator() != 0 {
            f64::from(rate.numerator()) / f64::from(rate.denominator())
        } else {
            0.0
        };

        let frame_count = match stream.frames() {
            frames if frames > 0 => frames as u64,
            _ => {
                let duration_seconds = input_context.duration().max(0) as f64 / 1_000_000.0;
                (duration_seconds * frames_per_second) as u64
            }
        };

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second,
            frame_count,
            codec,
        };
        log::debug!(
            "Video stream {}: {}x{} @ {:.3} fps, ~{} frames [{}]",
            stream_index,
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
            metadata.codec
        );

        Ok(Self {
            input_context,
            stream_index,
            time_base,
            start_pts,
            metadata,
            path,
        })
    }

    /// Stream metadata read at open time.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Path the source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a fresh decoder and RGB24 converter for the video stream.
    fn decoder(&self) -> Result<(VideoDecoder, ScalingContext), PreviewError> {
        let stream = self
            .input_context
            .stream(self.stream_index)
            .ok_or(PreviewError::NoVideoStream)?;
        let decoder = CodecContext::from_parameters(stream.parameters())?
            .decoder()
            .video()?;
        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            self.metadata.width,
            self.metadata.height,
            ScalingFlags::BILINEAR,
        )?;
        Ok((decoder, scaler))
    }

    fn frame_number(&self, decoded: &VideoFrame) -> u64 {
        let pts = decoded.pts().or(decoded.timestamp()).unwrap_or(self.start_pts);
        pts_to_frame_number(
            pts,
            self.start_pts,
            self.time_base,
            self.metadata.frames_per_second,
        )
    }

    fn to_raw_frame(
        &self,
        scaler: &mut ScalingContext,
        decoded: &VideoFrame,
    ) -> Result<RawFrame, PreviewError> {
        let mut rgb_frame = VideoFrame::empty();
        scaler.run(decoded, &mut rgb_frame)?;
        let (width, height) = (self.metadata.width, self.metadata.height);
        let buffer = frame_to_buffer(&rgb_frame, width, height, 3);
        RawFrame::new(width, height, ChannelOrder::Rgb, buffer)
            .map_err(|error| PreviewError::VideoDecodeError(error.to_string()))
    }
}

impl FrameSource for VideoSource {
    fn frame_count(&self) -> u64 {
        self.metadata.frame_count
    }

    fn frames_per_second(&self) -> u32 {
        (self.metadata.frames_per_second as u32).max(1)
    }

    fn read_at(&mut self, index: u64) -> Result<Option<RawFrame>, PreviewError> {
        let (mut decoder, mut scaler) = self.decoder()?;

        let target = frame_number_to_seek_timestamp(index, self.metadata.frames_per_second);
        self.input_context.seek(target, ..target)?;

        let mut decoded = VideoFrame::empty();
        let mut packets_done = false;
        loop {
            while decoder.receive_frame(&mut decoded).is_ok() {
                let frame_number = self.frame_number(&decoded);
                match seek_landing(frame_number, index) {
                    SeekLanding::Before => continue,
                    SeekLanding::Exact => {}
                    // Timestamp gaps and variable frame rates leave no frame
                    // at the target; the nearest later frame stands in, so
                    // neighbouring indices may resolve to the same picture.
                    SeekLanding::Past(overshoot) => log::debug!(
                        "Frame {} requested but decoded frame {} ({} past) in {}",
                        index,
                        frame_number,
                        overshoot,
                        self.path.display()
                    ),
                }
                return self.to_raw_frame(&mut scaler, &decoded).map(Some);
            }
            if packets_done {
                return Ok(None);
            }

            let stream_index = self.stream_index;
            let next = self
                .input_context
                .packets()
                .find(|(stream, _)| stream.index() == stream_index);
            match next {
                Some((_, packet)) => decoder
                    .send_packet(&packet)
                    .map_err(|error| PreviewError::VideoDecodeError(error.to_string()))?,
                None => {
                    decoder.send_eof()?;
                    packets_done = true;
                }
            }
        }
    }

    fn scan(
        &mut self,
        visitor: &mut dyn FnMut(u64, RawFrame) -> Result<(), PreviewError>,
    ) -> Result<u64, PreviewError> {
        let (mut decoder, mut scaler) = self.decoder()?;
        self.input_context.seek(0, ..0)?;

        let mut decoded = VideoFrame::empty();
        let mut index = 0_u64;
        let mut packets_done = false;
        loop {
            while decoder.receive_frame(&mut decoded).is_ok() {
                visitor(index, self.to_raw_frame(&mut scaler, &decoded)?)?;
                index += 1;
            }
            if packets_done {
                break;
            }

            let stream_index = self.stream_index;
            let next = self
                .input_context
                .packets()
                .find(|(stream, _)| stream.index() == stream_index);
            match next {
                Some((_, packet)) => decoder
                    .send_packet(&packet)
                    .map_err(|error| PreviewError::VideoDecodeError(error.to_string()))?,
                None => {
                    decoder.send_eof()?;
                    packets_done = true;
                }
            }
        }

        log::debug!("Decoded {} frames from {}", index, self.path.display());
        Ok(index)
    }
}
