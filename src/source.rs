//! Frame sources.
//!
//! [`FrameSource`] is the seam between the key-frame selector and whatever
//! decodes the video. Selection makes two independent passes over a source:
//! a sequential [`scan`](FrameSource::scan) to score every transition, then
//! one [`read_at`](FrameSource::read_at) per selected key frame. Sources that
//! can only decode forward should be buffered into a [`MemorySource`] first.

use crate::{error::PreviewError, frame::RawFrame};

/// A decoded video that can be scanned in order and re-read by index.
pub trait FrameSource {
    /// Total number of frames, as reported by the container or decoder.
    ///
    /// This may be an estimate; [`scan`](FrameSource::scan) is authoritative.
    fn frame_count(&self) -> u64;

    /// Integer frame rate, at least 1.
    fn frames_per_second(&self) -> u32;

    /// Read the frame at `index`.
    ///
    /// Returns `Ok(None)` when the index is past the last decodable frame.
    fn read_at(&mut self, index: u64) -> Result<Option<RawFrame>, PreviewError>;

    /// Visit every frame in order, returning how many were visited.
    ///
    /// The default implementation calls [`read_at`](FrameSource::read_at)
    /// for `0..frame_count()` and stops at the first missing frame.
    /// Decoders that pay for each seek should override it with a single
    /// forward decode.
    fn scan(
        &mut self,
        visitor: &mut dyn FnMut(u64, RawFrame) -> Result<(), PreviewError>,
    ) -> Result<u64, PreviewError> {
        let mut visited = 0;
        for index in 0..self.frame_count() {
            let Some(frame) = self.read_at(index)? else {
                break;
            };
            visitor(index, frame)?;
            visited += 1;
        }
        Ok(visited)
    }
}

/// A fully decoded video held in memory.
///
/// Useful for synthetic input, and for buffering a forward-only decoder so
/// that the extraction pass can seek.
///
/// # Example
///
/// ```
/// use vidpeek::{ChannelOrder, FrameSource, MemorySource, RawFrame};
///
/// let frames = vec![RawFrame::solid(4, 4, ChannelOrder::Rgb, [0, 0, 0]); 3];
/// let mut source = MemorySource::new(frames, 30);
/// assert_eq!(source.frame_count(), 3);
/// assert!(source.read_at(3).unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    frames: Vec<RawFrame>,
    frames_per_second: u32,
}

impl MemorySource {
    /// Create a source from decoded frames. A frame rate of 0 is clamped to 1.
    pub fn new(frames: Vec<RawFrame>, frames_per_second: u32) -> Self {
        Self {
            frames,
            frames_per_second: frames_per_second.max(1),
        }
    }

    /// Drain another source into memory with a single scan.
    ///
    /// The buffer grows with the frames actually decoded, never with the
    /// source's reported count, which containers may overstate.
    pub fn buffer<S: FrameSource + ?Sized>(source: &mut S) -> Result<Self, PreviewError> {
        let frames_per_second = source.frames_per_second();
        let mut frames = Vec::new();
        source.scan(&mut |_, frame| {
            frames.push(frame);
            Ok(())
        })?;
        log::debug!("Buffered {} frames into memory", frames.len());
        Ok(Self::new(frames, frames_per_second))
    }

    /// Consume the source and return its frames.
    pub fn into_frames(self) -> Vec<RawFrame> {
        self.frames
    }
}

impl FrameSource for MemorySource {
    fn frame_count(&self) -> u64 {
        self.frames.len() as u64
    }

    fn frames_per_second(&self) -> u32 {
        self.frames_per_second
    }

    fn read_at(&mut self, index: u64) -> Result<Option<RawFrame>, PreviewError> {
        Ok(usize::try_from(index)
            .ok()
            .and_then(|index| self.frames.get(index))
            .cloned())
    }
}
