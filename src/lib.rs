//! # vidpeek
//!
//! Pick the frames of a video where the picture changes the most, and turn
//! them into an animated preview.
//!
//! Selection runs in two passes over a [`FrameSource`]. The first decodes
//! every frame once and scores each transition by its absolute luminance
//! difference. The scores are normalized to `0.0..=1.0`, local maxima above a
//! threshold and at least a minimum spacing apart become candidate key
//! frames, and the candidate set is filled or trimmed to exactly the
//! requested count. The second pass seeks to each chosen frame and returns it
//! in RGB, ready for [`ThumbnailAssembler`] to encode as a looping GIF.
//!
//! ## Quick Start
//!
//! ### Preview a Video File
//!
//! ```no_run
//! # #[cfg(all(feature = "video", feature = "gif"))]
//! # fn main() {
//! use vidpeek::{GifOptions, PreviewOptions};
//!
//! let options = PreviewOptions::new().with_num_frames(10);
//! vidpeek::save_preview("input.mp4", "preview.gif", &options, &GifOptions::new()).unwrap();
//! # }
//! # #[cfg(not(all(feature = "video", feature = "gif")))]
//! # fn main() {}
//! ```
//!
//! ### Inspect the Selection
//!
//! ```no_run
//! # #[cfg(feature = "video")]
//! # fn main() {
//! use vidpeek::PreviewOptions;
//!
//! let selection = vidpeek::select_key_frames_from_path("input.mp4", &PreviewOptions::new()).unwrap();
//! for index in selection.key_frames.iter() {
//!     println!("frame {index}: {:.3}", selection.magnitude(index));
//! }
//! # }
//! # #[cfg(not(feature = "video"))]
//! # fn main() {}
//! ```
//!
//! ### Synthetic Input
//!
//! The selection core does not need FFmpeg. Any [`FrameSource`] works,
//! including the in-memory [`MemorySource`]:
//!
//! ```
//! use vidpeek::{ChannelOrder, MemorySource, PreviewOptions, RawFrame};
//!
//! let frames: Vec<RawFrame> = (0..30u8)
//!     .map(|i| RawFrame::solid(16, 16, ChannelOrder::Rgb, [i * 8; 3]))
//!     .collect();
//! let mut source = MemorySource::new(frames, 10);
//!
//! let images = vidpeek::extract_key_frames(&mut source, &PreviewOptions::new().with_num_frames(5)).unwrap();
//! assert_eq!(images.len(), 5);
//! ```
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `video` | [`VideoSource`] and the path-based entry points, via FFmpeg |
//! | `gif` | [`ThumbnailAssembler`] GIF encoding |
//! | `async` | `PreviewTask` for generating previews from a Tokio runtime |
//! | `full` | Enables all of the above |
//!
//! ## Requirements
//!
//! The `video` feature needs the FFmpeg development libraries installed on
//! the system.

#[cfg(feature = "gif")]
pub mod assembler;
pub mod config;
#[cfg(feature = "video")]
mod conversion;
pub mod error;
pub mod extract;
pub mod frame;
pub mod normalize;
pub mod peaks;
pub mod pipeline;
#[cfg(feature = "video")]
pub mod preview;
pub mod progress;
pub mod score;
pub mod source;
#[cfg(feature = "async")]
pub mod task;
#[cfg(feature = "video")]
pub mod video_source;

#[cfg(feature = "gif")]
pub use assembler::{DEFAULT_FRAME_DELAY, GifOptions, ThumbnailAssembler};
pub use config::{DEFAULT_NUM_FRAMES, DEFAULT_PEAK_THRESHOLD, PreviewOptions};
pub use error::PreviewError;
pub use extract::FrameExtractor;
pub use frame::{ChannelOrder, RawFrame};
pub use normalize::{NormalizedSignal, normalize};
pub use peaks::{PeakSelector, PeakSet, fill_underflow, trim_overflow};
pub use pipeline::{
    KeyFrameSelection, extract_frames, extract_key_frames, score_source, select_key_frames,
};
#[cfg(feature = "video")]
pub use preview::{extract_key_frames_from_path, select_key_frames_from_path};
#[cfg(all(feature = "video", feature = "gif"))]
pub use preview::{generate_preview, save_preview};
pub use progress::{OperationType, ProgressCallback, ProgressInfo};
pub use score::{ChangeScorer, ChangeSignal, luma_difference, score_frames};
pub use source::{FrameSource, MemorySource};
#[cfg(feature = "async")]
pub use task::PreviewTask;
#[cfg(feature = "video")]
pub use video_source::{VideoMetadata, VideoSource};
