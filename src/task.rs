//! Async wrapper for services.
//!
//! Key-frame selection is CPU-bound FFmpeg work. [`PreviewTask`] runs the
//! whole pipeline on `tokio::task::spawn_blocking` so an async request
//! handler can await the GIF without stalling the runtime's worker threads.
//!
//! This module is available when the `async` feature is enabled.
//!
//! # Example
//!
//! ```no_run
//! use vidpeek::{GifOptions, PreviewError, PreviewOptions, PreviewTask};
//!
//! # async fn example() -> Result<(), PreviewError> {
//! let gif = PreviewTask::spawn("input.mp4", PreviewOptions::new(), GifOptions::new()).await?;
//! println!("{} bytes", gif.len());
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::assembler::GifOptions;
use crate::config::PreviewOptions;
use crate::error::PreviewError;

/// A preview being generated on a blocking thread.
///
/// Resolves to the encoded GIF bytes. Dropping the task does not stop the
/// background work; it runs to completion and its result is discarded.
pub struct PreviewTask {
    handle: JoinHandle<Result<Vec<u8>, PreviewError>>,
}

impl PreviewTask {
    /// Start generating the preview of the video at `path`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<P: Into<PathBuf>>(
        path: P,
        options: PreviewOptions,
        gif_options: GifOptions,
    ) -> Self {
        let path = path.into();
        let handle = tokio::task::spawn_blocking(move || {
            crate::preview::generate_preview(&path, &options, &gif_options)
        });
        Self { handle }
    }
}

impl Future for PreviewTask {
    type Output = Result<Vec<u8>, PreviewError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle).poll(cx).map(|result| {
            result.unwrap_or_else(|error| Err(PreviewError::TaskFailed(error.to_string())))
        })
    }
}
