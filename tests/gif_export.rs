//! Animated GIF assembly tests.

#![cfg(feature = "gif")]

use std::io::{self, Cursor, Write};

use image::RgbImage;
use vidpeek::{
    ChannelOrder, DEFAULT_FRAME_DELAY, GifOptions, MemorySource, PreviewError, PreviewOptions,
    RawFrame, ThumbnailAssembler,
};

/// Accepts `remaining` bytes, then fails every further write.
struct CappedWriter {
    written: Vec<u8>,
    remaining: usize,
}

impl Write for CappedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.remaining == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "device full"));
        }
        let accepted = buf.len().min(self.remaining);
        self.written.extend_from_slice(&buf[..accepted]);
        self.remaining -= accepted;
        Ok(accepted)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn frames(count: u8, width: u32, height: u32) -> Vec<RgbImage> {
    (0..count)
        .map(|index| RgbImage::from_pixel(width, height, image::Rgb([index * 40, 90, 200])))
        .collect()
}

/// Decode `bytes` and return the logical screen size and every frame delay.
fn inspect(bytes: &[u8]) -> ((u16, u16), Vec<u16>) {
    let mut decoder = gif::DecodeOptions::new()
        .read_info(Cursor::new(bytes))
        .unwrap();
    let size = (decoder.width(), decoder.height());
    let mut delays = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        delays.push(frame.delay);
    }
    (size, delays)
}

#[test]
fn one_gif_frame_per_key_frame() {
    let bytes = ThumbnailAssembler::new(GifOptions::new())
        .to_bytes(&frames(4, 16, 12))
        .unwrap();
    assert!(bytes.starts_with(b"GIF89a"));

    let (size, delays) = inspect(&bytes);
    assert_eq!(size, (16, 12));
    assert_eq!(delays, vec![DEFAULT_FRAME_DELAY; 4]);
}

#[test]
fn custom_delay_and_width() {
    let options = GifOptions::new().width(32).frame_delay(25).repeat(Some(2));
    let bytes = ThumbnailAssembler::new(options)
        .to_bytes(&frames(3, 64, 36))
        .unwrap();

    let (size, delays) = inspect(&bytes);
    assert_eq!(size, (32, 18));
    assert_eq!(delays, vec![25, 25, 25]);
}

#[test]
fn empty_frame_list_is_rejected() {
    let result = ThumbnailAssembler::new(GifOptions::new()).to_bytes(&[]);
    assert!(matches!(result, Err(PreviewError::GifEncodeError(_))));
}

#[test]
fn save_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preview.gif");

    ThumbnailAssembler::new(GifOptions::new())
        .save(&path, &frames(2, 8, 8))
        .unwrap();

    let written = std::fs::read(&path).unwrap();
    assert!(written.starts_with(b"GIF89a"));
    assert_eq!(inspect(&written).1.len(), 2);
}

#[test]
fn synthetic_video_to_gif() {
    let decoded: Vec<RawFrame> = (0..40u8)
        .map(|index| {
            let shade = if index < 20 { 30 } else { 220 };
            RawFrame::solid(20, 10, ChannelOrder::Bgr, [shade, 0, 255 - shade])
        })
        .collect();
    let mut source = MemorySource::new(decoded, 10);
    let images =
        vidpeek::extract_key_frames(&mut source, &PreviewOptions::new().with_num_frames(4))
            .unwrap();

    let bytes = ThumbnailAssembler::new(GifOptions::new())
        .to_bytes(&images)
        .unwrap();
    let (size, delays) = inspect(&bytes);
    assert_eq!(size, (20, 10));
    assert_eq!(delays.len(), 4);
}

#[test]
fn failed_trailer_write_is_an_error() {
    let assembler = ThumbnailAssembler::new(GifOptions::new());
    let images = frames(3, 8, 8);
    let full = assembler.to_bytes(&images).unwrap();

    let mut writer = CappedWriter {
        written: Vec::new(),
        remaining: full.len() - 1,
    };
    let result = assembler.write(&mut writer, &images);
    assert!(matches!(result, Err(PreviewError::GifEncodeError(_))));
    assert_eq!(writer.written.len(), full.len() - 1);
}
