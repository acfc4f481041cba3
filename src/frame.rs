//! Decoded raster frames.
//!
//! A [`FrameSource`](crate::FrameSource) hands out [`RawFrame`] values in
//! whatever channel order its decoder produces natively. The rest of the
//! pipeline only ever looks at them through two views: single-channel
//! luminance for change scoring, and canonical RGB for the final preview.
//!
//! Luminance uses the BT.601 weights (0.299, 0.587, 0.114) that video
//! tooling conventionally applies to 8-bit frames, rather than the Rec.709
//! weights of [`image::imageops::grayscale`]. Colour-only cuts therefore
//! score the same as they would in an OpenCV-style pipeline.

use image::{GrayImage, RgbImage};

use crate::error::PreviewError;

/// Byte order of the three colour samples in a [`RawFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    /// Red, green, blue. This is the canonical order of extracted frames.
    #[default]
    Rgb,
    /// Blue, green, red, as produced by many capture and decode APIs.
    Bgr,
}

/// A decoded 8-bit, 3-channel frame with tightly packed rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    width: u32,
    height: u32,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl RawFrame {
    /// Wrap a packed pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError::InvalidFrame`] if either dimension is zero or
    /// `data` is not exactly `width * height * 3` bytes long.
    pub fn new(
        width: u32,
        height: u32,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self, PreviewError> {
        if width == 0 || height == 0 {
            return Err(PreviewError::InvalidFrame(format!(
                "dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(PreviewError::InvalidFrame(format!(
                "expected {expected} bytes for a {width}x{height} frame, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            order,
            data,
        })
    }

    /// Build a frame where every pixel has the same colour.
    ///
    /// `color` is given in `order`, i.e. `[b, g, r]` for [`ChannelOrder::Bgr`].
    pub fn solid(width: u32, height: u32, order: ChannelOrder, color: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let data = color.iter().copied().cycle().take(pixels * 3).collect();
        Self {
            width,
            height,
            order,
            data,
        }
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Native channel order of the pixel data.
    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    /// Raw packed pixel data in [`order`](RawFrame::order).
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Convert to canonical RGB, consuming the frame.
    pub fn into_rgb(self) -> RgbImage {
        let (width, height) = (self.width, self.height);
        let mut data = self.data;
        if self.order == ChannelOrder::Bgr {
            for pixel in data.chunks_exact_mut(3) {
                pixel.swap(0, 2);
            }
        }
        // Length was checked at construction.
        RgbImage::from_raw(width, height, data).unwrap_or_else(|| RgbImage::new(width, height))
    }

    /// Single-channel BT.601 luminance view used for change scoring.
    pub fn luma(&self) -> GrayImage {
        let (red, blue) = match self.order {
            ChannelOrder::Rgb => (0, 2),
            ChannelOrder::Bgr => (2, 0),
        };
        let luma = self
            .data
            .chunks_exact(3)
            .map(|pixel| bt601_luma(pixel[red], pixel[1], pixel[blue]))
            .collect();
        // Length was checked at construction.
        GrayImage::from_raw(self.width, self.height, luma)
            .unwrap_or_else(|| GrayImage::new(self.width, self.height))
    }
}

/// Rounded fixed-point BT.601 luma of one 8-bit RGB sample.
fn bt601_luma(red: u8, green: u8, blue: u8) -> u8 {
    let weighted = 299 * u32::from(red) + 587 * u32::from(green) + 114 * u32::from(blue);
    ((weighted + 500) / 1000) as u8
}

impl From<RgbImage> for RawFrame {
    fn from(image: RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            order: ChannelOrder::Rgb,
            data: image.into_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChannelOrder, RawFrame};

    #[test]
    fn rejects_short_buffer() {
        assert!(RawFrame::new(2, 2, ChannelOrder::Rgb, vec![0; 11]).is_err());
        assert!(RawFrame::new(0, 2, ChannelOrder::Rgb, Vec::new()).is_err());
        assert!(RawFrame::new(2, 2, ChannelOrder::Rgb, vec![0; 12]).is_ok());
    }

    #[test]
    fn bgr_frames_are_swapped_to_rgb() {
        let frame = RawFrame::solid(3, 2, ChannelOrder::Bgr, [10, 20, 30]);
        let rgb = frame.into_rgb();
        assert!(rgb.pixels().all(|pixel| pixel.0 == [30, 20, 10]));
    }

    #[test]
    fn luma_of_gray_is_identity() {
        let frame = RawFrame::solid(4, 4, ChannelOrder::Rgb, [128, 128, 128]);
        assert!(frame.luma().pixels().all(|pixel| pixel.0 == [128]));
    }

    #[test]
    fn luma_uses_bt601_weights() {
        let red = RawFrame::solid(2, 2, ChannelOrder::Rgb, [255, 0, 0]);
        let green = RawFrame::solid(2, 2, ChannelOrder::Rgb, [0, 255, 0]);
        let blue = RawFrame::solid(2, 2, ChannelOrder::Rgb, [0, 0, 255]);
        assert_eq!(red.luma().get_pixel(0, 0).0, [76]);
        assert_eq!(green.luma().get_pixel(1, 1).0, [150]);
        assert_eq!(blue.luma().get_pixel(0, 1).0, [29]);
        assert_eq!(
            RawFrame::solid(1, 1, ChannelOrder::Rgb, [255; 3]).luma().get_pixel(0, 0).0,
            [255]
        );
    }

    #[test]
    fn bgr_luma_matches_rgb_luma() {
        let rgb = RawFrame::solid(3, 3, ChannelOrder::Rgb, [200, 40, 10]);
        let bgr = RawFrame::solid(3, 3, ChannelOrder::Bgr, [10, 40, 200]);
        assert_eq!(rgb.luma(), bgr.luma());
    }
}
