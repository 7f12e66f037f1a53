//! Image frames and decoding of encoded image payloads.
//!
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops, RgbImage};

use crate::PoseError;

/// Order of the three color channels in a frame's pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    /// Blue-green-red, as delivered by many camera pipelines.
    Bgr,
}

/// 3-channel, 8-bit pixel grid of arbitrary size.
///
/// The pixels are kept in an `RgbImage` container regardless of `order`; for
/// `ChannelOrder::Bgr` frames the first channel of every pixel holds blue.
#[derive(Clone, Debug)]
pub struct ImageFrame {
    pixels: RgbImage,
    order: ChannelOrder,
}

impl ImageFrame {
    pub fn new(pixels: RgbImage, order: ChannelOrder) -> Self {
        Self { pixels, order }
    }

    /// Wrap a raw, packed 3-bytes-per-pixel buffer. Returns `None` if the buffer
    /// length does not match the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>, order: ChannelOrder) -> Option<Self> {
        RgbImage::from_raw(width, height, data).map(|pixels| Self::new(pixels, order))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Flip the frame horizontally, so a webcam picture reads like a mirror.
    pub fn mirror(&mut self) {
        imageops::flip_horizontal_in_place(&mut self.pixels);
    }

    /// Convert into an image in red-green-blue order.
    pub fn into_rgb(self) -> RgbImage {
        match self.order {
            ChannelOrder::Rgb => self.pixels,
            ChannelOrder::Bgr => {
                let mut pixels = self.pixels;
                for pixel in pixels.pixels_mut() {
                    pixel.0.swap(0, 2);
                }
                pixels
            }
        }
    }
}

/// Remove a `data:<mime>;base64,` prefix if present. Only the segment up to a
/// second comma is kept.
pub fn strip_data_uri(payload: &str) -> &str {
    payload.split(',').nth(1).unwrap_or(payload)
}

/// Decode a base64 payload, optionally wrapped as a data URI, into a frame.
///
/// Whitespace anywhere in the payload is ignored, so line-wrapped base64 decodes.
pub fn decode_base64_image(payload: &str) -> Result<ImageFrame, PoseError> {
    let data: String = strip_data_uri(payload).split_ascii_whitespace().collect();
    let bytes = STANDARD.decode(data)?;
    decode_image_bytes(&bytes)
}

/// Decode encoded image bytes (JPEG, PNG, ...) into an RGB frame.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<ImageFrame, PoseError> {
    if bytes.is_empty() {
        return Err(PoseError::ImageDecode("image data is empty".into()));
    }

    let image = image::load_from_memory(bytes)?;
    Ok(ImageFrame::new(image.to_rgb8(), ChannelOrder::Rgb))
}
