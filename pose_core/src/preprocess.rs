//! Image normalizer turning frames into model-ready batches.
//!
use image::imageops::{self, FilterType};
use tract_onnx::prelude::{tract_ndarray::Array4, Tensor};

use crate::{ChannelOrder, ImageFrame};

/// Width and height the classifier was trained on.
pub const INPUT_SIZE: u32 = 224;

/// Shape of a normalized batch: one 224×224 RGB image, NHWC.
pub const BATCH_SHAPE: [usize; 4] = [1, INPUT_SIZE as usize, INPUT_SIZE as usize, 3];

/// Single-image batch, channel-reordered to RGB and scaled to [-1, 1].
#[derive(Clone, Debug)]
pub struct NormalizedBatch(Array4<f32>);

impl NormalizedBatch {
    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.0
    }

    pub fn into_tensor(self) -> Tensor {
        self.0.into()
    }
}

/// Resize (stretching, no aspect ratio preservation), reorder channels to RGB and
/// scale the values the way MobileNetV2 was trained.
pub fn normalize(frame: &ImageFrame) -> NormalizedBatch {
    let resized = imageops::resize(
        frame.pixels(),
        INPUT_SIZE,
        INPUT_SIZE,
        // Bilinear, like the resize used at training time
        FilterType::Triangle,
    );

    // Position of red, green and blue in the source pixel
    let source_channel = match frame.order() {
        ChannelOrder::Rgb => [0, 1, 2],
        ChannelOrder::Bgr => [2, 1, 0],
    };

    let batch = Array4::from_shape_fn(
        (BATCH_SHAPE[0], BATCH_SHAPE[1], BATCH_SHAPE[2], BATCH_SHAPE[3]),
        |(_, y, x, c)| scale(resized[(x as u32, y as u32)][source_channel[c]]),
    );

    NormalizedBatch(batch)
}

/// Map `[0, 255]` to `[-1, 1]`.
fn scale(value: u8) -> f32 {
    value as f32 / 127.5 - 1.0
}
