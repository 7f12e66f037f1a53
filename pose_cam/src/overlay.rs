//! Text overlay drawn onto the displayed camera picture.
//!
use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{Font, Scale};
use simple_error::simple_error;

use crate::Error;

/// Hint shown in the bottom-left corner.
pub const EXIT_HINT: &str = "ESC or q: quit";

const CAPTION_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const HINT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const CAPTION_SCALE: f32 = 26.0;
const HINT_SCALE: f32 = 20.0;
const MARGIN: i32 = 10;

/// Draws the prediction caption and the exit hint onto frames.
///
/// Without a font the frame is left untouched and the caption only ends up in
/// the window title.
pub struct OverlayRenderer {
    font: Option<Font<'static>>,
}

impl OverlayRenderer {
    pub fn from_font_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let font_data = std::fs::read(path)?;
        let font = Font::try_from_vec(font_data)
            .ok_or_else(|| simple_error!("not a TrueType font: {}", path.display()))?;

        Ok(Self { font: Some(font) })
    }

    pub fn without_font() -> Self {
        Self { font: None }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn render(&self, mut frame: RgbImage, caption: &str) -> RgbImage {
        if let Some(font) = &self.font {
            draw_text_mut(
                &mut frame,
                CAPTION_COLOR,
                MARGIN,
                MARGIN,
                Scale::uniform(CAPTION_SCALE),
                font,
                caption,
            );

            let hint_y = frame.height() as i32 - MARGIN - HINT_SCALE as i32;
            draw_text_mut(
                &mut frame,
                HINT_COLOR,
                MARGIN,
                hint_y,
                Scale::uniform(HINT_SCALE),
                font,
                EXIT_HINT,
            );
        }

        frame
    }
}
