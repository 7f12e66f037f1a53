//! Desktop window showing the annotated camera picture.
//!
use image::RgbImage;
use minifb::{Key, Window, WindowOptions};

use crate::{live::FrameDisplay, Error};

/// Window opened lazily with the size of the first frame.
pub struct PoseWindow {
    title: String,
    window: Option<Window>,
    buffer: Vec<u32>,
}

impl PoseWindow {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            window: None,
            buffer: Vec::new(),
        }
    }
}

impl FrameDisplay for PoseWindow {
    fn exit_requested(&self) -> bool {
        match &self.window {
            Some(window) => {
                !window.is_open() || window.is_key_down(Key::Escape) || window.is_key_down(Key::Q)
            }
            None => false,
        }
    }

    fn show(&mut self, frame: &RgbImage, caption: &str) -> Result<(), Error> {
        let (width, height) = (frame.width() as usize, frame.height() as usize);

        let window = match self.window.take() {
            Some(window) => window,
            None => Window::new(
                &self.title,
                width,
                height,
                WindowOptions {
                    resize: true,
                    ..WindowOptions::default()
                },
            )?,
        };
        let window = self.window.insert(window);

        // minifb expects 0RGB packed into u32
        self.buffer.clear();
        self.buffer.extend(
            frame
                .pixels()
                .map(|p| (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32),
        );

        window.set_title(&format!("{} - {}", self.title, caption));
        window.update_with_buffer(&self.buffer, width, height)?;

        Ok(())
    }
}
