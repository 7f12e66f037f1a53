//! Live capture loop: capture, classify, draw, show, until the user quits.
//!
use image::RgbImage;
use pose_core::{ImageFrame, PoseService};

use crate::{overlay::OverlayRenderer, Error};

/// Something that delivers camera frames.
pub trait FrameSource {
    fn capture(&mut self) -> Result<ImageFrame, Error>;
}

/// Something that shows frames and tells when the user wants to stop.
pub trait FrameDisplay {
    /// Window closed or an exit key (ESC, `q`) pressed.
    fn exit_requested(&self) -> bool;

    fn show(&mut self, frame: &RgbImage, caption: &str) -> Result<(), Error>;
}

/// Run until the display asks to exit or a frame cannot be captured.
///
/// Returns the number of frames shown. Classification failures, including a
/// model that could not be loaded, are shown as the caption instead of ending
/// the loop.
pub fn run(
    source: &mut impl FrameSource,
    display: &mut impl FrameDisplay,
    service: &PoseService,
    overlay: &OverlayRenderer,
) -> Result<u64, Error> {
    let mut shown = 0;

    while !display.exit_requested() {
        let mut frame = match source.capture() {
            Ok(frame) => frame,
            Err(err) => {
                log::error!("Could not read frame from camera: {err}");
                break;
            }
        };

        // Mirror, so moving left moves left on screen
        frame.mirror();

        let caption = match service.classify(&frame) {
            Ok(prediction) => prediction.overlay_text(),
            Err(err) => {
                log::debug!("Classification failed: {err}");
                err.to_string()
            }
        };

        let picture = overlay.render(frame.into_rgb(), &caption);
        display.show(&picture, &caption)?;
        shown += 1;
    }

    log::info!("Live loop stopped after {shown} frames");
    Ok(shown)
}

#[cfg(test)]
mod test {

    use std::collections::VecDeque;

    use image::Rgb;
    use pose_core::{ChannelOrder, LabelSet, NormalizedBatch, PoseError, PoseModel};
    use simple_error::simple_error;

    use super::*;

    struct ScriptedSource {
        frames: VecDeque<ImageFrame>,
    }

    impl ScriptedSource {
        fn repeat(frame: ImageFrame, count: usize) -> Self {
            Self {
                frames: std::iter::repeat(frame).take(count).collect(),
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn capture(&mut self) -> Result<ImageFrame, Error> {
            self.frames
                .pop_front()
                .ok_or_else(|| simple_error!("camera unplugged").into())
        }
    }

    #[derive(Default)]
    struct RecordingDisplay {
        quit_after: Option<usize>,
        captions: Vec<String>,
        frames: Vec<RgbImage>,
    }

    impl FrameDisplay for RecordingDisplay {
        fn exit_requested(&self) -> bool {
            self.quit_after
                .map_or(false, |limit| self.captions.len() >= limit)
        }

        fn show(&mut self, frame: &RgbImage, caption: &str) -> Result<(), Error> {
            self.frames.push(frame.clone());
            self.captions.push(caption.to_owned());
            Ok(())
        }
    }

    struct AlwaysPlank;

    impl PoseModel for AlwaysPlank {
        fn predict(&self, _batch: &NormalizedBatch) -> Result<Vec<f32>, PoseError> {
            Ok(vec![0.05, 0.05, 0.8, 0.05, 0.05])
        }
    }

    fn gray_frame() -> ImageFrame {
        ImageFrame::new(RgbImage::from_pixel(64, 48, Rgb([90, 90, 90])), ChannelOrder::Rgb)
    }

    #[test]
    fn stops_when_the_user_quits() -> Result<(), Error> {
        let mut source = ScriptedSource::repeat(gray_frame(), 10);
        let mut display = RecordingDisplay {
            quit_after: Some(3),
            ..Default::default()
        };
        let service = PoseService::new(AlwaysPlank, LabelSet::default());

        let shown = run(&mut source, &mut display, &service, &OverlayRenderer::without_font())?;

        assert_eq!(shown, 3);
        assert_eq!(display.captions, vec!["Pose: plank (80.0%)"; 3]);
        assert_eq!(source.frames.len(), 7);

        Ok(())
    }

    #[test]
    fn stops_when_the_camera_fails() -> Result<(), Error> {
        let mut source = ScriptedSource::repeat(gray_frame(), 2);
        let mut display = RecordingDisplay::default();
        let service = PoseService::new(AlwaysPlank, LabelSet::default());

        let shown = run(&mut source, &mut display, &service, &OverlayRenderer::without_font())?;

        assert_eq!(shown, 2);

        Ok(())
    }

    #[test]
    fn shows_model_not_loaded_instead_of_a_pose() -> Result<(), Error> {
        let mut source = ScriptedSource::repeat(gray_frame(), 2);
        let mut display = RecordingDisplay::default();
        let service = PoseService::without_model(LabelSet::default());

        run(&mut source, &mut display, &service, &OverlayRenderer::without_font())?;

        assert_eq!(display.captions, vec!["Model not loaded"; 2]);

        Ok(())
    }

    #[test]
    fn displayed_frames_are_mirrored_rgb() -> Result<(), Error> {
        // Blue on the left, red on the right, in camera-native BGR order
        let frame = ImageFrame::from_raw(2, 1, vec![255, 0, 0, 0, 0, 255], ChannelOrder::Bgr)
            .ok_or("bad frame")?;
        let mut source = ScriptedSource::repeat(frame, 1);
        let mut display = RecordingDisplay::default();
        let service = PoseService::new(AlwaysPlank, LabelSet::default());

        run(&mut source, &mut display, &service, &OverlayRenderer::without_font())?;

        let shown = &display.frames[0];
        assert_eq!(shown[(0, 0)], Rgb([255, 0, 0]));
        assert_eq!(shown[(1, 0)], Rgb([0, 0, 255]));

        Ok(())
    }
}
