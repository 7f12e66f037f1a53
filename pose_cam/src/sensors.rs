//! Sensors module.
//!
use std::str::FromStr;

use pose_core::{frame::decode_image_bytes, ChannelOrder, ImageFrame};
use rscam::{Camera, Config};
use simple_error::simple_error;

use crate::{live::FrameSource, Error};

/// Pixel formats the camera may be asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// Motion JPEG, every frame a JPEG image.
    Mjpg,
    /// Packed 24-bit blue-green-red.
    Bgr3,
    /// Packed 24-bit red-green-blue.
    Rgb3,
}

impl PixelFormat {
    pub fn fourcc(&self) -> &'static [u8; 4] {
        match self {
            PixelFormat::Mjpg => b"MJPG",
            PixelFormat::Bgr3 => b"BGR3",
            PixelFormat::Rgb3 => b"RGB3",
        }
    }
}

impl FromStr for PixelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MJPG" => Ok(PixelFormat::Mjpg),
            "BGR3" => Ok(PixelFormat::Bgr3),
            "RGB3" => Ok(PixelFormat::Rgb3),
            other => Err(format!("unsupported pixel format {other}, use MJPG, BGR3 or RGB3")),
        }
    }
}

/// Started V4L2 camera on a Linux machine.
pub struct V4lCamera {
    cam: Camera,
    format: PixelFormat,
}

impl V4lCamera {
    /// Open and start a video device. Without an explicit resolution or frame
    /// rate, the highest the device supports for `format` is used.
    pub fn open(
        device_name: &str,
        format: PixelFormat,
        resolution: Option<(u32, u32)>,
        frame_rate: Option<(u32, u32)>,
    ) -> Result<Self, Error> {
        let mut cam = Camera::new(device_name)?;
        log_supported_formats(&cam, format);
        let fourcc = format.fourcc();

        log::info!("Using camera {}", device_name);

        let resolution = resolution
            .map(Ok)
            .unwrap_or_else(|| get_max_resolution(&cam, fourcc))?;

        let frame_rate = frame_rate
            .map(Ok)
            .unwrap_or_else(|| get_max_frame_rate(&cam, fourcc, resolution))?;

        log::info!(
            "Capturing {}x{} at interval {}/{}s",
            resolution.0,
            resolution.1,
            frame_rate.0,
            frame_rate.1
        );

        cam.start(&Config {
            interval: frame_rate,
            resolution,
            format: fourcc,
            ..Default::default()
        })?;

        Ok(Self { cam, format })
    }
}

impl FrameSource for V4lCamera {
    fn capture(&mut self) -> Result<ImageFrame, Error> {
        let frame = self.cam.capture()?;
        let (width, height) = frame.resolution;

        let order = match self.format {
            PixelFormat::Mjpg => return Ok(decode_image_bytes(&frame)?),
            PixelFormat::Bgr3 => ChannelOrder::Bgr,
            PixelFormat::Rgb3 => ChannelOrder::Rgb,
        };

        ImageFrame::from_raw(width, height, frame.to_vec(), order).ok_or_else(|| {
            simple_error!("raw frame of {} bytes does not fit {width}x{height}", frame.len()).into()
        })
    }
}

/// Get the maximum supported resolution for the given format.
fn get_max_resolution(cam: &Camera, format: &[u8]) -> Result<(u32, u32), Error> {
    let resolution_info = cam.resolutions(format)?;
    log::debug!("Found resolutions: {:?}", &resolution_info);
    match resolution_info {
        rscam::ResolutionInfo::Discretes(resolutions) => resolutions
            .into_iter()
            // Highest resolution in terms of number of pixels
            .max_by_key(|(width, height)| width * height),
        rscam::ResolutionInfo::Stepwise { max, .. } => Some(max),
    }
    .ok_or_else(|| simple_error!("No resolution found").into())
}

/// Get the maximum supported frame rate for the given format and resolution.
///
/// Frame rates are expressed as intervals `(numerator, denominator)` in seconds,
/// so the highest rate is the shortest interval.
fn get_max_frame_rate(
    cam: &Camera,
    format: &[u8],
    resolution: (u32, u32),
) -> Result<(u32, u32), Error> {
    let interval_info = cam.intervals(format, resolution)?;
    log::debug!("Found frame rates: {:?}", &interval_info);
    match interval_info {
        rscam::IntervalInfo::Discretes(intervals) => intervals
            .into_iter()
            // a/b < c/d  <=>  a*d < c*b
            .min_by(|(a, b), (c, d)| (a * d).cmp(&(c * b))),
        rscam::IntervalInfo::Stepwise { min, .. } => Some(min),
    }
    .ok_or_else(|| simple_error!("No frame rate found").into())
}

fn log_supported_formats(cam: &Camera, format: PixelFormat) {
    let formats: Vec<_> = cam.formats().filter_map(Result::ok).collect();
    log::debug!(
        "Supported formats: {:?}, using format {:?}",
        formats,
        format
    );
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn parses_pixel_formats() {
        assert_eq!("mjpg".parse::<PixelFormat>(), Ok(PixelFormat::Mjpg));
        assert_eq!("BGR3".parse::<PixelFormat>(), Ok(PixelFormat::Bgr3));
        assert_eq!(PixelFormat::Rgb3.fourcc(), b"RGB3");
        assert!("YUYV".parse::<PixelFormat>().is_err());
    }

    #[test]
    fn get_cam_info_if_available() -> Result<(), Error> {
        let cam_name = "/dev/video0";
        let cam = Camera::new(cam_name);

        match cam {
            Err(err) => println!("Could not initialize camera (maybe non available): {err}"),
            Ok(cam) => {
                let format = PixelFormat::Mjpg.fourcc();

                let resolution = get_max_resolution(&cam, format)?;
                println!("Selected resolution: {resolution:?}");

                let frame_rate = get_max_frame_rate(&cam, format, resolution)?;
                println!("Selected frame interval: {frame_rate:?}");
            }
        }

        Ok(())
    }
}
