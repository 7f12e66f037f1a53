//! Live yoga pose classification on a webcam picture.
pub mod live;
pub mod overlay;
#[cfg(feature = "device")]
pub mod sensors;
#[cfg(feature = "device")]
pub mod window;

/// Error type.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
