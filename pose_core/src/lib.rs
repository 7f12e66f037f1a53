//! Shared pipeline of the yoga pose classifier: decode, normalize, classify, format.
pub mod error;
pub mod frame;
pub mod labels;
pub mod logging;
pub mod nn;
pub mod prediction;
pub mod preprocess;
pub mod service;

pub use error::PoseError;
pub use frame::{ChannelOrder, ImageFrame};
pub use labels::LabelSet;
pub use nn::{OnnxPoseModel, PoseModel};
pub use prediction::Prediction;
pub use preprocess::NormalizedBatch;
pub use service::PoseService;

/// Error type.
pub type Error = Box<dyn std::error::Error>;
