//! Pose service owning the loaded classifier.
//!
use std::path::Path;

use crate::{
    nn::{OnnxPoseModel, PoseModel},
    preprocess::normalize,
    ImageFrame, LabelSet, PoseError, Prediction,
};

/// Classifier handle shared by the HTTP handlers and the live loop.
///
/// Built once at startup and read-only afterwards. A service without a model
/// answers every classification with `PoseError::ModelNotLoaded`.
pub struct PoseService {
    model: Option<Box<dyn PoseModel>>,
    labels: LabelSet,
}

impl PoseService {
    pub fn new(model: impl PoseModel + 'static, labels: LabelSet) -> Self {
        Self {
            model: Some(Box::new(model)),
            labels,
        }
    }

    pub fn without_model(labels: LabelSet) -> Self {
        Self {
            model: None,
            labels,
        }
    }

    /// Load the ONNX model at `path`.
    pub fn load(path: impl AsRef<Path>, labels: LabelSet) -> Result<Self, PoseError> {
        let model = OnnxPoseModel::load(path)?;
        log::info!("Model loaded from {}", model.path().display());
        Ok(Self::new(model, labels))
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Normalize the frame, run the classifier and format the result.
    pub fn classify(&self, frame: &ImageFrame) -> Result<Prediction, PoseError> {
        let model = self.model.as_ref().ok_or(PoseError::ModelNotLoaded)?;

        let batch = normalize(frame);
        let scores = model.predict(&batch)?;

        Prediction::from_scores(&self.labels, &scores)
    }
}

#[cfg(test)]
mod test {

    use image::{Rgb, RgbImage};

    use super::*;
    use crate::{preprocess::BATCH_SHAPE, ChannelOrder, NormalizedBatch};

    struct FixedScores(Vec<f32>);

    impl PoseModel for FixedScores {
        fn predict(&self, batch: &NormalizedBatch) -> Result<Vec<f32>, PoseError> {
            assert_eq!(batch.shape(), &BATCH_SHAPE[..]);
            Ok(self.0.clone())
        }
    }

    fn frame() -> ImageFrame {
        ImageFrame::new(RgbImage::from_pixel(320, 240, Rgb([90, 60, 30])), ChannelOrder::Bgr)
    }

    #[test]
    fn classifies_with_the_loaded_model() -> Result<(), PoseError> {
        let service = PoseService::new(
            FixedScores(vec![0.1, 0.1, 0.1, 0.65, 0.05]),
            LabelSet::default(),
        );
        assert!(service.is_loaded());

        let first = service.classify(&frame())?;
        let second = service.classify(&frame())?;

        assert_eq!(first.pose, "tree");
        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn reports_a_missing_model() {
        let service = PoseService::without_model(LabelSet::default());

        assert!(!service.is_loaded());
        assert!(matches!(
            service.classify(&frame()),
            Err(PoseError::ModelNotLoaded)
        ));
    }

    #[test]
    fn model_with_wrong_output_size_fails_inference() {
        let service = PoseService::new(FixedScores(vec![1.0; 1000]), LabelSet::default());

        assert!(matches!(
            service.classify(&frame()),
            Err(PoseError::Inference(_))
        ));
    }

    #[test]
    fn loading_a_missing_file_fails() {
        let result = PoseService::load("no_such_model.onnx", LabelSet::default());
        assert!(matches!(result, Err(PoseError::ModelLoad { .. })));
    }
}
