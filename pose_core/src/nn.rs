//! Pose classifier backed by an ONNX model.
//!
use std::path::{Path, PathBuf};

use tract_onnx::prelude::*;

use crate::{
    preprocess::{NormalizedBatch, INPUT_SIZE},
    PoseError,
};

type NnModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Maps a normalized batch to one probability per label.
pub trait PoseModel: Send + Sync {
    fn predict(&self, batch: &NormalizedBatch) -> Result<Vec<f32>, PoseError>;
}

/// Image classifier exported to ONNX, with a softmax over the pose classes as output.
pub struct OnnxPoseModel {
    model: NnModel,
    path: PathBuf,
}

impl OnnxPoseModel {
    /// Load, optimize and prepare the model for a fixed `f32 (1, 224, 224, 3)` input.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PoseError> {
        let path = path.as_ref().to_path_buf();
        let model = get_pose_model(&path).map_err(|err| PoseError::ModelLoad {
            path: path.clone(),
            reason: err.to_string(),
        })?;

        Ok(Self { model, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PoseModel for OnnxPoseModel {
    fn predict(&self, batch: &NormalizedBatch) -> Result<Vec<f32>, PoseError> {
        let input = tvec!(batch.clone().into_tensor().into());
        let raw_nn_out = self
            .model
            .run(input)
            .map_err(|err| PoseError::Inference(err.to_string()))?;

        let scores = raw_nn_out
            .first()
            .ok_or_else(|| PoseError::Inference("model produced no output".into()))?
            .to_array_view::<f32>()
            .map_err(|err| PoseError::Inference(err.to_string()))?
            .iter()
            .cloned()
            .collect();

        Ok(scores)
    }
}

fn get_pose_model(path: &Path) -> TractResult<NnModel> {
    let size = INPUT_SIZE as usize;
    let input_fact = InferenceFact::dt_shape(f32::datum_type(), tvec!(1, size, size, 3));
    let model = tract_onnx::onnx()
        .model_for_path(path)?
        .with_input_fact(0, input_fact)?
        .into_optimized()?
        .into_runnable()?;

    Ok(model)
}
