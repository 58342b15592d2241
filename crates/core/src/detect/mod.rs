mod deepface;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use deepface::DeepFaceDetector;

/// Emotion analysis of a single detected face.
///
/// `emotion` maps label to a percentage in [0, 100]. `dominant_emotion` is
/// the detector's own designation and is trusted verbatim; its tie-break
/// policy is opaque, so it is never recomputed from the score map.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FaceAnalysis {
    pub emotion: BTreeMap<String, f32>,
    pub dominant_emotion: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectRequest {
    pub image_path: PathBuf,
    /// Fail instead of guessing when no face is found.
    pub enforce_detection: bool,
    /// Named face-detection backend, e.g. "opencv".
    pub backend: String,
}

#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("face detection failed: {0}")]
    DetectionFailed(String),

    #[error("detector api error: {0}")]
    Api(String),

    #[error("invalid detector response: {0}")]
    InvalidResponse(String),

    #[error("detector returned no face records")]
    NoRecords,
}

/// Runs emotion-only analysis on the image at the request's original path.
/// The preprocessed display buffer is never sent to the detector.
pub trait FaceDetector: Send + Sync {
    fn analyze(&self, request: DetectRequest) -> BoxFuture<'_, Result<FaceAnalysis, DetectError>>;
}

impl FaceDetector for Box<dyn FaceDetector> {
    fn analyze(&self, request: DetectRequest) -> BoxFuture<'_, Result<FaceAnalysis, DetectError>> {
        (**self).analyze(request)
    }
}

/// Detector responses are shape-polymorphic: one record, a list of records,
/// or a list wrapped in a `results` object depending on the backend version.
/// All shapes converge here before the pipeline sees them.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum AnalyzeShape {
    Many(Vec<FaceAnalysis>),
    Single(FaceAnalysis),
    Wrapped { results: Vec<FaceAnalysis> },
}

impl AnalyzeShape {
    /// Current policy: a multi-face response uses only the first record.
    pub fn into_first(self) -> Result<FaceAnalysis, DetectError> {
        let records = match self {
            AnalyzeShape::Single(record) => return Ok(record),
            AnalyzeShape::Many(records) => records,
            AnalyzeShape::Wrapped { results } => results,
        };
        let count = records.len();
        let first = records.into_iter().next().ok_or(DetectError::NoRecords)?;
        if count > 1 {
            tracing::debug!(dropped = count - 1, "multiple face records, keeping first");
        }
        Ok(first)
    }
}
