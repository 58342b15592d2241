use crate::detect::{AnalyzeShape, DetectError, DetectRequest, FaceAnalysis, FaceDetector};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Facial emotion detector backed by a DeepFace API server.
#[derive(Clone)]
pub struct DeepFaceDetector {
    client: Client,
    base_url: String,
}

impl DeepFaceDetector {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Serialize)]
struct AnalyzeRequestBody {
    img_path: String,
    actions: Vec<&'static str>,
    enforce_detection: bool,
    detector_backend: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl FaceDetector for DeepFaceDetector {
    fn analyze(&self, request: DetectRequest) -> BoxFuture<'_, Result<FaceAnalysis, DetectError>> {
        let this = self.clone();
        async move {
            let body = AnalyzeRequestBody {
                img_path: request.image_path.to_string_lossy().into_owned(),
                actions: vec!["emotion"],
                enforce_detection: request.enforce_detection,
                detector_backend: request.backend,
            };

            let response = this
                .client
                .post(format!("{}/analyze", this.base_url))
                .json(&body)
                .send()
                .await
                .map_err(DetectError::Network)?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                let message = serde_json::from_str::<ErrorBody>(&error_text)
                    .map(|b| b.error)
                    .unwrap_or(error_text);
                // With enforce_detection the server answers 4xx when no face
                // is found; everything else is a backend fault.
                if status == StatusCode::BAD_REQUEST {
                    return Err(DetectError::DetectionFailed(message));
                }
                return Err(DetectError::Api(format!("HTTP {}: {}", status, message)));
            }

            let shape: AnalyzeShape = response
                .json()
                .await
                .map_err(|e| DetectError::InvalidResponse(format!("Failed to parse JSON: {}", e)))?;

            shape.into_first()
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let detector = DeepFaceDetector::new("http://127.0.0.1:5005/".to_string());
        assert_eq!(detector.base_url, "http://127.0.0.1:5005");
    }
}
