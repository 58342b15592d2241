use crate::classify::{ClassifyError, LabelScore, TextClassifier};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

/// Text emotion classifier backed by a Hugging Face inference endpoint
/// (by default `j-hartmann/emotion-english-distilroberta-base`).
#[derive(Clone)]
pub struct HfTextClassifier {
    client: Client,
    endpoint: Url,
    api_token: Option<String>,
}

impl HfTextClassifier {
    /// Constructing the classifier is the startup step that can fail; a
    /// failure here leaves the text capability unavailable for the whole
    /// process lifetime.
    pub fn new(endpoint: &str, api_token: Option<String>) -> Result<Self, ClassifyError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ClassifyError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            api_token,
        })
    }
}

#[derive(Serialize)]
struct HfRequest {
    inputs: String,
    options: HfOptions,
}

#[derive(Serialize)]
struct HfOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct HfLabelScore {
    label: String,
    score: f32,
}

impl TextClassifier for HfTextClassifier {
    fn classify(&self, text: String) -> BoxFuture<'_, Result<Vec<LabelScore>, ClassifyError>> {
        let this = self.clone();
        async move {
            let request = HfRequest {
                inputs: text,
                options: HfOptions {
                    wait_for_model: true,
                },
            };

            let mut builder = this.client.post(this.endpoint.clone()).json(&request);
            if let Some(token) = &this.api_token {
                builder = builder.header("Authorization", format!("Bearer {token}"));
            }

            let response = builder.send().await.map_err(ClassifyError::Network)?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(ClassifyError::Api(format!("HTTP {}: {}", status, error_text)));
            }

            // The endpoint answers with one score set per input, nested one
            // level: [[{label, score}, ...]]. We send a single input, so the
            // first (and only) set is the result.
            let sets: Vec<Vec<HfLabelScore>> = response
                .json()
                .await
                .map_err(|e| ClassifyError::InvalidResponse(format!("Failed to parse JSON: {}", e)))?;

            let first = sets.into_iter().next().ok_or_else(|| {
                ClassifyError::InvalidResponse("no score set in response".to_string())
            })?;

            Ok(first
                .into_iter()
                .map(|s| LabelScore {
                    label: s.label,
                    score: s.score,
                })
                .collect())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_endpoint() {
        assert!(matches!(
            HfTextClassifier::new("not a url", None).err(),
            Some(ClassifyError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn accepts_https_endpoint() {
        let classifier =
            HfTextClassifier::new("https://api-inference.huggingface.co/models/x", None);
        assert!(classifier.is_ok());
    }
}
