mod hf;
mod keyword;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use hf::HfTextClassifier;
pub use keyword::KeywordClassifier;

/// One label of the classifier's vocabulary with its probability in [0, 1].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

#[derive(thiserror::Error, Debug)]
pub enum ClassifyError {
    #[error("invalid classifier endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("classifier api error: {0}")]
    Api(String),

    #[error("invalid classifier response: {0}")]
    InvalidResponse(String),
}

/// Scores an English-language text over the model's full label vocabulary.
///
/// The vocabulary is model-defined and open; callers must not assume the
/// fixed facial-emotion label set here.
pub trait TextClassifier: Send + Sync {
    fn classify(&self, text: String) -> BoxFuture<'_, Result<Vec<LabelScore>, ClassifyError>>;
}

impl TextClassifier for Box<dyn TextClassifier> {
    fn classify(&self, text: String) -> BoxFuture<'_, Result<Vec<LabelScore>, ClassifyError>> {
        (**self).classify(text)
    }
}
