mod dummy;
mod google;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use dummy::DummyTranslator;
pub use google::GoogleTranslator;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub detected_source_lang: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("translation api error: {0}")]
    Api(String),

    #[error("invalid translation response: {0}")]
    InvalidResponse(String),
}

/// Translates text from an auto-detected source language into English.
pub trait Translator: Send + Sync {
    fn translate(&self, text: String) -> BoxFuture<'_, Result<Translation, TranslateError>>;
}

impl Translator for Box<dyn Translator> {
    fn translate(&self, text: String) -> BoxFuture<'_, Result<Translation, TranslateError>> {
        (**self).translate(text)
    }
}
