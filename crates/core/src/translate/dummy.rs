use crate::translate::{TranslateError, Translation, Translator};
use futures::future::BoxFuture;
use futures::FutureExt;

/// Passthrough translator used when translation is disabled or offline.
#[derive(Clone)]
pub struct DummyTranslator;

impl DummyTranslator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for DummyTranslator {
    fn translate(&self, text: String) -> BoxFuture<'_, Result<Translation, TranslateError>> {
        async move {
            Ok(Translation {
                text,
                detected_source_lang: Some("en".to_string()),
            })
        }
        .boxed()
    }
}
