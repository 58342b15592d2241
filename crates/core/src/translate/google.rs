use crate::translate::{TranslateError, Translation, Translator};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;

const TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Translator backed by the public Google Translate web endpoint.
///
/// Source language is always auto-detected and the target is English, which is
/// what the text classifier expects.
#[derive(Clone)]
pub struct GoogleTranslator {
    client: Client,
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: String) -> BoxFuture<'_, Result<Translation, TranslateError>> {
        let this = self.clone();
        async move {
            let url = format!(
                "{TRANSLATE_ENDPOINT}?client=gtx&sl=auto&tl=en&dt=t&q={}",
                urlencoding::encode(&text)
            );

            let response = this
                .client
                .get(url)
                .send()
                .await
                .map_err(TranslateError::Network)?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(TranslateError::Api(format!("HTTP {}: {}", status, error_text)));
            }

            let body: serde_json::Value = response
                .json()
                .await
                .map_err(|e| TranslateError::InvalidResponse(format!("Failed to parse JSON: {}", e)))?;

            parse_translate_body(&body)
        }
        .boxed()
    }
}

/// The endpoint answers with nested arrays rather than an object: index 0
/// holds the translated segments and index 2 the detected source language.
fn parse_translate_body(body: &serde_json::Value) -> Result<Translation, TranslateError> {
    let segments = body
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslateError::InvalidResponse("missing segment array".to_string()))?;

    let mut text = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(|v| v.as_str()) {
            text.push_str(part);
        }
    }

    if text.is_empty() {
        return Err(TranslateError::InvalidResponse(
            "no translated text in response".to_string(),
        ));
    }

    let detected_source_lang = body
        .get(2)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Ok(Translation {
        text,
        detected_source_lang,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_segmented_response() {
        let body = serde_json::json!([
            [["I am happy", "Estou feliz", null, null, 10], [" today", " hoje", null, null, 10]],
            null,
            "pt"
        ]);
        let translation = parse_translate_body(&body).expect("valid body");
        assert_eq!(translation.text, "I am happy today");
        assert_eq!(translation.detected_source_lang.as_deref(), Some("pt"));
    }

    #[test]
    fn rejects_body_without_segments() {
        let body = serde_json::json!({ "error": "nope" });
        assert!(matches!(
            parse_translate_body(&body),
            Err(TranslateError::InvalidResponse(_))
        ));
    }

    #[test]
    fn rejects_empty_segment_list() {
        let body = serde_json::json!([[], null, "en"]);
        assert!(matches!(
            parse_translate_body(&body),
            Err(TranslateError::InvalidResponse(_))
        ));
    }
}
