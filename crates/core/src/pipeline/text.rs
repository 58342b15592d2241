use crate::classify::{ClassifyError, LabelScore, TextClassifier};
use crate::pipeline::MAX_RANKED_LABELS;
use crate::translate::Translator;
use std::cmp::Ordering;

#[derive(thiserror::Error, Debug)]
pub enum TextError {
    #[error("text emotion model is unavailable")]
    ClassifierUnavailable,

    #[error("text analysis failed: {0}")]
    Classification(#[from] ClassifyError),
}

/// Ranked outcome of one text analysis. Scores are probabilities in [0, 1];
/// the dominant emotion is implicitly rank 0.
#[derive(Clone, Debug, PartialEq)]
pub struct TextReport {
    /// The text actually sent to the classifier (translated, or the raw
    /// input when translation degraded).
    pub analyzed_text: String,
    /// True when translation failed and the raw input was used instead.
    pub translation_degraded: bool,
    pub detected_source_lang: Option<String>,
    pub ranking: Vec<LabelScore>,
}

impl TextReport {
    /// One presentation line per ranked label, `label: NN.NN%`.
    pub fn lines(&self) -> Vec<String> {
        self.ranking
            .iter()
            .map(|s| format!("{}: {:.2}%", s.label, s.score * 100.0))
            .collect()
    }
}

/// Text analysis pipeline: translate, classify, rank.
///
/// The classifier handle is built once at process startup; `None` means that
/// startup failed and the capability stays unavailable for the process
/// lifetime, which every call reports without doing further work.
pub struct TextPipeline<T, C> {
    translator: T,
    classifier: Option<C>,
}

impl<T, C> TextPipeline<T, C>
where
    T: Translator,
    C: TextClassifier,
{
    pub fn new(translator: T, classifier: Option<C>) -> Self {
        Self {
            translator,
            classifier,
        }
    }

    pub fn classifier_available(&self) -> bool {
        self.classifier.is_some()
    }

    pub async fn analyze_text(&self, raw: &str) -> Result<TextReport, TextError> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or(TextError::ClassifierUnavailable)?;

        // Translation failure is non-fatal: analyze the raw input instead
        // and surface the degradation in the report.
        let (text, translation_degraded, detected_source_lang) =
            match self.translator.translate(raw.to_owned()).await {
                Ok(translation) => (translation.text, false, translation.detected_source_lang),
                Err(e) => {
                    tracing::warn!(error = %e, "translation failed, analyzing original text");
                    (raw.to_owned(), true, None)
                }
            };

        let scores = classifier.classify(text.clone()).await?;
        let ranking = rank_top(scores, MAX_RANKED_LABELS);

        Ok(TextReport {
            analyzed_text: text,
            translation_degraded,
            detected_source_lang,
            ranking,
        })
    }
}

/// Sorts descending by score and truncates to `k`. The sort is stable, so
/// labels with equal scores keep the model's original order.
pub fn rank_top(mut scores: Vec<LabelScore>, k: usize) -> Vec<LabelScore> {
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scores.truncate(k);
    scores
}
