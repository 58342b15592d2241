use crate::classify::{ClassifyError, LabelScore, TextClassifier};
use futures::future::BoxFuture;
use futures::FutureExt;

const VOCABULARY: [(&str, &[&str]); 6] = [
    ("joy", &["happy", "joy", "glad", "excited", "delighted"]),
    ("sadness", &["sad", "unhappy", "depressed", "miserable", "down"]),
    ("anger", &["angry", "mad", "furious", "annoyed", "irritated"]),
    ("fear", &["scared", "afraid", "fear", "anxious", "worried"]),
    ("disgust", &["disgust", "disgusting", "gross", "revolting"]),
    ("surprise", &["surprise", "surprised", "amazing", "wow", "shocked"]),
];

/// Offline keyword-based classifier used when no inference endpoint is
/// reachable. Scores are keyword-hit proportions, so they stay in [0, 1]
/// like the hosted model's probabilities.
#[derive(Clone)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn score_text(text: &str) -> Vec<LabelScore> {
    let lower = text.to_lowercase();

    let hits: Vec<(&str, usize)> = VOCABULARY
        .iter()
        .map(|(label, keywords)| {
            let count = keywords.iter().filter(|k| lower.contains(**k)).count();
            (*label, count)
        })
        .collect();

    let total: usize = hits.iter().map(|(_, c)| c).sum();
    if total == 0 {
        let mut scores = vec![LabelScore {
            label: "neutral".to_string(),
            score: 1.0,
        }];
        scores.extend(hits.iter().map(|(label, _)| LabelScore {
            label: (*label).to_string(),
            score: 0.0,
        }));
        return scores;
    }

    let mut scores: Vec<LabelScore> = hits
        .iter()
        .map(|(label, count)| LabelScore {
            label: (*label).to_string(),
            score: *count as f32 / total as f32,
        })
        .collect();
    scores.push(LabelScore {
        label: "neutral".to_string(),
        score: 0.0,
    });
    scores
}

impl TextClassifier for KeywordClassifier {
    fn classify(&self, text: String) -> BoxFuture<'_, Result<Vec<LabelScore>, ClassifyError>> {
        async move { Ok(score_text(&text)) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_text_scores_joy_highest() {
        let scores = score_text("I am so happy and excited today");
        let joy = scores.iter().find(|s| s.label == "joy").expect("joy scored");
        assert!(scores.iter().all(|s| s.score <= joy.score));
        assert!(joy.score > 0.5);
    }

    #[test]
    fn unmatched_text_is_neutral() {
        let scores = score_text("the weather report for tomorrow");
        let neutral = scores
            .iter()
            .find(|s| s.label == "neutral")
            .expect("neutral scored");
        assert_eq!(neutral.score, 1.0);
    }

    #[test]
    fn scores_sum_to_one_when_keywords_match() {
        let scores = score_text("sad and angry");
        let sum: f32 = scores.iter().map(|s| s.score).sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn all_scores_stay_in_probability_range() {
        let scores = score_text("happy sad angry scared gross wow");
        for s in &scores {
            assert!((0.0..=1.0).contains(&s.score), "{} out of range", s.label);
        }
    }
}
