use crate::config::DisplayLang;
use serde::{Deserialize, Serialize};

/// The fixed label vocabulary of the facial emotion detector. The text
/// classifier's vocabulary is open and model-defined; the two are never
/// conflated.
pub const CANONICAL_EMOTIONS: [&str; 7] = [
    "angry", "disgust", "fear", "happy", "sad", "surprise", "neutral",
];

/// Presentation color for one emotion bar, RGB.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelColor(pub [u8; 3]);

pub const DEFAULT_COLOR: LabelColor = LabelColor([128, 128, 128]);

/// Outcome of a localization lookup. Unknown keys never fail; they fall back
/// to their capitalized original form with the default color, since the
/// detector's vocabulary is not contractually fixed.
#[derive(Clone, Debug, PartialEq)]
pub enum Localized {
    Known { label: String, color: LabelColor },
    Fallback { label: String },
}

impl Localized {
    pub fn label(&self) -> &str {
        match self {
            Localized::Known { label, .. } => label,
            Localized::Fallback { label } => label,
        }
    }

    pub fn color(&self) -> LabelColor {
        match self {
            Localized::Known { color, .. } => *color,
            Localized::Fallback { .. } => DEFAULT_COLOR,
        }
    }
}

/// Localized emotion label with its score and presentation color, ready for
/// textual or chart display.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayRecord {
    pub label: String,
    pub score: f32,
    pub color: LabelColor,
}

pub fn localize(key: &str, lang: DisplayLang) -> Localized {
    let entry = match lang {
        DisplayLang::Pt => match key {
            "angry" => Some(("Raiva", LabelColor([211, 47, 47]))),
            "disgust" => Some(("Nojo", LabelColor([104, 159, 56]))),
            "fear" => Some(("Medo", LabelColor([123, 31, 162]))),
            "happy" => Some(("Feliz", LabelColor([251, 192, 45]))),
            "sad" => Some(("Triste", LabelColor([25, 118, 210]))),
            "surprise" => Some(("Surpresa", LabelColor([245, 124, 0]))),
            "neutral" => Some(("Neutro", LabelColor([97, 97, 97]))),
            _ => None,
        },
        DisplayLang::En => match key {
            "angry" => Some(("Angry", LabelColor([211, 47, 47]))),
            "disgust" => Some(("Disgust", LabelColor([104, 159, 56]))),
            "fear" => Some(("Fear", LabelColor([123, 31, 162]))),
            "happy" => Some(("Happy", LabelColor([251, 192, 45]))),
            "sad" => Some(("Sad", LabelColor([25, 118, 210]))),
            "surprise" => Some(("Surprise", LabelColor([245, 124, 0]))),
            "neutral" => Some(("Neutral", LabelColor([97, 97, 97]))),
            _ => None,
        },
    };

    match entry {
        Some((label, color)) => Localized::Known {
            label: label.to_string(),
            color,
        },
        None => Localized::Fallback {
            label: capitalize(key),
        },
    }
}

pub fn display_record(key: &str, score: f32, lang: DisplayLang) -> DisplayRecord {
    let localized = localize(key, lang);
    DisplayRecord {
        color: localized.color(),
        label: match localized {
            Localized::Known { label, .. } => label,
            Localized::Fallback { label } => label,
        },
        score,
    }
}

/// Prefix for the figure caption, e.g. "Emoção Dominante: Feliz".
pub fn caption_prefix(lang: DisplayLang) -> &'static str {
    match lang {
        DisplayLang::Pt => "Emoção Dominante",
        DisplayLang::En => "Dominant Emotion",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_canonical_key_is_known_in_both_languages() {
        for lang in [DisplayLang::Pt, DisplayLang::En] {
            for key in CANONICAL_EMOTIONS {
                let localized = localize(key, lang);
                assert!(
                    matches!(localized, Localized::Known { .. }),
                    "{key} unknown in {lang:?}"
                );
                assert!(!localized.label().is_empty());
            }
        }
    }

    #[test]
    fn canonical_colors_are_distinct_from_default() {
        for key in CANONICAL_EMOTIONS {
            let localized = localize(key, DisplayLang::Pt);
            assert_ne!(localized.color(), DEFAULT_COLOR, "{key} uses default color");
        }
    }

    #[test]
    fn unknown_key_falls_back_capitalized_with_default_color() {
        let localized = localize("contempt", DisplayLang::Pt);
        assert_eq!(
            localized,
            Localized::Fallback {
                label: "Contempt".to_string()
            }
        );
        assert_eq!(localized.color(), DEFAULT_COLOR);
    }

    #[test]
    fn happy_localizes_to_portuguese() {
        assert_eq!(localize("happy", DisplayLang::Pt).label(), "Feliz");
        assert_eq!(localize("happy", DisplayLang::En).label(), "Happy");
    }

    #[test]
    fn display_record_carries_score_and_color() {
        let record = display_record("sad", 42.5, DisplayLang::Pt);
        assert_eq!(record.label, "Triste");
        assert_eq!(record.score, 42.5);
        assert_eq!(record.color, LabelColor([25, 118, 210]));
    }

    #[test]
    fn empty_key_does_not_panic() {
        let localized = localize("", DisplayLang::En);
        assert_eq!(localized.label(), "");
        assert_eq!(localized.color(), DEFAULT_COLOR);
    }
}
