use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

pub const DEFAULT_DISPLAY_LANG: &str = "pt";
pub const DEFAULT_DETECTOR_BACKEND: &str = "opencv";
pub const DEFAULT_HF_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/j-hartmann/emotion-english-distilroberta-base";
pub const DEFAULT_DEEPFACE_URL: &str = "http://127.0.0.1:5005";
pub const ENV_HF_API_TOKEN: &str = "HF_API_TOKEN";
pub const ENV_DEEPFACE_URL: &str = "DEEPFACE_URL";

/// Language used for emotion labels and figure captions.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DisplayLang {
    Pt,
    En,
}

impl DisplayLang {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "pt" | "pt-br" | "pt-pt" => Ok(Self::Pt),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            other => Err(ConfigError::UnknownDisplayLang(other.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
        }
    }
}

impl Default for DisplayLang {
    fn default() -> Self {
        Self::Pt
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        if v.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(v))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(**redacted**)")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub api_token: Option<ApiKey>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_HF_ENDPOINT.to_owned(),
            api_token: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectorConfig {
    pub base_url: String,
    pub backend: String,
    /// Fail rather than guess when no face is found in the input image.
    pub enforce_detection: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DEEPFACE_URL.to_owned(),
            backend: DEFAULT_DETECTOR_BACKEND.to_owned(),
            enforce_detection: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Base directory image names are resolved against; no other roots are searched.
    pub image_dir: PathBuf,
    pub lang: DisplayLang,
    /// When false, text is analyzed untranslated (dummy passthrough).
    pub translate: bool,
    /// When true, no network capability is used for text analysis.
    pub offline: bool,
    pub classifier: ClassifierConfig,
    pub detector: DetectorConfig,
}

/// Directory containing the running executable, the default image root.
pub fn default_image_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown display language: {0}")]
    UnknownDisplayLang(String),
    #[error("api key must not be empty")]
    EmptyApiKey,
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_api_key(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Result<Option<ApiKey>, ConfigError> {
    match cli_value {
        Some(v) => Ok(Some(ApiKey::new(v)?)),
        None => match env.var(env_key) {
            Some(v) => Ok(Some(ApiKey::new(v)?)),
            None => Ok(None),
        },
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}
