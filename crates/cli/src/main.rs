#![deny(warnings)]

use anyhow::Context;
use clap::Parser;
use emorec_core::classify::{HfTextClassifier, KeywordClassifier, TextClassifier};
use emorec_core::config::{
    default_image_dir, resolve_api_key, resolve_string_with_default, AppConfig, ClassifierConfig,
    DetectorConfig, DisplayLang, StdEnv, DEFAULT_DEEPFACE_URL, DEFAULT_DETECTOR_BACKEND,
    DEFAULT_DISPLAY_LANG, DEFAULT_HF_ENDPOINT, ENV_DEEPFACE_URL, ENV_HF_API_TOKEN,
};
use emorec_core::detect::DeepFaceDetector;
use emorec_core::pipeline::{ImagePipeline, TextPipeline};
use emorec_core::render::PngSurface;
use emorec_core::translate::{DummyTranslator, GoogleTranslator, Translator};
use std::io::Write as _;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "emorec")]
#[command(about = "Interactive emotion analysis for text and facial photos")]
struct Args {
    /// Directory image names are resolved against; defaults to the
    /// directory containing the executable.
    #[arg(long)]
    image_dir: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_DISPLAY_LANG)]
    lang: String,

    /// Analyze text as-is, without pre-translating it to English.
    #[arg(long, default_value_t = false)]
    no_translate: bool,

    /// Use the offline keyword classifier instead of the hosted model.
    #[arg(long, default_value_t = false)]
    offline: bool,

    #[arg(long, default_value = DEFAULT_HF_ENDPOINT)]
    hf_endpoint: String,

    #[arg(long, env = ENV_HF_API_TOKEN)]
    hf_api_token: Option<String>,

    #[arg(long, env = ENV_DEEPFACE_URL)]
    deepface_url: Option<String>,

    #[arg(long, default_value = DEFAULT_DETECTOR_BACKEND)]
    detector_backend: String,

    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Interactive strings in the configured display language, mirroring how
/// emotion labels and captions are already localized in the core.
struct UiText {
    menu_title: &'static str,
    menu_text_option: &'static str,
    menu_image_option: &'static str,
    menu_exit_option: &'static str,
    choice_prompt: &'static str,
    text_prompt: &'static str,
    image_prompt: &'static str,
    translated_prefix: &'static str,
    translation_degraded: &'static str,
    text_results_heading: &'static str,
    image_results_heading: &'static str,
    text_failed_prefix: &'static str,
    image_failed_prefix: &'static str,
    figure_written_prefix: &'static str,
    figure_unavailable: &'static str,
    invalid_choice: &'static str,
    goodbye: &'static str,
}

const UI_PT: UiText = UiText {
    menu_title: "=== Sistema de Reconhecimento de Emoções ===",
    menu_text_option: "1. Analisar emoções em texto",
    menu_image_option: "2. Analisar emoções em imagens",
    menu_exit_option: "3. Sair",
    choice_prompt: "Escolhe uma opção (1/2/3): ",
    text_prompt: "Descreve como te sentes (ex.: 'Estou feliz'): ",
    image_prompt: "Insere o nome da imagem (ex.: 'imagem.jpg'): ",
    translated_prefix: "Texto traduzido para inglês:",
    translation_degraded: "(tradução indisponível, o texto original foi analisado)",
    text_results_heading: "Emoções Detetadas (Texto):",
    image_results_heading: "Emoções Detetadas (Imagem):",
    text_failed_prefix: "Erro ao processar o texto:",
    image_failed_prefix: "Erro ao processar a imagem:",
    figure_written_prefix: "Figura gravada em:",
    figure_unavailable: "(não foi possível apresentar a figura)",
    invalid_choice: "Escolha inválida! Tenta novamente.",
    goodbye: "Obrigado por usar o sistema!",
};

const UI_EN: UiText = UiText {
    menu_title: "=== Emotion Recognition ===",
    menu_text_option: "1. Analyze emotions in text",
    menu_image_option: "2. Analyze emotions in an image",
    menu_exit_option: "3. Exit",
    choice_prompt: "Choose an option (1/2/3): ",
    text_prompt: "Describe how you feel (e.g. 'I am happy'): ",
    image_prompt: "Image file name (e.g. 'photo.jpg'): ",
    translated_prefix: "Text analyzed in English:",
    translation_degraded: "(translation unavailable, analyzed the original text)",
    text_results_heading: "Detected emotions (text):",
    image_results_heading: "Detected emotions (image):",
    text_failed_prefix: "Text analysis failed:",
    image_failed_prefix: "Image analysis failed:",
    figure_written_prefix: "Figure written to:",
    figure_unavailable: "(figure could not be displayed)",
    invalid_choice: "Invalid choice, try again.",
    goodbye: "Thanks for using the system!",
};

fn ui_text(lang: DisplayLang) -> &'static UiText {
    match lang {
        DisplayLang::Pt => &UI_PT,
        DisplayLang::En => &UI_EN,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let env = StdEnv;
    let cfg = build_config(args, &env)?;

    tracing::info!(
        lang = %cfg.lang.as_str(),
        image_dir = %cfg.image_dir.display(),
        offline = cfg.offline,
        "config loaded"
    );

    run_menu(cfg).await
}

fn build_config(args: Args, env: &impl emorec_core::config::Env) -> anyhow::Result<AppConfig> {
    let lang = DisplayLang::parse(&args.lang)?;
    let api_token = resolve_api_key(args.hf_api_token, ENV_HF_API_TOKEN, env)?;
    let base_url = resolve_string_with_default(
        args.deepface_url,
        ENV_DEEPFACE_URL,
        env,
        DEFAULT_DEEPFACE_URL,
    );

    Ok(AppConfig {
        image_dir: args.image_dir.unwrap_or_else(default_image_dir),
        lang,
        translate: !args.no_translate,
        offline: args.offline,
        classifier: ClassifierConfig {
            endpoint: args.hf_endpoint,
            api_token,
        },
        detector: DetectorConfig {
            base_url,
            backend: args.detector_backend,
            enforce_detection: true,
        },
    })
}

async fn run_menu(cfg: AppConfig) -> anyhow::Result<()> {
    let translator: Box<dyn Translator> = if cfg.translate && !cfg.offline {
        Box::new(GoogleTranslator::new())
    } else {
        Box::new(DummyTranslator::new())
    };

    // The classifier handle is built once here; a startup failure disables
    // text analysis for the rest of the process without aborting it.
    let classifier: Option<Box<dyn TextClassifier>> = if cfg.offline {
        Some(Box::new(KeywordClassifier::new()))
    } else {
        let token = cfg
            .classifier
            .api_token
            .as_ref()
            .map(|k| k.expose().to_string());
        match HfTextClassifier::new(&cfg.classifier.endpoint, token) {
            Ok(classifier) => Some(Box::new(classifier)),
            Err(e) => {
                tracing::error!(error = %e, "text classifier failed to initialize; text analysis disabled");
                None
            }
        }
    };

    let text_pipeline = TextPipeline::new(translator, classifier);
    let image_pipeline = ImagePipeline::new(
        DeepFaceDetector::new(cfg.detector.base_url.clone()),
        PngSurface::default(),
        cfg.image_dir.clone(),
        cfg.detector.clone(),
        cfg.lang,
    );

    let ui = ui_text(cfg.lang);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!();
        println!("{}", ui.menu_title);
        println!("{}", ui.menu_text_option);
        println!("{}", ui.menu_image_option);
        println!("{}", ui.menu_exit_option);

        let Some(choice) = prompt(&mut lines, ui.choice_prompt).await? else {
            break;
        };

        match choice.trim() {
            "1" => {
                let Some(input) = prompt(&mut lines, ui.text_prompt).await? else {
                    break;
                };
                match text_pipeline.analyze_text(input.trim()).await {
                    Ok(report) => {
                        if report.translation_degraded {
                            println!("{}", ui.translation_degraded);
                        } else {
                            println!("{} {}", ui.translated_prefix, report.analyzed_text);
                        }
                        println!("{}", ui.text_results_heading);
                        for line in report.lines() {
                            println!("  {line}");
                        }
                    }
                    Err(e) => println!("{} {e}", ui.text_failed_prefix),
                }
            }
            "2" => {
                let Some(name) = prompt(&mut lines, ui.image_prompt).await? else {
                    break;
                };
                match image_pipeline.analyze_image(name.trim()).await {
                    Ok(report) => {
                        println!("{}", ui.image_results_heading);
                        for record in &report.records {
                            println!("  {}: {:.2}%", record.label, record.score);
                        }
                        println!("{}", report.caption);
                        match &report.preview {
                            Some(path) => {
                                println!("{} {}", ui.figure_written_prefix, path.display())
                            }
                            None if report.presented => {}
                            None => println!("{}", ui.figure_unavailable),
                        }
                    }
                    Err(e) => println!("{} {e}", ui.image_failed_prefix),
                }
            }
            "3" => {
                println!("{}", ui.goodbye);
                break;
            }
            _ => println!("{}", ui.invalid_choice),
        }
    }

    Ok(())
}

async fn prompt(
    lines: &mut Lines<BufReader<Stdin>>,
    label: &str,
) -> anyhow::Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush().context("flush stdout")?;
    Ok(lines.next_line().await.context("read stdin")?)
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use emorec_core::config::MapEnv;

    #[test]
    fn ui_strings_follow_display_language() {
        let pt = ui_text(DisplayLang::Pt);
        let en = ui_text(DisplayLang::En);

        assert!(pt.menu_title.contains("Emoções"));
        assert!(en.menu_title.contains("Emotion"));
        assert_ne!(pt.choice_prompt, en.choice_prompt);
        assert_ne!(pt.invalid_choice, en.invalid_choice);
    }

    #[test]
    fn default_config_selects_portuguese_ui() {
        let args = Args::parse_from(["emorec"]);
        let cfg = build_config(args, &MapEnv::default()).expect("config");

        assert_eq!(cfg.lang, DisplayLang::Pt);
        assert_eq!(ui_text(cfg.lang).goodbye, UI_PT.goodbye);
    }

    #[test]
    fn lang_flag_selects_english_ui() {
        let args = Args::parse_from(["emorec", "--lang", "en"]);
        let cfg = build_config(args, &MapEnv::default()).expect("config");

        assert_eq!(cfg.lang, DisplayLang::En);
        assert_eq!(ui_text(cfg.lang).menu_exit_option, UI_EN.menu_exit_option);
    }
}
