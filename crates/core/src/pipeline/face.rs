use crate::config::{DetectorConfig, DisplayLang};
use crate::detect::{DetectError, DetectRequest, FaceDetector};
use crate::locale::{caption_prefix, display_record, DisplayRecord};
use crate::preprocess::{preprocess, PreprocessError};
use crate::render::{compose_figure, FigureSurface};
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(PathBuf),

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error(transparent)]
    Detection(#[from] DetectError),
}

/// Outcome of one image analysis. Scores are percentages in [0, 100].
#[derive(Clone, Debug, PartialEq)]
pub struct ImageReport {
    pub records: Vec<DisplayRecord>,
    /// The detector's own dominant designation, localized. Not necessarily
    /// the highest-scoring record.
    pub dominant: DisplayRecord,
    pub caption: String,
    /// True when the figure reached a display surface.
    pub presented: bool,
    /// Preview location when the surface produced one.
    pub preview: Option<PathBuf>,
}

/// Image analysis pipeline: resolve path, preprocess the display copy,
/// detect, localize, compose and present the figure.
pub struct ImagePipeline<D, S> {
    detector: D,
    surface: S,
    image_dir: PathBuf,
    detector_config: DetectorConfig,
    lang: DisplayLang,
}

impl<D, S> ImagePipeline<D, S>
where
    D: FaceDetector,
    S: FigureSurface,
{
    pub fn new(
        detector: D,
        surface: S,
        image_dir: PathBuf,
        detector_config: DetectorConfig,
        lang: DisplayLang,
    ) -> Self {
        Self {
            detector,
            surface,
            image_dir,
            detector_config,
            lang,
        }
    }

    pub async fn analyze_image(&self, name: &str) -> Result<ImageReport, ImageError> {
        let path = self.image_dir.join(name);
        if !path.exists() {
            return Err(ImageError::NotFound(path));
        }

        // Display copy for the figure; the detector sees the original path.
        let display = preprocess(&path)?;

        let analysis = self
            .detector
            .analyze(DetectRequest {
                image_path: path,
                enforce_detection: self.detector_config.enforce_detection,
                backend: self.detector_config.backend.clone(),
            })
            .await?;

        let records: Vec<DisplayRecord> = analysis
            .emotion
            .iter()
            .map(|(key, score)| display_record(key, *score, self.lang))
            .collect();

        let dominant_score = analysis
            .emotion
            .get(&analysis.dominant_emotion)
            .copied()
            .unwrap_or(0.0);
        let dominant = display_record(&analysis.dominant_emotion, dominant_score, self.lang);

        let caption = format!("{}: {}", caption_prefix(self.lang), dominant.label);
        let figure = compose_figure(&display, &records, &caption);
        let (presented, preview) = match self.surface.present(&figure) {
            Ok(preview) => (true, preview),
            Err(e) => {
                tracing::warn!(error = %e, "figure presentation failed");
                (false, None)
            }
        };

        Ok(ImageReport {
            records,
            dominant,
            caption,
            presented,
            preview,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::FaceAnalysis;
    use crate::locale::{LabelColor, DEFAULT_COLOR};
    use crate::render::{PngSurface, RenderError};
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct StubDetector {
        analysis: FaceAnalysis,
        called: Arc<AtomicBool>,
    }

    impl StubDetector {
        fn new(analysis: FaceAnalysis) -> Self {
            Self {
                analysis,
                called: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    impl FaceDetector for StubDetector {
        fn analyze(
            &self,
            _request: DetectRequest,
        ) -> BoxFuture<'_, Result<FaceAnalysis, DetectError>> {
            self.called.store(true, Ordering::Relaxed);
            let analysis = self.analysis.clone();
            async move { Ok(analysis) }.boxed()
        }
    }

    #[derive(Clone)]
    struct NoFaceDetector;

    impl FaceDetector for NoFaceDetector {
        fn analyze(
            &self,
            _request: DetectRequest,
        ) -> BoxFuture<'_, Result<FaceAnalysis, DetectError>> {
            async { Err(DetectError::DetectionFailed("no face found".to_string())) }.boxed()
        }
    }

    struct NullSurface;

    impl FigureSurface for NullSurface {
        fn present(&self, _figure: &image::RgbaImage) -> Result<Option<PathBuf>, RenderError> {
            Ok(None)
        }
    }

    struct BrokenSurface;

    impl FigureSurface for BrokenSurface {
        fn present(&self, _figure: &image::RgbaImage) -> Result<Option<PathBuf>, RenderError> {
            Err(RenderError::Unavailable("headless session".to_string()))
        }
    }

    fn write_photo(dir: &Path, name: &str) {
        image::RgbImage::from_pixel(12, 12, image::Rgb([180, 150, 120]))
            .save(dir.join(name))
            .expect("write test photo");
    }

    fn analysis(pairs: &[(&str, f32)], dominant: &str) -> FaceAnalysis {
        let emotion: BTreeMap<String, f32> =
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        FaceAnalysis {
            emotion,
            dominant_emotion: dominant.to_string(),
        }
    }

    fn pipeline<D: FaceDetector, S: FigureSurface>(
        detector: D,
        surface: S,
        dir: &Path,
    ) -> ImagePipeline<D, S> {
        ImagePipeline::new(
            detector,
            surface,
            dir.to_path_buf(),
            DetectorConfig::default(),
            DisplayLang::Pt,
        )
    }

    #[tokio::test]
    async fn missing_file_short_circuits_before_the_detector() {
        let dir = tempfile::tempdir().expect("tempdir");
        let detector = StubDetector::new(analysis(&[("happy", 100.0)], "happy"));
        let called = detector.called.clone();
        let pipeline = pipeline(detector, NullSurface, dir.path());

        let err = pipeline.analyze_image("does_not_exist.jpg").await.unwrap_err();
        assert!(matches!(err, ImageError::NotFound(_)));
        assert!(!called.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn localizes_all_labels_with_preset_colors() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_photo(dir.path(), "face.png");
        let detector = StubDetector::new(analysis(
            &[("happy", 72.3), ("neutral", 15.0), ("sad", 5.0)],
            "happy",
        ));
        let pipeline = pipeline(detector, NullSurface, dir.path());

        let report = pipeline.analyze_image("face.png").await.unwrap();
        let happy = report
            .records
            .iter()
            .find(|r| r.label == "Feliz")
            .expect("happy localized");
        assert_eq!(happy.score, 72.3);
        assert_eq!(happy.color, LabelColor([251, 192, 45]));
        assert_eq!(report.records.len(), 3);
    }

    #[tokio::test]
    async fn dominant_follows_detector_even_when_not_highest_score() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_photo(dir.path(), "face.png");
        let detector =
            StubDetector::new(analysis(&[("happy", 10.0), ("sad", 80.0)], "happy"));
        let pipeline = pipeline(detector, NullSurface, dir.path());

        let report = pipeline.analyze_image("face.png").await.unwrap();
        assert_eq!(report.dominant.label, "Feliz");
        assert_eq!(report.caption, "Emoção Dominante: Feliz");
    }

    #[tokio::test]
    async fn unknown_detector_label_falls_back_with_default_color() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_photo(dir.path(), "face.png");
        let detector =
            StubDetector::new(analysis(&[("contempt", 60.0), ("happy", 40.0)], "contempt"));
        let pipeline = pipeline(detector, NullSurface, dir.path());

        let report = pipeline.analyze_image("face.png").await.unwrap();
        let contempt = report
            .records
            .iter()
            .find(|r| r.label == "Contempt")
            .expect("fallback record");
        assert_eq!(contempt.color, DEFAULT_COLOR);
        assert_eq!(report.dominant.label, "Contempt");
    }

    #[tokio::test]
    async fn detection_failure_aborts_only_this_invocation() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_photo(dir.path(), "face.png");
        let pipeline = pipeline(NoFaceDetector, NullSurface, dir.path());

        let err = pipeline.analyze_image("face.png").await.unwrap_err();
        assert!(matches!(
            err,
            ImageError::Detection(DetectError::DetectionFailed(_))
        ));
    }

    #[tokio::test]
    async fn presentation_failure_is_reported_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_photo(dir.path(), "face.png");
        let detector = StubDetector::new(analysis(&[("neutral", 99.0)], "neutral"));
        let pipeline = pipeline(detector, BrokenSurface, dir.path());

        let report = pipeline.analyze_image("face.png").await.unwrap();
        assert!(!report.presented);
        assert!(report.preview.is_none());
        assert_eq!(report.dominant.label, "Neutro");
    }

    #[tokio::test]
    async fn png_surface_reports_preview_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_photo(dir.path(), "face.png");
        let detector = StubDetector::new(analysis(&[("happy", 90.0)], "happy"));
        let surface = PngSurface::new(dir.path().to_path_buf());
        let pipeline = pipeline(detector, surface, dir.path());

        let report = pipeline.analyze_image("face.png").await.unwrap();
        assert!(report.presented);
        let preview = report.preview.expect("preview path");
        assert!(preview.exists());
    }

    #[tokio::test]
    async fn undecodable_image_fails_before_the_detector() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("broken.jpg"), b"not an image").expect("write");
        let detector = StubDetector::new(analysis(&[("happy", 100.0)], "happy"));
        let called = detector.called.clone();
        let pipeline = pipeline(detector, NullSurface, dir.path());

        let err = pipeline.analyze_image("broken.jpg").await.unwrap_err();
        assert!(matches!(err, ImageError::Preprocess(_)));
        assert!(!called.load(Ordering::Relaxed));
    }
}
