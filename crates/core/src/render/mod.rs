mod figure;

use std::path::PathBuf;

pub use figure::{compose_figure, figure_height, figure_width};

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("no display surface available: {0}")]
    Unavailable(String),

    #[error("could not write figure: {0}")]
    Write(#[from] image::ImageError),
}

/// Presentation seam for the composed figure. The default implementation
/// emits a PNG preview; a windowed surface can slot in behind the same
/// trait. Returns the preview location when one exists.
pub trait FigureSurface: Send + Sync {
    fn present(&self, figure: &image::RgbaImage) -> Result<Option<PathBuf>, RenderError>;
}

/// Writes the figure as a PNG into a directory and reports its path. Each
/// invocation overwrites the previous preview; no history is kept.
#[derive(Clone, Debug)]
pub struct PngSurface {
    dir: PathBuf,
}

impl PngSurface {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Default for PngSurface {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir(),
        }
    }
}

impl FigureSurface for PngSurface {
    fn present(&self, figure: &image::RgbaImage) -> Result<Option<PathBuf>, RenderError> {
        let path = self.dir.join("emorec-figure.png");
        figure.save(&path)?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_surface_writes_preview_and_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let surface = PngSurface::new(dir.path().to_path_buf());
        let figure = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 255, 255, 255]));

        let preview = surface.present(&figure).expect("present");
        let path = preview.expect("path reported");
        assert!(path.exists());
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("emorec-figure.png"));
    }

    #[test]
    fn png_surface_fails_on_missing_directory() {
        let surface = PngSurface::new(PathBuf::from("/definitely/not/a/dir"));
        let figure = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
        assert!(surface.present(&figure).is_err());
    }
}
