use image::imageops::FilterType;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Fixed display canvas; aspect ratio is deliberately not preserved.
pub const CANVAS_WIDTH: u32 = 640;
pub const CANVAS_HEIGHT: u32 = 480;

/// RGB display copy of an input photo, normalized to [0, 1] floats.
///
/// This buffer exists only for visualization; the detector is always invoked
/// on the original file path, never on this representation.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayBuffer {
    width: u32,
    height: u32,
    /// Interleaved RGB, row-major, `width * height * 3` values.
    pixels: Vec<f32>,
}

impl DisplayBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let idx = ((y * self.width + x) * 3) as usize;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Denormalizes back to 8-bit RGBA for figure composition.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let [r, g, b] = self.pixel(x, y);
            image::Rgba([
                (r * 255.0).round() as u8,
                (g * 255.0).round() as u8,
                (b * 255.0).round() as u8,
                255,
            ])
        })
    }
}

/// Missing files and undecodable files reach the user as one "image
/// unusable" failure, but stay distinct variants here.
#[derive(thiserror::Error, Debug)]
pub enum PreprocessError {
    #[error("image not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid or unreadable image {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decodes the file at `path`, resizes it to the fixed 640x480 canvas,
/// converts to RGB channel order (the renderer composes RGB; decoder-native
/// layouts vary and a mismatched order corrupts colors silently, so the
/// conversion is explicit) and normalizes pixels to [0, 1].
pub fn preprocess(path: &Path) -> Result<DisplayBuffer, PreprocessError> {
    let decoded = image::open(path).map_err(|e| match &e {
        image::ImageError::IoError(io) if io.kind() == ErrorKind::NotFound => {
            PreprocessError::NotFound(path.to_path_buf())
        }
        _ => PreprocessError::Invalid {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let rgb = decoded
        .resize_exact(CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Triangle)
        .to_rgb8();

    let pixels = rgb.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();

    Ok(DisplayBuffer {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        let img = image::RgbImage::from_pixel(8, 6, image::Rgb(color));
        img.save(&path).expect("write test png");
        path
    }

    #[test]
    fn resizes_to_fixed_canvas_and_normalizes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_png(dir.path(), "red.png", [255, 0, 0]);

        let buffer = preprocess(&path).expect("preprocess");
        assert_eq!(buffer.width(), CANVAS_WIDTH);
        assert_eq!(buffer.height(), CANVAS_HEIGHT);

        let [r, g, b] = buffer.pixel(320, 240);
        assert!((r - 1.0).abs() < 1e-6);
        assert_eq!(g, 0.0);
        assert_eq!(b, 0.0);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = preprocess(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, PreprocessError::NotFound(_)));
    }

    #[test]
    fn non_image_file_is_invalid_not_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, b"this is not an image").expect("write");
        let err = preprocess(&path).unwrap_err();
        assert!(matches!(err, PreprocessError::Invalid { .. }));
    }

    #[test]
    fn display_copy_round_trips_to_rgba() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_png(dir.path(), "blue.png", [0, 0, 255]);

        let buffer = preprocess(&path).expect("preprocess");
        let rgba = buffer.to_rgba_image();
        assert_eq!(rgba.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }
}
