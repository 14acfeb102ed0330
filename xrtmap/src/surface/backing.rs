//! The pristine backing map image.

use std::path::Path;

use image::RgbaImage;
use tracing::info;

use crate::error::MapError;

/// Decoded raster map used as the background and as the erase source.
///
/// The image is never drawn on; markers are erased by copying regions of it
/// back onto the live surface.
#[derive(Debug, Clone)]
pub struct BackingImage {
    pixels: RgbaImage,
}

impl BackingImage {
    /// Decode a map image from disk.
    ///
    /// Any format supported by the `image` crate is accepted; pixels are
    /// converted to RGBA8.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::ImageLoad`] if the file cannot be read or decoded,
    /// and [`MapError::EmptyImage`] if it has no pixels.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| MapError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let pixels = decoded.to_rgba8();

        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(MapError::EmptyImage {
                path: path.to_path_buf(),
                width: pixels.width(),
                height: pixels.height(),
            });
        }

        info!(
            path = %path.display(),
            width = pixels.width(),
            height = pixels.height(),
            "Loaded backing image"
        );

        Ok(Self { pixels })
    }

    /// Wrap an already decoded image.
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Borrow the pixel data.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_load_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.png");
        RgbaImage::from_pixel(36, 18, Rgba([0, 0, 200, 255]))
            .save(&path)
            .unwrap();

        let backing = BackingImage::load(&path).unwrap();
        assert_eq!(backing.width(), 36);
        assert_eq!(backing.height(), 18);
        assert_eq!(backing.pixels().get_pixel(5, 5), &Rgba([0, 0, 200, 255]));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");

        let err = BackingImage::load(&path).unwrap_err();
        assert!(matches!(err, MapError::ImageLoad { .. }));
        assert!(err.to_string().contains("missing.png"));
    }

    #[test]
    fn test_load_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"this is not a png").unwrap();

        assert!(matches!(
            BackingImage::load(&path),
            Err(MapError::ImageLoad { .. })
        ));
    }
}
