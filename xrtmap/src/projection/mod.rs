//! Equirectangular projection.
//!
//! Maps geographic coordinates (latitude/longitude) onto pixel coordinates of
//! the backing map image. The scale is fixed when the image is loaded and is
//! always relative to the image's native resolution, never to the window size.
//!
//! ```text
//!   (-180, 90) ┌──────────────────────┐ (180, 90)
//!              │          ▲           │
//!              │  lon ──► x = (lon + 180) · width / 360
//!              │  lat ──► y = (90 - lat) · height / 180
//!              │                      │
//!  (-180, -90) └──────────────────────┘ (180, -90)
//! ```

mod types;

pub use types::PixelCoord;

use crate::surface::BackingImage;

/// Degrees of longitude spanned by the map.
pub const LON_SPAN: f64 = 360.0;

/// Degrees of latitude spanned by the map.
pub const LAT_SPAN: f64 = 180.0;

/// Projects latitude/longitude onto a surface of known size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    width: u32,
    height: u32,
    scale_x: f64,
    scale_y: f64,
}

impl Projector {
    /// Create a projector for a `width`×`height` surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale_x: width as f64 / LON_SPAN,
            scale_y: height as f64 / LAT_SPAN,
        }
    }

    /// Create a projector matching the backing image's native resolution.
    pub fn for_image(image: &BackingImage) -> Self {
        Self::new(image.width(), image.height())
    }

    /// Projects a coordinate to a pixel position.
    ///
    /// No bounds checking is performed: out-of-range input yields a position
    /// outside the surface.
    #[inline]
    pub fn project(&self, lat: f64, lon: f64) -> PixelCoord {
        let x = ((lon + 180.0) * self.scale_x).round() as i32;
        let y = ((90.0 - lat) * self.scale_y).round() as i32;
        PixelCoord { x, y }
    }

    /// Converts a pixel position back to (latitude, longitude).
    #[inline]
    pub fn unproject(&self, pixel: PixelCoord) -> (f64, f64) {
        let lon = pixel.x as f64 / self.scale_x - 180.0;
        let lat = 90.0 - pixel.y as f64 / self.scale_y;
        (lat, lon)
    }

    /// Pixels per degree as `(scale_x, scale_y)`.
    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Surface size the projector was built for.
    pub fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
