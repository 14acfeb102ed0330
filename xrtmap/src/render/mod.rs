//! Marker rendering.
//!
//! A marker is a filled square centred on a projected point. Erasing a marker
//! copies the same square back from the backing image, so no clear color or
//! full repaint is needed when a point expires.

use image::Rgba;
use tracing::trace;

use crate::ledger::PointLedger;
use crate::projection::{PixelCoord, Projector};
use crate::surface::{BackingImage, Rect, Surface};

/// Draws, erases and repaints markers on a [`Surface`].
#[derive(Debug, Clone)]
pub struct Renderer {
    projector: Projector,
    marker_size: u32,
    highlight: Rgba<u8>,
}

impl Renderer {
    /// Create a renderer for a fixed projection.
    pub fn new(projector: Projector, marker_size: u32, highlight: Rgba<u8>) -> Self {
        Self {
            projector,
            marker_size,
            highlight,
        }
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn marker_size(&self) -> u32 {
        self.marker_size
    }

    /// Surface region covered by the marker for `(lat, lon)`.
    pub fn marker_rect(&self, lat: f64, lon: f64) -> Rect {
        let PixelCoord { x, y } = self.projector.project(lat, lon);
        Rect::centered(x, y, self.marker_size)
    }

    /// Fill the marker square in the highlight color.
    pub fn draw_marker<S: Surface + ?Sized>(&self, surface: &mut S, lat: f64, lon: f64) {
        let rect = self.marker_rect(lat, lon);
        trace!(lat, lon, x = rect.x, y = rect.y, "Draw marker");
        surface.fill_rect(rect, self.highlight);
    }

    /// Restore the marker square from the backing image.
    pub fn undraw_marker<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        backing: &BackingImage,
        lat: f64,
        lon: f64,
    ) {
        let rect = self.marker_rect(lat, lon);
        trace!(lat, lon, x = rect.x, y = rect.y, "Undraw marker");
        surface.copy_from(backing, rect);
    }

    /// Copy the whole backing image, then draw every live point in ledger order.
    pub fn repaint<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        backing: &BackingImage,
        ledger: &PointLedger,
    ) {
        surface.copy_from(backing, Rect::new(0, 0, backing.width(), backing.height()));
        for point in ledger.iter() {
            self.draw_marker(&mut *surface, point.latitude, point.longitude);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FrameBuffer;
    use image::RgbaImage;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const LAND: Rgba<u8> = Rgba([30, 120, 40, 255]);

    /// 720×360 map with a checker pattern so copies are observable.
    fn backing() -> BackingImage {
        BackingImage::from_rgba(RgbaImage::from_fn(720, 360, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                LAND
            } else {
                Rgba([10, 10, 180, 255])
            }
        }))
    }

    fn renderer() -> Renderer {
        Renderer::new(Projector::new(720, 360), 5, RED)
    }

    #[test]
    fn test_draw_marker_centered() {
        let mut fb = FrameBuffer::new(720, 360);
        renderer().draw_marker(&mut fb, 0.0, 0.0);

        // 5×5 square centred on (360, 180)
        for y in 178..=182 {
            for x in 358..=362 {
                assert_eq!(fb.pixel(x, y), Some(RED), "pixel ({}, {})", x, y);
            }
        }
        assert_ne!(fb.pixel(357, 180), Some(RED));
        assert_ne!(fb.pixel(363, 180), Some(RED));
        assert_ne!(fb.pixel(360, 177), Some(RED));
        assert_ne!(fb.pixel(360, 183), Some(RED));
    }

    #[test]
    fn test_draw_marker_at_corner_is_clipped() {
        let mut fb = FrameBuffer::new(720, 360);
        renderer().draw_marker(&mut fb, 90.0, -180.0);

        assert_eq!(fb.pixel(0, 0), Some(RED));
        assert_eq!(fb.pixel(2, 2), Some(RED));
        assert_ne!(fb.pixel(3, 3), Some(RED));
    }

    #[test]
    fn test_draw_out_of_range_is_silent() {
        let mut fb = FrameBuffer::new(720, 360);
        let before = fb.as_raw().to_vec();
        renderer().draw_marker(&mut fb, 200.0, 500.0);
        assert_eq!(fb.as_raw(), &before[..]);
    }

    #[test]
    fn test_undraw_restores_backing() {
        let backing = backing();
        let renderer = renderer();
        let mut fb = FrameBuffer::new(720, 360);
        renderer.repaint(&mut fb, &backing, &PointLedger::new());

        renderer.draw_marker(&mut fb, 45.0, 90.0);
        assert_ne!(fb.image(), backing.pixels());

        renderer.undraw_marker(&mut fb, &backing, 45.0, 90.0);
        assert_eq!(fb.image(), backing.pixels());
    }

    #[test]
    fn test_repaint_draws_live_points() {
        let backing = backing();
        let renderer = renderer();
        let mut ledger = PointLedger::new();
        ledger.enqueue(0.0, 0.0);
        ledger.enqueue(-45.0, 90.0);

        let mut fb = FrameBuffer::new(720, 360);
        renderer.repaint(&mut fb, &backing, &ledger);

        assert_eq!(fb.pixel(360, 180), Some(RED));
        assert_eq!(fb.pixel(540, 270), Some(RED));
        assert_eq!(
            fb.pixel(100, 100),
            backing.pixels().get_pixel_checked(100, 100).copied()
        );
    }

    #[test]
    fn test_repaint_is_idempotent() {
        let backing = backing();
        let renderer = renderer();
        let mut ledger = PointLedger::new();
        ledger.enqueue(12.5, -60.25);
        ledger.enqueue(60.17, 24.94);

        let mut fb = FrameBuffer::new(720, 360);
        renderer.repaint(&mut fb, &backing, &ledger);
        let first = fb.as_raw().to_vec();
        renderer.repaint(&mut fb, &backing, &ledger);

        assert_eq!(fb.as_raw(), &first[..]);
    }

    #[test]
    fn test_marker_rect_matches_projection() {
        let rect = renderer().marker_rect(0.0, 0.0);
        assert_eq!(rect, Rect::new(358, 178, 5, 5));
    }
}
