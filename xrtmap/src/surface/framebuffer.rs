//! In-memory RGBA surface.

use image::{Rgba, RgbaImage};

use super::backing::BackingImage;
use super::rect::Rect;
use super::Surface;
use crate::error::MapError;

const BYTES_PER_PIXEL: usize = 4;

/// A live drawable surface held in memory.
///
/// The window backend presents this buffer; tests inspect it directly.
/// [`flush`](Surface::flush) only counts calls, since there is no display
/// consumer to notify.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    image: RgbaImage,
    flushes: u64,
}

impl FrameBuffer {
    /// Create a black surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
            flushes: 0,
        }
    }

    /// Create a surface matching the backing image's size.
    pub fn for_backing(backing: &BackingImage) -> Self {
        Self::new(backing.width(), backing.height())
    }

    /// Read a single pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Number of flushes requested so far.
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }
}

impl Surface for FrameBuffer {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let Some(clip) = rect.clip(self.image.width(), self.image.height()) else {
            return;
        };
        for y in clip.y..clip.y + clip.height {
            for x in clip.x..clip.x + clip.width {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    fn copy_from(&mut self, source: &BackingImage, rect: Rect) {
        let src = source.pixels();
        let bound_w = self.image.width().min(src.width());
        let bound_h = self.image.height().min(src.height());
        let Some(clip) = rect.clip(bound_w, bound_h) else {
            return;
        };

        let dst_stride = self.image.width() as usize * BYTES_PER_PIXEL;
        let src_stride = src.width() as usize * BYTES_PER_PIXEL;
        let row_len = clip.width as usize * BYTES_PER_PIXEL;
        let col = clip.x as usize * BYTES_PER_PIXEL;

        let src_raw = src.as_raw();
        let dst_raw: &mut [u8] = &mut self.image;
        for y in clip.y as usize..(clip.y + clip.height) as usize {
            let s = y * src_stride + col;
            let d = y * dst_stride + col;
            dst_raw[d..d + row_len].copy_from_slice(&src_raw[s..s + row_len]);
        }
    }

    fn flush(&mut self) -> Result<(), MapError> {
        self.flushes += 1;
        Ok(())
    }
}
