//! Display provider seam.
//!
//! The session never talks to a windowing system directly. It sees:
//!
//! - a [`Surface`] it can fill, restore from the [`BackingImage`], and flush
//! - a stream of [`SurfaceEvent`]s (redraw requested, surface resized)
//!
//! # Architecture
//!
//! ```text
//!  window backend ──► SurfaceEvent ──► MapSession ──► Renderer ──► Surface
//!        ▲                                                          │
//!        └──────────────────────── flush ◄──────────────────────────┘
//! ```
//!
//! [`FrameBuffer`] is the in-memory implementation used by the window
//! backend and by tests.

mod backing;
mod framebuffer;
mod rect;

pub use backing::BackingImage;
pub use framebuffer::FrameBuffer;
pub use rect::{ClippedRect, Rect};

use image::Rgba;

use crate::error::MapError;

/// Signals from the display provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The visible surface was invalidated and must be repainted.
    Redraw,
    /// The window changed size.
    Resize { width: u32, height: u32 },
}

/// Window size as last reported by the display provider.
///
/// Tracked for diagnostics only: projection always uses the backing image's
/// native resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayGeometry {
    pub width: u32,
    pub height: u32,
}

/// A live drawable surface.
///
/// Primitives clip to the surface; drawing outside it is a silent no-op.
/// Changes are only guaranteed visible after [`flush`](Surface::flush).
pub trait Surface {
    /// Surface dimensions in pixels.
    fn size(&self) -> (u32, u32);

    /// Fill `rect` with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>);

    /// Copy `rect` from the backing image to the same position on the surface.
    fn copy_from(&mut self, source: &BackingImage, rect: Rect);

    /// Make pending changes visible to the display consumer.
    fn flush(&mut self) -> Result<(), MapError>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        (**self).fill_rect(rect, color)
    }

    fn copy_from(&mut self, source: &BackingImage, rect: Rect) {
        (**self).copy_from(source, rect)
    }

    fn flush(&mut self) -> Result<(), MapError> {
        (**self).flush()
    }
}
