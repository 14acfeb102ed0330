//! Window backend for the map session.
//!
//! winit owns the main thread, so the session runs elsewhere and the two
//! sides meet at a shared frame buffer:
//!
//! ```text
//!   session thread                          main thread (winit)
//!   ──────────────                          ───────────────────
//!   Renderer ──► SharedSurface ──lock──► FrameBuffer ◄──lock── present (pixels)
//!                     │                                           ▲
//!                     └── flush ──► DisplayCommand::Present ──────┘
//!
//!   MapSession ◄── SurfaceEvent (mpsc) ◄── Resized / RedrawRequested
//! ```

mod window;

pub use window::{create_event_loop, run_window, WindowConfig};

use std::sync::Arc;

use image::Rgba;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use winit::event_loop::EventLoopProxy;

use xrtmap::surface::{BackingImage, FrameBuffer, Rect, Surface};
use xrtmap::MapError;

/// Requests sent from the session thread to the window thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCommand {
    /// The frame buffer changed; present it.
    Present,
    /// The session ended; close the window.
    Exit,
}

/// Frame buffer shared between the session and the window.
pub type SharedFrame = Arc<Mutex<FrameBuffer>>;

/// [`Surface`] that draws into the shared frame and wakes the window on flush.
pub struct SharedSurface {
    frame: SharedFrame,
    proxy: EventLoopProxy<DisplayCommand>,
    shutdown: CancellationToken,
}

impl SharedSurface {
    pub fn new(
        frame: SharedFrame,
        proxy: EventLoopProxy<DisplayCommand>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            frame,
            proxy,
            shutdown,
        }
    }
}

/// Outcome of waking the window after a flush.
///
/// The event loop going away is only an error while the session is still
/// meant to be running; once shutdown was requested it is the normal close.
fn present_result<E>(sent: Result<(), E>, shutdown: &CancellationToken) -> Result<(), MapError> {
    match sent {
        Ok(()) => Ok(()),
        Err(_) if shutdown.is_cancelled() => Ok(()),
        Err(_) => Err(MapError::Display(
            "window event loop has closed".to_string(),
        )),
    }
}

impl Surface for SharedSurface {
    fn size(&self) -> (u32, u32) {
        self.frame.lock().size()
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        self.frame.lock().fill_rect(rect, color);
    }

    fn copy_from(&mut self, source: &BackingImage, rect: Rect) {
        self.frame.lock().copy_from(source, rect);
    }

    fn flush(&mut self) -> Result<(), MapError> {
        self.frame.lock().flush()?;
        present_result(
            self.proxy.send_event(DisplayCommand::Present),
            &self.shutdown,
        )
    }
}
