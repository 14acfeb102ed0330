//! winit + pixels presentation of the shared frame buffer.

use pixels::{Pixels, SurfaceTexture};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopBuilder};
use winit::window::WindowBuilder;

use xrtmap::surface::SurfaceEvent;

use super::{DisplayCommand, SharedFrame};
use crate::error::CliError;

/// Initial window width (two pixels per degree of longitude).
pub const DEFAULT_WINDOW_WIDTH: u32 = 720;

/// Initial window height (two pixels per degree of latitude).
pub const DEFAULT_WINDOW_HEIGHT: u32 = 360;

/// Window creation settings.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "xrtmap".to_string(),
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Connect to the windowing system.
///
/// Must be called on the main thread.
pub fn create_event_loop() -> Result<EventLoop<DisplayCommand>, CliError> {
    EventLoopBuilder::<DisplayCommand>::with_user_event()
        .build()
        .map_err(|e| CliError::Display(format!("cannot connect to display: {}", e)))
}

/// Open the window and present `frame` until the session ends or the window
/// is closed.
///
/// Window events are forwarded to the session as [`SurfaceEvent`]s. A redraw
/// the system asks for becomes [`SurfaceEvent::Redraw`]; a redraw triggered by
/// the session's own flush is only presented.
pub fn run_window(
    config: WindowConfig,
    event_loop: EventLoop<DisplayCommand>,
    frame: SharedFrame,
    events: UnboundedSender<SurfaceEvent>,
    shutdown: CancellationToken,
) -> Result<(), CliError> {
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64))
        .build(&event_loop)
        .map_err(|e| CliError::Display(e.to_string()))?;

    let (buffer_width, buffer_height) = frame.lock().image().dimensions();
    let mut pixels = {
        let size = window.inner_size();
        let texture = SurfaceTexture::new(size.width, size.height, &window);
        Pixels::new(buffer_width, buffer_height, texture)
            .map_err(|e| CliError::Display(e.to_string()))?
    };

    let mut present_pending = false;
    let mut failure: Option<CliError> = None;

    event_loop
        .run(|event, elwt| {
            elwt.set_control_flow(ControlFlow::Wait);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        debug!("Window close requested");
                        shutdown.cancel();
                        elwt.exit();
                    }
                    WindowEvent::Resized(size) => {
                        if size.width > 0 && size.height > 0 {
                            if let Err(e) = pixels.resize_surface(size.width, size.height) {
                                warn!(error = %e, "Failed to resize surface");
                            }
                        }
                        let _ = events.send(SurfaceEvent::Resize {
                            width: size.width,
                            height: size.height,
                        });
                        present_pending = true;
                        window.request_redraw();
                    }
                    WindowEvent::RedrawRequested => {
                        if present_pending {
                            present_pending = false;
                        } else {
                            let _ = events.send(SurfaceEvent::Redraw);
                        }

                        pixels.frame_mut().copy_from_slice(frame.lock().as_raw());
                        if let Err(e) = pixels.render() {
                            error!(error = %e, "Failed to present frame");
                            failure = Some(CliError::Display(e.to_string()));
                            shutdown.cancel();
                            elwt.exit();
                        }
                    }
                    _ => {}
                },
                Event::UserEvent(DisplayCommand::Present) => {
                    present_pending = true;
                    window.request_redraw();
                }
                Event::UserEvent(DisplayCommand::Exit) => {
                    debug!("Session ended, closing window");
                    elwt.exit();
                }
                _ => {}
            }
        })
        .map_err(|e| CliError::Display(e.to_string()))?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
