//! Application wiring for the `xrtmap` binary.
//!
//! # Architecture
//!
//! - The main thread owns the winit event loop and presents the frame
//! - A dedicated session thread runs [`MapSession`] on a current-thread Tokio
//!   runtime, reading control lines from stdin
//! - A [`CancellationToken`] shared by both sides (and the Ctrl-C handler)
//!   stops the session; the session closes the window when it ends
//!
//! Fatal errors from either side come back here as a [`CliError`].

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use winit::event_loop::EventLoopProxy;

use xrtmap::config::MapConfig;
use xrtmap::session::{MapSession, SessionStats};
use xrtmap::surface::{BackingImage, FrameBuffer, SurfaceEvent};

use crate::display::{
    create_event_loop, run_window, DisplayCommand, SharedFrame, SharedSurface, WindowConfig,
};
use crate::error::CliError;

/// Everything needed to start the plotter.
#[derive(Debug, Clone)]
pub struct MapAppConfig {
    /// Path to the raster world map.
    pub image_path: PathBuf,
    /// Session tunables.
    pub map: MapConfig,
    /// Window settings.
    pub window: WindowConfig,
}

/// Load the map, open the window and run until the session ends.
///
/// Returns the session's final counters.
pub fn run(config: MapAppConfig) -> Result<SessionStats, CliError> {
    let MapAppConfig {
        image_path,
        map,
        window,
    } = config;

    map.validate()?;
    let event_loop = create_event_loop()?;
    let backing = BackingImage::load(&image_path)?;

    let proxy = event_loop.create_proxy();
    let frame: SharedFrame = Arc::new(Mutex::new(FrameBuffer::for_backing(&backing)));
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let shutdown = CancellationToken::new();

    install_signal_handler(shutdown.clone(), proxy.clone())?;

    let surface = SharedSurface::new(Arc::clone(&frame), proxy.clone(), shutdown.clone());
    let session = spawn_session(map, backing, surface, events_rx, shutdown.clone(), proxy)?;

    let window_result = run_window(window, event_loop, frame, events_tx, shutdown.clone());

    // The window may have gone first; make sure the session stops too
    shutdown.cancel();
    let stats = session
        .join()
        .map_err(|_| CliError::Thread("session thread panicked".to_string()))??;
    window_result?;

    info!(stats = %stats, "Exiting");
    Ok(stats)
}

/// Cancel the session and close the window on Ctrl-C.
fn install_signal_handler(
    shutdown: CancellationToken,
    proxy: EventLoopProxy<DisplayCommand>,
) -> Result<(), CliError> {
    ctrlc::set_handler(move || {
        shutdown.cancel();
        let _ = proxy.send_event(DisplayCommand::Exit);
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))
}

/// Run the map session on its own thread with a current-thread runtime.
fn spawn_session(
    map: MapConfig,
    backing: BackingImage,
    surface: SharedSurface,
    mut events: mpsc::UnboundedReceiver<SurfaceEvent>,
    shutdown: CancellationToken,
    proxy: EventLoopProxy<DisplayCommand>,
) -> Result<JoinHandle<Result<SessionStats, CliError>>, CliError> {
    std::thread::Builder::new()
        .name("xrtmap-session".to_string())
        .spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .map_err(|e| CliError::Thread(format!("Failed to create Tokio runtime: {}", e)))?;

            let result = runtime.block_on(async {
                let mut session = MapSession::new(map, backing, surface)?;
                session
                    .run(&mut events, tokio::io::stdin(), shutdown)
                    .await
            });

            // A stdin read may still be parked on the blocking pool
            runtime.shutdown_background();
            let _ = proxy.send_event(DisplayCommand::Exit);

            result.map_err(CliError::from)
        })
        .map_err(|e| CliError::Thread(e.to_string()))
}
