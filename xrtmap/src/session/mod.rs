//! The map session: point lifecycle and event multiplexing.
//!
//! [`MapSession`] owns the point ledger, the renderer, the backing image and
//! the live surface. Its [`run`](MapSession::run) loop interleaves three
//! sources on a single task:
//!
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            │                  MapSession                   │
//!            │                                               │
//!  Surface ──┼─► drain events ──► Redraw: repaint            │
//!  events    │                    Resize: update geometry    │
//!            │        │                                      │
//!            │        ▼                                      │
//!            │   select! { events | control | timeout }      │
//!            │        │                                      │
//!  Control ──┼─► chunk ──► lines ──► enqueue + draw + flush  │
//!  channel   │        │                                      │
//!            │        ▼                                      │
//!            │   expiry sweep (every iteration)              │
//!            └──────────────────────────────────────────────┘
//! ```
//!
//! The wait is unbounded while the ledger is empty and bounded by the poll
//! interval otherwise, so an expired marker stays visible for at most about
//! one poll interval.

mod stats;

pub use stats::SessionStats;

use std::future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::error::MapError;
use crate::input::{decode_line, Coordinate, LineAssembler};
use crate::ledger::PointLedger;
use crate::projection::Projector;
use crate::render::Renderer;
use crate::surface::{BackingImage, DisplayGeometry, Rect, Surface, SurfaceEvent};

/// Why the surface event queue stopped yielding events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drain {
    /// Queue is empty; the display is still connected.
    Idle,
    /// All senders are gone; the display went away.
    Closed,
}

/// Live map state driven by surface events and control input.
pub struct MapSession<S: Surface> {
    config: MapConfig,
    backing: BackingImage,
    renderer: Renderer,
    ledger: PointLedger,
    surface: S,
    geometry: DisplayGeometry,
    assembler: LineAssembler,
    stats: SessionStats,
}

impl<S: Surface> MapSession<S> {
    /// Create a session drawing onto `surface` over `backing`.
    ///
    /// The projection is fixed to the backing image's native resolution.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Config`] if the configuration is invalid.
    pub fn new(config: MapConfig, backing: BackingImage, surface: S) -> Result<Self, MapError> {
        config.validate()?;

        let projector = Projector::for_image(&backing);
        let renderer = Renderer::new(projector, config.marker_size, config.highlight);
        let (width, height) = surface.size();
        let assembler = LineAssembler::new(config.max_line_len);

        debug!(
            image_width = backing.width(),
            image_height = backing.height(),
            surface_width = width,
            surface_height = height,
            "Map session created"
        );

        Ok(Self {
            config,
            backing,
            renderer,
            ledger: PointLedger::new(),
            surface,
            geometry: DisplayGeometry { width, height },
            assembler,
            stats: SessionStats::default(),
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn ledger(&self) -> &PointLedger {
        &self.ledger
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn projector(&self) -> &Projector {
        self.renderer.projector()
    }

    /// Last window size reported by the display.
    pub fn display_geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Repaint the backing image and every live marker, then flush.
    pub fn repaint(&mut self) -> Result<(), MapError> {
        self.renderer
            .repaint(&mut self.surface, &self.backing, &self.ledger);
        self.stats.repaints += 1;
        self.surface.flush()
    }

    /// Apply one surface event. Does not flush.
    pub fn handle_surface_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Redraw => {
                self.renderer
                    .repaint(&mut self.surface, &self.backing, &self.ledger);
                self.stats.repaints += 1;
            }
            SurfaceEvent::Resize { width, height } => {
                debug!(width, height, "Display resized");
                self.geometry = DisplayGeometry { width, height };
            }
        }
    }

    /// Record a point and draw its marker. Does not flush.
    pub fn plot(&mut self, coord: Coordinate) {
        self.ledger.enqueue(coord.latitude, coord.longitude);
        self.renderer
            .draw_marker(&mut self.surface, coord.latitude, coord.longitude);
        self.stats.plotted += 1;
        debug!(
            lat = coord.latitude,
            lon = coord.longitude,
            live = self.ledger.len(),
            "Plotted point"
        );
    }

    /// Decode a raw control chunk and plot every valid line in it.
    ///
    /// Malformed lines are logged and skipped. The surface is flushed once
    /// if anything was drawn. Returns the number of points plotted.
    pub fn handle_control_chunk(&mut self, chunk: &[u8]) -> Result<usize, MapError> {
        let mut plotted = 0;
        for line in self.assembler.push(chunk) {
            match decode_line(&line) {
                Ok(coord) => {
                    self.plot(coord);
                    plotted += 1;
                }
                Err(e) => {
                    warn!(line = %line, "{}", e);
                    self.stats.rejected += 1;
                }
            }
        }

        if plotted > 0 {
            self.surface.flush()?;
        }
        Ok(plotted)
    }

    /// Erase and drop every point that has reached its expiry age at `now`.
    ///
    /// Only the expired prefix of the ledger is visited. Live markers that
    /// overlapped an erased square are drawn again so they stay whole.
    /// Returns the number of expired points.
    pub fn sweep_expired(&mut self, now: Instant) -> Result<usize, MapError> {
        let expire_after = self.config.expire_after;
        let mut erased: Vec<Rect> = Vec::new();

        while let Some(point) = self.ledger.peek_oldest() {
            if !point.is_expired(now, expire_after) {
                break;
            }
            let (lat, lon) = (point.latitude, point.longitude);
            self.renderer
                .undraw_marker(&mut self.surface, &self.backing, lat, lon);
            self.ledger.dequeue_oldest();
            erased.push(self.renderer.marker_rect(lat, lon));
        }

        if erased.is_empty() {
            return Ok(0);
        }

        for point in self.ledger.iter() {
            let rect = self.renderer.marker_rect(point.latitude, point.longitude);
            if erased.iter().any(|e| e.intersects(&rect)) {
                self.renderer
                    .draw_marker(&mut self.surface, point.latitude, point.longitude);
            }
        }

        let count = erased.len();
        self.stats.expired += count as u64;
        debug!(count, live = self.ledger.len(), "Expired points");
        self.surface.flush()?;
        Ok(count)
    }

    /// Wait bound for the next iteration: the poll interval while points are
    /// pending expiry, `None` (block indefinitely) otherwise.
    pub fn wait_timeout(&self) -> Option<Duration> {
        if self.ledger.is_empty() {
            None
        } else {
            Some(self.config.poll_interval)
        }
    }

    /// Handle `first` (if any) and every surface event already queued, then
    /// flush once if anything was handled.
    fn drain_surface_events(
        &mut self,
        first: Option<SurfaceEvent>,
        events: &mut mpsc::UnboundedReceiver<SurfaceEvent>,
    ) -> Result<Drain, MapError> {
        let mut handled = 0usize;
        if let Some(event) = first {
            self.handle_surface_event(event);
            handled += 1;
        }

        let state = loop {
            match events.try_recv() {
                Ok(event) => {
                    self.handle_surface_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty) => break Drain::Idle,
                Err(TryRecvError::Disconnected) => break Drain::Closed,
            }
        };

        if handled > 0 {
            self.surface.flush()?;
        }
        Ok(state)
    }

    /// Run until `shutdown` is cancelled or the display goes away.
    ///
    /// Paints the map once, then loops: drain surface events, wait on
    /// surface events, the control channel and the expiry timeout, dispatch
    /// whatever became ready, and sweep expired points.
    ///
    /// # Errors
    ///
    /// Fails with [`MapError::ControlClosed`] when the control channel reaches
    /// end of input and [`MapError::ControlRead`] when reading it fails.
    pub async fn run<R>(
        &mut self,
        events: &mut mpsc::UnboundedReceiver<SurfaceEvent>,
        mut control: R,
        shutdown: CancellationToken,
    ) -> Result<SessionStats, MapError>
    where
        R: AsyncRead + Unpin,
    {
        info!(
            expire_secs = self.config.expire_after.as_secs_f64(),
            marker_size = self.config.marker_size,
            "Map session starting"
        );

        self.repaint()?;
        let mut buf = vec![0u8; self.config.chunk_size];

        loop {
            if self.drain_surface_events(None, events)? == Drain::Closed {
                info!("Display closed");
                break;
            }

            let timeout = self.wait_timeout();
            let expiry_tick = async move {
                match timeout {
                    Some(duration) => tokio::time::sleep(duration).await,
                    None => future::pending::<()>().await,
                }
            };

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Map session shutting down");
                    break;
                }

                event = events.recv() => match event {
                    Some(event) => {
                        self.drain_surface_events(Some(event), events)?;
                    }
                    None => {
                        info!("Display closed");
                        break;
                    }
                },

                read = control.read(&mut buf) => {
                    let n = read?;
                    if n == 0 {
                        return Err(MapError::ControlClosed);
                    }
                    self.handle_control_chunk(&buf[..n])?;
                }

                _ = expiry_tick => {}
            }

            self.sweep_expired(Instant::now())?;
        }

        info!(stats = %self.stats, "Map session stopped");
        Ok(self.stats)
    }
}
