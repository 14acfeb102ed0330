//! xrtmap - real-time point plotting on a raster world map
//!
//! This library holds the core of the plotter: the point ledger with
//! time-based expiry, the equirectangular projection, marker rendering onto
//! an abstract surface, control-line decoding, and the session loop that ties
//! them together. Window creation lives in the `xrtmap-cli` crate.
//!
//! # Example
//!
//! ```ignore
//! use xrtmap::config::MapConfig;
//! use xrtmap::session::MapSession;
//! use xrtmap::surface::{BackingImage, FrameBuffer};
//!
//! let backing = BackingImage::load("world.png")?;
//! let surface = FrameBuffer::for_backing(&backing);
//! let mut session = MapSession::new(MapConfig::default(), backing, surface)?;
//!
//! let stats = session.run(&mut events, tokio::io::stdin(), shutdown).await?;
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod ledger;
pub mod projection;
pub mod render;
pub mod session;
pub mod surface;

pub use error::MapError;
