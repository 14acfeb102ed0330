//! xrtmap - plot geographic points on a raster world map in real time.
//!
//! Reads `<latitude> <longitude>` lines from stdin and highlights each point
//! on the map for a fixed time.

mod app;
mod display;
mod error;
mod logging;

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use image::Rgba;

use xrtmap::config::{parse_hex_color, MapConfig, DEFAULT_EXPIRE_SECS, DEFAULT_MARKER_SIZE};

use crate::app::MapAppConfig;
use crate::display::WindowConfig;

/// Real-time geo-point plotter over a raster world map
#[derive(Parser, Debug)]
#[command(name = "xrtmap", author, version, about, long_about = None)]
struct Cli {
    /// Equirectangular world map image (any format the image crate reads)
    image: PathBuf,

    /// Seconds a point stays highlighted
    #[arg(long, default_value_t = DEFAULT_EXPIRE_SECS)]
    expire_secs: u64,

    /// Marker edge length in pixels
    #[arg(long, default_value_t = DEFAULT_MARKER_SIZE)]
    marker_size: u32,

    /// Marker colour as RRGGBB
    #[arg(long, default_value = "ff0000", value_parser = parse_hex_color)]
    color: Rgba<u8>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn map_config(&self) -> MapConfig {
        MapConfig::default()
            .with_expire_after(Duration::from_secs(self.expire_secs))
            .with_marker_size(self.marker_size)
            .with_highlight(self.color)
    }

    fn into_app_config(self) -> MapAppConfig {
        MapAppConfig {
            map: self.map_config(),
            image_path: self.image,
            window: WindowConfig::default(),
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                process::exit(1);
            }
        },
    };

    let log_guard = match logging::init(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("xrtmap: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = app::run(cli.into_app_config()) {
        tracing::error!(error = %e, "Fatal error");
        eprintln!("xrtmap: {}", e);
        drop(log_guard);
        process::exit(1);
    }
}
