//! Session configuration.
//!
//! [`MapConfig`] gathers the tunables of a map session. The defaults match
//! the classic behaviour: markers live for 30 seconds, are 5×5 pixels, red,
//! and the loop wakes at least once a second while any marker is visible.

use std::time::Duration;

use image::Rgba;

use crate::error::MapError;

/// Default lifetime of a plotted point (in seconds).
pub const DEFAULT_EXPIRE_SECS: u64 = 30;

/// Default marker side length (in pixels).
pub const DEFAULT_MARKER_SIZE: u32 = 5;

/// Default wake-up interval while points are pending expiry.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Size of a single read from the control channel.
pub const CONTROL_CHUNK_SIZE: usize = 256;

/// Longest partial line kept between control reads before it is dropped.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// Default highlight color for markers.
pub const DEFAULT_HIGHLIGHT: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Configuration for a [`MapSession`](crate::session::MapSession).
#[derive(Clone, Debug, PartialEq)]
pub struct MapConfig {
    /// Age at which a point is erased from the map.
    pub expire_after: Duration,

    /// Side length of the square marker.
    pub marker_size: u32,

    /// Marker fill color.
    pub highlight: Rgba<u8>,

    /// Wait bound used while the ledger is non-empty.
    pub poll_interval: Duration,

    /// Bytes requested per control-channel read.
    pub chunk_size: usize,

    /// Upper bound on a buffered partial line.
    pub max_line_len: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            expire_after: Duration::from_secs(DEFAULT_EXPIRE_SECS),
            marker_size: DEFAULT_MARKER_SIZE,
            highlight: DEFAULT_HIGHLIGHT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            chunk_size: CONTROL_CHUNK_SIZE,
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

impl MapConfig {
    /// Set the point lifetime.
    pub fn with_expire_after(mut self, expire_after: Duration) -> Self {
        self.expire_after = expire_after;
        self
    }

    /// Set the marker side length.
    pub fn with_marker_size(mut self, marker_size: u32) -> Self {
        self.marker_size = marker_size;
        self
    }

    /// Set the marker color.
    pub fn with_highlight(mut self, highlight: Rgba<u8>) -> Self {
        self.highlight = highlight;
        self
    }

    /// Set the wake-up interval used while points are pending.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Check that the configuration can drive a session.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.expire_after.is_zero() {
            return Err(MapError::Config("expiry must be positive".to_string()));
        }
        if self.marker_size == 0 {
            return Err(MapError::Config(
                "marker size must be positive".to_string(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(MapError::Config(
                "poll interval must be positive".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(MapError::Config("chunk size must be positive".to_string()));
        }
        if self.max_line_len < self.chunk_size {
            return Err(MapError::Config(format!(
                "max line length {} is below the chunk size {}",
                self.max_line_len, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Parse a `RRGGBB` hex color (an optional leading `#` is accepted).
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>, MapError> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(MapError::Config(format!(
            "color '{}' is not in RRGGBB form",
            s
        )));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| MapError::Config(format!("color '{}' is not valid hex", s)))
    };

    Ok(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_constants() {
        let config = MapConfig::default();
        assert_eq!(config.expire_after, Duration::from_secs(30));
        assert_eq!(config.marker_size, 5);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.chunk_size, 256);
        assert_eq!(config.highlight, Rgba([255, 0, 0, 255]));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = MapConfig::default()
            .with_expire_after(Duration::from_secs(5))
            .with_marker_size(9)
            .with_highlight(Rgba([0, 255, 0, 255]))
            .with_poll_interval(Duration::from_millis(250));

        assert_eq!(config.expire_after, Duration::from_secs(5));
        assert_eq!(config.marker_size, 9);
        assert_eq!(config.highlight, Rgba([0, 255, 0, 255]));
        assert_eq!(config.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_validate_rejects_zero_marker() {
        let config = MapConfig::default().with_marker_size(0);
        assert!(matches!(config.validate(), Err(MapError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_expiry() {
        let config = MapConfig::default().with_expire_after(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_short_line_limit() {
        let config = MapConfig {
            max_line_len: 10,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("ff0000").unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_hex_color("#00Ff7f").unwrap(), Rgba([0, 255, 127, 255]));
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert!(parse_hex_color("red").is_err());
        assert!(parse_hex_color("gg0000").is_err());
        assert!(parse_hex_color("ff00001").is_err());
        assert!(parse_hex_color("ffé000").is_err());
    }
}
