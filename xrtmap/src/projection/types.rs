//! Pixel coordinate type produced by the projector.

use std::fmt;

/// A pixel position on the backing surface.
///
/// Coordinates are signed: points outside the valid latitude/longitude range
/// project outside the surface, and drawing them is simply clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    /// Column, growing eastward from the antimeridian.
    pub x: i32,
    /// Row, growing southward from the north pole.
    pub y: i32,
}

impl PixelCoord {
    /// Create a new pixel coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Check whether the coordinate falls inside a `width`×`height` surface.
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && (self.x as i64) < width as i64
            && (self.y as i64) < height as i64
    }
}

impl fmt::Display for PixelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
