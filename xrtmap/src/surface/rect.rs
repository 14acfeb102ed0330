//! Rectangle clipping for surface primitives.

/// A rectangle in surface pixel space. The origin may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// A rectangle that lies fully inside a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `size` centred on `(cx, cy)`.
    ///
    /// For even sizes the extra pixel falls to the right/bottom.
    pub fn centered(cx: i32, cy: i32, size: u32) -> Self {
        let half = (size / 2) as i32;
        Self::new(cx - half, cy - half, size, size)
    }

    /// Whether the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        let (ax1, ay1) = (
            self.x as i64 + self.width as i64,
            self.y as i64 + self.height as i64,
        );
        let (bx1, by1) = (
            other.x as i64 + other.width as i64,
            other.y as i64 + other.height as i64,
        );
        (self.x as i64) < bx1
            && (other.x as i64) < ax1
            && (self.y as i64) < by1
            && (other.y as i64) < ay1
    }

    /// Intersect with a `bound_w`×`bound_h` surface anchored at the origin.
    ///
    /// Returns `None` when nothing of the rectangle is visible.
    pub fn clip(&self, bound_w: u32, bound_h: u32) -> Option<ClippedRect> {
        let x0 = (self.x as i64).max(0);
        let y0 = (self.y as i64).max(0);
        let x1 = (self.x as i64 + self.width as i64).min(bound_w as i64);
        let y1 = (self.y as i64 + self.height as i64).min(bound_h as i64);

        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        Some(ClippedRect {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}
