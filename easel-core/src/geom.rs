//! Integer geometry shared by every easel crate.
//!
//! Coordinates follow the raster convention: the origin is the top-left
//! corner and Y grows downward. A [`Rect`] is half-open, so `max` is the
//! first column/row *outside* the rectangle.

use std::fmt;

/// An (x, y) coordinate pair in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The origin (0, 0).
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Shorthand for [`Point::new`].
pub const fn pt(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

/// An axis-aligned rectangle spanning `min` (inclusive) to `max` (exclusive).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Rect = Rect {
        min: Point::ZERO,
        max: Point::ZERO,
    };

    /// Build a rectangle from two corners. The corners are swapped as
    /// needed so that the result is well-formed.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Build a rectangle from its top-left corner and size.
    pub fn from_size(origin: Point, width: u32, height: u32) -> Self {
        Self {
            min: origin,
            max: Point::new(origin.x + width as i32, origin.y + height as i32),
        }
    }

    /// Width of the rectangle.
    pub const fn dx(&self) -> i32 {
        self.max.x - self.min.x
    }

    /// Height of the rectangle.
    pub const fn dy(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// Width and height as unsigned values (0 for degenerate rects).
    pub fn size(&self) -> (u32, u32) {
        (self.dx().max(0) as u32, self.dy().max(0) as u32)
    }

    /// Whether the rectangle covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Whether `p` lies inside the rectangle.
    pub const fn contains(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x < self.max.x && self.min.y <= p.y && p.y < self.max.y
    }

    /// The largest rectangle contained in both `self` and `other`, or
    /// [`Rect::ZERO`] when they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let r = Rect {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() {
            Rect::ZERO
        } else {
            r
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

// ===================================================================
// Tests
// ===================================================================
