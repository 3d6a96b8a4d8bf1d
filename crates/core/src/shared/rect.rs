//! Corner-pair rectangles tagged with the coordinate space they live in.
//!
//! A tracker works on a cropped, downscaled copy of the source frame, so the
//! same face has two different boxes. Tagging the space in the type keeps a
//! tracker-space box from being drawn on the full-resolution frame (or scaled
//! twice) by accident.

use std::fmt;
use std::marker::PhantomData;

/// Coordinates of the (possibly cropped and downscaled) image fed to a tracker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TrackerSpace;

/// Coordinates of the original, full-resolution source frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameSpace;

/// Axis-aligned rectangle as `(left, top, right, bottom)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect<S> {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
    space: PhantomData<S>,
}

pub type TrackerRect = Rect<TrackerSpace>;
pub type FrameRect = Rect<FrameSpace>;

impl<S> Rect<S> {
    pub fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            space: PhantomData,
        }
    }

    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// True when the corners are out of order.
    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.top > self.bottom
    }

    /// True when the rectangle covers no area.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn translate(&self, dx: i64, dy: i64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    /// Converts to the top-left/size box trackers consume.
    pub fn to_box(&self) -> BoxRegion {
        BoxRegion {
            x: self.left as f64,
            y: self.top as f64,
            width: self.width() as f64,
            height: self.height() as f64,
        }
    }

    /// Converts a tracker box back to corners, truncating toward zero.
    pub fn from_box(region: &BoxRegion) -> Self {
        Self::new(
            region.x as i64,
            region.y as i64,
            (region.x + region.width) as i64,
            (region.y + region.height) as i64,
        )
    }
}

impl<S> fmt::Display for Rect<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[({}, {}) ({}, {})]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Tracker-native region: top-left corner plus size, in tracker space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxRegion {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}
