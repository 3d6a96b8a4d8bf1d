use crate::shared::frame::Frame;
use crate::shared::rect::{FrameRect, TrackerRect};
use crate::tracking::domain::tracking_error::TrackingError;

/// Where a tracker's working image sits inside the source frame.
///
/// The working image is the source frame downscaled by `scale`, then cropped
/// at `(offset_x, offset_y)`. Offsets are in downscaled pixels, so a working
/// coordinate `c` maps to `(c + offset) * scale` in the source frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    offset_x: i32,
    offset_y: i32,
    scale: f64,
}

impl Placement {
    pub fn new(offset_x: i32, offset_y: i32, scale: f64) -> Result<Self, TrackingError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(TrackingError::InvalidScale(scale));
        }
        if offset_x < 0 || offset_y < 0 {
            return Err(TrackingError::InvalidOffset {
                x: offset_x,
                y: offset_y,
            });
        }
        Ok(Self {
            offset_x,
            offset_y,
            scale,
        })
    }

    /// Working image is the source frame itself.
    pub fn identity() -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            scale: 1.0,
        }
    }

    pub fn offset_x(&self) -> i32 {
        self.offset_x
    }

    pub fn offset_y(&self) -> i32 {
        self.offset_y
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Maps a working-image rectangle onto the source frame.
    ///
    /// Each coordinate is truncated toward zero after scaling. Results past
    /// the `i64` range saturate.
    pub fn to_frame_space(&self, rect: &TrackerRect) -> FrameRect {
        let ox = self.offset_x as i64;
        let oy = self.offset_y as i64;
        let map = |c: i64, o: i64| (c.saturating_add(o) as f64 * self.scale) as i64;
        FrameRect::new(
            map(rect.left, ox),
            map(rect.top, oy),
            map(rect.right, ox),
            map(rect.bottom, oy),
        )
    }

    /// Maps a source-frame rectangle into the working image.
    ///
    /// Inverse of [`to_frame_space`](Self::to_frame_space) up to truncation.
    pub fn to_tracker_space(&self, rect: &FrameRect) -> TrackerRect {
        let ox = self.offset_x as f64;
        let oy = self.offset_y as f64;
        TrackerRect::new(
            (rect.left as f64 / self.scale - ox) as i64,
            (rect.top as f64 / self.scale - oy) as i64,
            (rect.right as f64 / self.scale - ox) as i64,
            (rect.bottom as f64 / self.scale - oy) as i64,
        )
    }

    /// Downscaled size of a `width x height` source frame.
    pub fn scaled_size(&self, width: u32, height: u32) -> (u32, u32) {
        let scale_dim = |d: u32| {
            if d == 0 {
                0
            } else {
                ((d as f64 / self.scale).round() as u32).max(1)
            }
        };
        (scale_dim(width), scale_dim(height))
    }

    /// Builds the working image for `frame`.
    ///
    /// `size` limits the crop; `None` keeps everything right of and below the
    /// offset. Windows reaching past the downscaled image are clipped.
    pub fn working_frame(
        &self,
        frame: &Frame,
        size: Option<(u32, u32)>,
    ) -> Result<Frame, TrackingError> {
        let (sw, sh) = self.scaled_size(frame.width(), frame.height());
        let scaled = frame.resize(sw, sh)?;

        let (cw, ch) = size.unwrap_or((
            sw.saturating_sub(self.offset_x as u32),
            sh.saturating_sub(self.offset_y as u32),
        ));
        if self.offset_x == 0 && self.offset_y == 0 && (cw, ch) == (sw, sh) {
            return Ok(scaled);
        }
        Ok(scaled.crop(self.offset_x as i64, self.offset_y as i64, cw, ch))
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}
