use ndarray::{s, Array2};

use super::correlation::{best_match, ZeroMeanTemplate};
use crate::shared::constants::{DEFAULT_LEARNING_RATE, DEFAULT_MIN_SCORE, DEFAULT_SEARCH_MARGIN};
use crate::shared::frame::Frame;
use crate::shared::rect::BoxRegion;
use crate::tracking::domain::tracking_error::TrackingError;
use crate::tracking::domain::visual_tracker::VisualTracker;

#[derive(Clone, Debug, PartialEq)]
pub struct TemplateTrackerConfig {
    /// Search radius as a fraction of the target's width/height.
    pub search_margin: f64,
    /// Matches scoring below this are reported as lost.
    pub min_score: f32,
    /// How far the template moves toward each accepted match (0 = frozen).
    pub learning_rate: f32,
}

impl Default for TemplateTrackerConfig {
    fn default() -> Self {
        Self {
            search_margin: DEFAULT_SEARCH_MARGIN,
            min_score: DEFAULT_MIN_SCORE,
            learning_rate: DEFAULT_LEARNING_RATE,
        }
    }
}

#[derive(Clone, Debug)]
struct Target {
    pixels: Array2<f32>,
    template: ZeroMeanTemplate,
    x: usize,
    y: usize,
}

/// Fixed-size luma template tracker.
///
/// Each update scans a window around the previous position with normalized
/// cross-correlation and accepts the best match above `min_score`. The box
/// keeps the size it was initialized with.
#[derive(Clone, Debug)]
pub struct TemplateTracker {
    config: TemplateTrackerConfig,
    target: Option<Target>,
}

impl TemplateTracker {
    pub fn new(config: TemplateTrackerConfig) -> Self {
        Self {
            config,
            target: None,
        }
    }

    pub fn config(&self) -> &TemplateTrackerConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.target.is_some()
    }

    fn search_ranges(
        &self,
        target: &Target,
        frame_w: usize,
        frame_h: usize,
    ) -> (std::ops::RangeInclusive<usize>, std::ops::RangeInclusive<usize>) {
        let (th, tw) = target.template.dim();
        let mx = (tw as f64 * self.config.search_margin).ceil() as usize;
        let my = (th as f64 * self.config.search_margin).ceil() as usize;
        let x_hi = target.x.saturating_add(mx).min(frame_w - tw);
        let y_hi = target.y.saturating_add(my).min(frame_h - th);
        let x_lo = target.x.saturating_sub(mx).min(x_hi);
        let y_lo = target.y.saturating_sub(my).min(y_hi);
        (x_lo..=x_hi, y_lo..=y_hi)
    }
}

impl Default for TemplateTracker {
    fn default() -> Self {
        Self::new(TemplateTrackerConfig::default())
    }
}

fn luma_of(frame: &Frame) -> Result<Array2<f32>, TrackingError> {
    if frame.is_empty() {
        return Err(TrackingError::EmptyFrame);
    }
    Ok(frame.to_luma()?)
}

impl VisualTracker for TemplateTracker {
    fn init(&mut self, frame: &Frame, region: BoxRegion) -> Result<(), TrackingError> {
        self.target = None;
        let luma = luma_of(frame)?;

        let degenerate = TrackingError::DegenerateRegion {
            width: region.width,
            height: region.height,
        };
        if region.is_degenerate() {
            return Err(degenerate);
        }
        let x = region.x.round();
        let y = region.y.round();
        let origin_known = x.is_finite() && y.is_finite();
        let w = region.width.round();
        let h = region.height.round();
        if w < 1.0 || h < 1.0 {
            return Err(degenerate);
        }
        if !origin_known
            || x < 0.0
            || y < 0.0
            || x + w > frame.width() as f64
            || y + h > frame.height() as f64
        {
            return Err(TrackingError::RegionOutsideFrame {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                frame_width: frame.width(),
                frame_height: frame.height(),
            });
        }

        let (x, y, w, h) = (x as usize, y as usize, w as usize, h as usize);
        let pixels = luma.slice(s![y..y + h, x..x + w]).to_owned();
        let template = ZeroMeanTemplate::new(pixels.view());
        if template.is_flat() {
            log::debug!("Template at ({x}, {y}) {w}x{h} has no texture; matches will fail");
        }
        self.target = Some(Target {
            pixels,
            template,
            x,
            y,
        });
        Ok(())
    }

    fn update(&mut self, frame: &Frame) -> Result<Option<BoxRegion>, TrackingError> {
        let luma = luma_of(frame)?;
        let Some(target) = self.target.as_ref() else {
            return Ok(None);
        };

        let (th, tw) = target.template.dim();
        let (fh, fw) = luma.dim();
        if tw > fw || th > fh {
            return Ok(None);
        }

        let (xs, ys) = self.search_ranges(target, fw, fh);
        let Some((x, y, score)) = best_match(&luma, &target.template, xs, ys, (target.x, target.y))
        else {
            return Ok(None);
        };

        if score < self.config.min_score {
            log::trace!(
                "Best match ({x}, {y}) scored {score:.3}, below {:.3}",
                self.config.min_score
            );
            return Ok(None);
        }
        log::trace!("Matched at ({x}, {y}) with score {score:.3}");

        let rate = self.config.learning_rate;
        let Some(target) = self.target.as_mut() else {
            return Ok(None);
        };
        if rate > 0.0 {
            let matched = luma.slice(s![y..y + th, x..x + tw]);
            target.pixels = &target.pixels * (1.0 - rate) + &matched * rate;
            target.template = ZeroMeanTemplate::new(target.pixels.view());
        }
        target.x = x;
        target.y = y;

        Ok(Some(BoxRegion::new(
            x as f64,
            y as f64,
            tw as f64,
            th as f64,
        )))
    }

    fn clear(&mut self) {
        self.target = None;
    }

    fn box_clone(&self) -> Box<dyn VisualTracker> {
        Box::new(self.clone())
    }
}
