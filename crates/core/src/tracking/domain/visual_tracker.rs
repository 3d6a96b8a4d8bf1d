use crate::shared::frame::Frame;
use crate::shared::rect::BoxRegion;
use crate::tracking::domain::tracking_error::TrackingError;

/// Domain interface for a single-target visual tracking algorithm.
///
/// Regions are in the coordinate space of the frames passed in. Implementations
/// hold mutable per-target state, hence `&mut self`.
pub trait VisualTracker: Send {
    /// Starts tracking `region` in `frame`, replacing any previous target.
    fn init(&mut self, frame: &Frame, region: BoxRegion) -> Result<(), TrackingError>;

    /// Locates the target in `frame`.
    ///
    /// `Ok(None)` means the target was not found (or `init` never succeeded);
    /// `Err` is reserved for malformed input.
    fn update(&mut self, frame: &Frame) -> Result<Option<BoxRegion>, TrackingError>;

    /// Drops all target state.
    fn clear(&mut self);

    /// Deep copy, including target state.
    fn box_clone(&self) -> Box<dyn VisualTracker>;
}

impl Clone for Box<dyn VisualTracker> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}
