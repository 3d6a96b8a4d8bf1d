use crate::shared::frame::Frame;
use crate::shared::rect::{FrameRect, TrackerRect};
use crate::tracking::domain::placement::Placement;
use crate::tracking::domain::tracking_error::TrackingError;
use crate::tracking::domain::tracking_state::TrackingState;
use crate::tracking::domain::visual_tracker::VisualTracker;

/// One face followed from frame to frame by its own tracker.
///
/// `bounds` live in the space of the working image last given to
/// [`start_tracking`](Self::start_tracking) or
/// [`update_tracking`](Self::update_tracking); [`frame_bounds`](Self::frame_bounds)
/// maps them back to the source frame through the face's [`Placement`].
///
/// Cloning deep-copies the tracker, so two clones never share tracking state.
#[derive(Clone)]
pub struct TrackedFace {
    bounds: TrackerRect,
    placement: Placement,
    tracker: Box<dyn VisualTracker>,
    state: TrackingState,
}

impl TrackedFace {
    pub fn new(tracker: Box<dyn VisualTracker>) -> Self {
        Self {
            bounds: TrackerRect::default(),
            placement: Placement::identity(),
            tracker,
            state: TrackingState::Uninitialized,
        }
    }

    /// A face handed over by a detector: its box in the working image and
    /// where that image sits in the source frame.
    pub fn with_region(
        tracker: Box<dyn VisualTracker>,
        bounds: TrackerRect,
        placement: Placement,
    ) -> Self {
        Self {
            bounds,
            placement,
            ..Self::new(tracker)
        }
    }

    pub fn bounds(&self) -> TrackerRect {
        self.bounds
    }

    /// Replaces the tracker-space box. Takes effect on the next
    /// [`start_tracking`](Self::start_tracking).
    pub fn set_bounds(&mut self, bounds: TrackerRect) {
        self.bounds = bounds;
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
    }

    pub fn offset_x(&self) -> i32 {
        self.placement.offset_x()
    }

    pub fn offset_y(&self) -> i32 {
        self.placement.offset_y()
    }

    pub fn scale(&self) -> f64 {
        self.placement.scale()
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    /// (Re)initializes the tracker on `frame` at the current bounds.
    ///
    /// Inputs are not validated here; whatever the tracker rejects is
    /// returned and the face is left uninitialized.
    pub fn start_tracking(&mut self, frame: &Frame) -> Result<(), TrackingError> {
        self.tracker.clear();
        self.state = TrackingState::Uninitialized;
        self.tracker.init(frame, self.bounds.to_box())?;
        self.state = TrackingState::Tracking;
        log::debug!("Started tracking at {} (frame {})", self.bounds, frame.index());
        Ok(())
    }

    /// Asks the tracker for the face in `frame`.
    ///
    /// Returns `true` and moves the bounds when the face was found. Returns
    /// `false` and keeps the previous bounds when it was not. Tracker errors
    /// leave bounds and state untouched.
    pub fn update_tracking(&mut self, frame: &Frame) -> Result<bool, TrackingError> {
        match self.tracker.update(frame)? {
            Some(region) => {
                self.bounds = TrackerRect::from_box(&region);
                self.state = TrackingState::Tracking;
                Ok(true)
            }
            None => {
                if self.state == TrackingState::Tracking {
                    log::debug!("Lost face at {} (frame {})", self.bounds, frame.index());
                }
                if self.state != TrackingState::Uninitialized {
                    self.state = TrackingState::Lost;
                }
                Ok(false)
            }
        }
    }

    /// Current bounds in source-frame coordinates.
    pub fn frame_bounds(&self) -> FrameRect {
        self.placement.to_frame_space(&self.bounds)
    }
}

impl std::fmt::Debug for TrackedFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackedFace")
            .field("bounds", &self.bounds)
            .field("placement", &self.placement)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
