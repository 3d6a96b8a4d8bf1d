pub mod placement;
pub mod tracked_face;
pub mod tracking_error;
pub mod tracking_state;
pub mod visual_tracker;
