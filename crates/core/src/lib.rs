//! Single-face visual tracking.
//!
//! A [`TrackedFace`](tracking::domain::tracked_face::TrackedFace) owns one
//! tracker and maps the boxes it finds in a cropped, downscaled working image
//! back onto the full-resolution source frame.

pub mod pipeline;
pub mod shared;
pub mod tracking;
pub mod video;
