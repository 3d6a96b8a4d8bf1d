use crate::shared::rect::{FrameRect, TrackerRect};
use crate::tracking::domain::tracked_face::TrackedFace;
use crate::tracking::domain::tracking_state::TrackingState;
use crate::video::domain::frame_source::FrameSource;

/// Where the face was on one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceObservation {
    pub frame_index: usize,
    pub state: TrackingState,
    pub tracker_bounds: TrackerRect,
    pub frame_bounds: FrameRect,
}

/// Progress callback: `(current, total) -> keep_going`.
pub type ProgressFn = Box<dyn Fn(usize, usize) -> bool + Send>;

/// Single-face tracking pipeline: read → working image → start/update → report.
///
/// The first frame initializes the tracker at the face's current bounds;
/// every later frame updates it. Each frame is reduced to the face's working
/// image before the tracker sees it.
pub struct TrackFaceUseCase {
    source: Box<dyn FrameSource>,
    face: TrackedFace,
    working_size: Option<(u32, u32)>,
    on_progress: Option<ProgressFn>,
}

impl TrackFaceUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        face: TrackedFace,
        working_size: Option<(u32, u32)>,
        on_progress: Option<ProgressFn>,
    ) -> Self {
        Self {
            source,
            face,
            working_size,
            on_progress,
        }
    }

    pub fn face(&self) -> &TrackedFace {
        &self.face
    }

    /// Runs the whole source, returning one observation per processed frame.
    ///
    /// Stops early (without error) when the progress callback returns `false`.
    pub fn execute(&mut self) -> Result<Vec<FaceObservation>, Box<dyn std::error::Error>> {
        let total = self.source.len();
        let placement = self.face.placement();
        let mut observations = Vec::with_capacity(total);
        let mut lost_frames = 0usize;

        for (i, frame) in self.source.frames().enumerate() {
            let frame = frame?;
            let working = placement.working_frame(&frame, self.working_size)?;

            if i == 0 {
                self.face.start_tracking(&working)?;
            } else if !self.face.update_tracking(&working)? {
                lost_frames += 1;
            }

            observations.push(FaceObservation {
                frame_index: frame.index(),
                state: self.face.state(),
                tracker_bounds: self.face.bounds(),
                frame_bounds: self.face.frame_bounds(),
            });

            if let Some(ref cb) = self.on_progress {
                if !cb(i + 1, total) {
                    log::info!("Tracking cancelled after {} frames", i + 1);
                    break;
                }
            }
        }

        log::info!(
            "Tracked {} frames, face not found in {lost_frames}",
            observations.len()
        );
        Ok(observations)
    }
}
