use crate::shared::frame::Frame;

/// Ordered supply of frames for a tracking run.
///
/// Implementations handle decoding; the pipeline only sees `Frame`s.
pub trait FrameSource: Send {
    /// Number of frames the source will yield.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over frames in playback order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;
}
