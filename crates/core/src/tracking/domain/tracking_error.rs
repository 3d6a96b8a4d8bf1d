use thiserror::Error;

use crate::shared::frame::FrameError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackingError {
    #[error("frame has no pixels")]
    EmptyFrame,
    #[error("region {width}x{height} has no area")]
    DegenerateRegion { width: f64, height: f64 },
    #[error("region at ({x}, {y}) size {width}x{height} is not inside the {frame_width}x{frame_height} frame")]
    RegionOutsideFrame {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        frame_width: u32,
        frame_height: u32,
    },
    #[error("frames with {0} channels are not supported")]
    UnsupportedChannels(u8),
    #[error("scale must be finite and > 0, got {0}")]
    InvalidScale(f64),
    #[error("working image offset ({x}, {y}) must not be negative")]
    InvalidOffset { x: i32, y: i32 },
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    MalformedFrame { expected: usize, actual: usize },
}

impl From<FrameError> for TrackingError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::UnsupportedChannels(c) => Self::UnsupportedChannels(c),
            FrameError::BufferMismatch { expected, actual } => {
                Self::MalformedFrame { expected, actual }
            }
        }
    }
}
