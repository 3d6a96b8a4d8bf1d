use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Pixel, Rgb, RgbImage, Rgba};
use ndarray::{Array2, ArrayView3};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("frames with {0} channels are not supported")]
    UnsupportedChannels(u8),
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    BufferMismatch { expected: usize, actual: usize },
}

/// A single image handed to a tracker: contiguous bytes in row-major order.
///
/// Pixel format is interleaved 8-bit channels (1 = gray, 3 = RGB, 4 = RGBA).
/// A frame with zero width or height is valid and reports `is_empty()`.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A zero-sized RGB frame.
    pub fn empty(index: usize) -> Self {
        Self::new(Vec::new(), 0, 0, 3, index)
    }

    pub fn from_rgb_image(img: RgbImage, index: usize) -> Self {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, 3, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Intensity plane as `(height, width)` floats in `[0, 255]`.
    ///
    /// Color frames use Rec. 601 luma weights; alpha is ignored.
    pub fn to_luma(&self) -> Result<Array2<f32>, FrameError> {
        let view = ArrayView3::from_shape(self.shape(), &self.data).map_err(|_| {
            FrameError::BufferMismatch {
                expected: self.shape_len(),
                actual: self.data.len(),
            }
        })?;
        let (h, w) = (self.height as usize, self.width as usize);
        match self.channels {
            1 => Ok(Array2::from_shape_fn((h, w), |(y, x)| view[[y, x, 0]] as f32)),
            3 | 4 => Ok(Array2::from_shape_fn((h, w), |(y, x)| {
                0.299 * view[[y, x, 0]] as f32
                    + 0.587 * view[[y, x, 1]] as f32
                    + 0.114 * view[[y, x, 2]] as f32
            })),
            c => Err(FrameError::UnsupportedChannels(c)),
        }
    }

    /// Copies the window `[x, x + width) x [y, y + height)`, clamped to the frame.
    ///
    /// A window entirely outside the frame yields an empty frame.
    pub fn crop(&self, x: i64, y: i64, width: u32, height: u32) -> Frame {
        let x0 = x.clamp(0, self.width as i64) as usize;
        let y0 = y.clamp(0, self.height as i64) as usize;
        let x1 = (x + width as i64).clamp(0, self.width as i64) as usize;
        let y1 = (y + height as i64).clamp(0, self.height as i64) as usize;
        let (cw, ch) = (x1.saturating_sub(x0), y1.saturating_sub(y0));
        if cw == 0 || ch == 0 {
            return Frame::new(Vec::new(), 0, 0, self.channels, self.index);
        }

        let c = self.channels as usize;
        let stride = self.width as usize * c;
        let mut data = Vec::with_capacity(cw * ch * c);
        for row in y0..y1 {
            let start = row * stride + x0 * c;
            data.extend_from_slice(&self.data[start..start + cw * c]);
        }
        Frame::new(data, cw as u32, ch as u32, self.channels, self.index)
    }

    /// Resamples to `width x height` with a triangle filter.
    pub fn resize(&self, width: u32, height: u32) -> Result<Frame, FrameError> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        if self.is_empty() || width == 0 || height == 0 {
            return Ok(Frame::new(Vec::new(), 0, 0, self.channels, self.index));
        }
        let data = match self.channels {
            1 => resize_buffer::<Luma<u8>>(self, width, height),
            3 => resize_buffer::<Rgb<u8>>(self, width, height),
            4 => resize_buffer::<Rgba<u8>>(self, width, height),
            c => return Err(FrameError::UnsupportedChannels(c)),
        }
        .ok_or(FrameError::BufferMismatch {
            expected: self.shape_len(),
            actual: self.data.len(),
        })?;
        Ok(Frame::new(data, width, height, self.channels, self.index))
    }

    fn shape_len(&self) -> usize {
        let (h, w, c) = self.shape();
        h * w * c
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

fn resize_buffer<P>(frame: &Frame, width: u32, height: u32) -> Option<Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let img: ImageBuffer<P, Vec<u8>> =
        ImageBuffer::from_raw(frame.width(), frame.height(), frame.data().to_vec())?;
    Some(imageops::resize(&img, width, height, FilterType::Triangle).into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Frame whose pixel at (x, y) has every channel set to `x + 10 * y`.
    fn indexed_frame(width: u32, height: u32, channels: u8) -> Frame {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                for _ in 0..channels {
                    data.push((x + 10 * y) as u8);
                }
            }
        }
        Frame::new(data, width, height, channels, 7)
    }

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 3, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
        assert!(!frame.is_empty());
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        let data = vec![0u8; 10]; // wrong size for 2x2x3
        Frame::new(data, 2, 2, 3, 0);
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::empty(3);
        assert!(frame.is_empty());
        assert_eq!(frame.index(), 3);
        assert!(frame.to_luma().unwrap().is_empty());
    }

    #[test]
    fn test_from_rgb_image() {
        let mut img = RgbImage::new(4, 2);
        img.put_pixel(3, 1, Rgb([1, 2, 3]));
        let frame = Frame::from_rgb_image(img, 9);
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 9);
        assert_eq!(frame.as_ndarray()[[1, 3, 2]], 3);
    }

    #[test]
    fn test_as_ndarray_shape() {
        let frame = Frame::new(vec![0u8; 24], 4, 2, 3, 0);
        assert_eq!(frame.as_ndarray().shape(), &[2, 4, 3]);
    }

    #[test]
    fn test_to_luma_gray_passthrough() {
        let frame = indexed_frame(3, 2, 1);
        let luma = frame.to_luma().unwrap();
        assert_eq!(luma.shape(), &[2, 3]);
        assert_relative_eq!(luma[[1, 2]], 12.0);
    }

    #[test]
    fn test_to_luma_rgb_weights() {
        let frame = Frame::new(vec![255, 0, 0, 0, 255, 0, 0, 0, 255], 3, 1, 3, 0);
        let luma = frame.to_luma().unwrap();
        assert_relative_eq!(luma[[0, 0]], 0.299 * 255.0, epsilon = 1e-3);
        assert_relative_eq!(luma[[0, 1]], 0.587 * 255.0, epsilon = 1e-3);
        assert_relative_eq!(luma[[0, 2]], 0.114 * 255.0, epsilon = 1e-3);
    }

    #[test]
    fn test_to_luma_rejects_two_channels() {
        let frame = Frame::new(vec![0u8; 8], 2, 2, 2, 0);
        assert_eq!(frame.to_luma(), Err(FrameError::UnsupportedChannels(2)));
    }

    #[test]
    fn test_crop_inside() {
        let frame = indexed_frame(10, 10, 1);
        let crop = frame.crop(2, 3, 4, 2);
        assert_eq!((crop.width(), crop.height()), (4, 2));
        assert_eq!(crop.index(), 7);
        assert_eq!(crop.data(), &[32, 33, 34, 35, 42, 43, 44, 45]);
    }

    #[test]
    fn test_crop_clamps_to_frame() {
        let frame = indexed_frame(10, 10, 3);
        let crop = frame.crop(-2, 8, 5, 5);
        assert_eq!((crop.width(), crop.height()), (3, 2));
        assert_eq!(crop.as_ndarray()[[0, 0, 0]], 80);
    }

    #[test]
    fn test_crop_outside_is_empty() {
        let frame = indexed_frame(10, 10, 3);
        assert!(frame.crop(20, 20, 5, 5).is_empty());
        assert!(frame.crop(-10, 0, 5, 5).is_empty());
    }

    #[test]
    fn test_resize_changes_dimensions() {
        let frame = indexed_frame(8, 6, 3);
        let small = frame.resize(4, 3).unwrap();
        assert_eq!((small.width(), small.height(), small.channels()), (4, 3, 3));
        assert_eq!(small.data().len(), 4 * 3 * 3);
        assert_eq!(small.index(), 7);
    }

    #[test]
    fn test_resize_same_size_is_identity() {
        let frame = indexed_frame(5, 5, 1);
        assert_eq!(frame.resize(5, 5).unwrap().data(), frame.data());
    }

    #[test]
    fn test_resize_uniform_frame_stays_uniform() {
        let frame = Frame::new(vec![90u8; 16 * 16 * 4], 16, 16, 4, 0);
        let small = frame.resize(5, 7).unwrap();
        assert!(small.data().iter().all(|&v| v == 90));
    }

    #[test]
    fn test_resize_empty_frame() {
        assert!(Frame::empty(0).resize(4, 4).unwrap().is_empty());
    }

    #[test]
    fn test_resize_rejects_unsupported_channels() {
        let frame = Frame::new(vec![0u8; 8], 2, 2, 2, 0);
        assert_eq!(frame.resize(1, 1).unwrap_err(), FrameError::UnsupportedChannels(2));
    }

    #[test]
    fn test_resize_reports_short_buffer() {
        // Bypasses `new` so the length check does not fire first.
        let frame = Frame {
            data: vec![0u8; 5],
            width: 4,
            height: 4,
            channels: 1,
            index: 0,
        };
        let expected = FrameError::BufferMismatch {
            expected: 16,
            actual: 5,
        };
        assert_eq!(frame.resize(2, 2).unwrap_err(), expected);
        assert_eq!(frame.to_luma().unwrap_err(), expected);
    }
}
