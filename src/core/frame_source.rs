use super::dimensions::FrameDimensions;
use super::error::{Error, Result};

/// Position of the current frame within the animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Index of the current step (0 = first frame)
    pub index: usize,
    /// Index of the last step
    pub last: usize,
}

/// Stateful producer of animation frames
///
/// The engine behind a source decides what each frame looks like and what
/// happens at the ends of the sequence (clamp or wrap). Playback only ever
/// asks it to move and reads back the current buffer.
pub trait FrameSource {
    /// Logical frame size, constant for the lifetime of the source
    fn dimensions(&self) -> FrameDimensions;

    /// RGBA8888 bytes of the current frame, row-major, top row first
    fn current_pixels(&self) -> &[u8];

    /// Advance by one step
    fn step_forward(&mut self);

    /// Go back by one step
    fn step_backward(&mut self);

    /// Return to the first frame
    fn reset(&mut self);

    /// Jump to the last frame
    fn seek_end(&mut self);

    /// Current step for status display, if the source tracks one
    fn progress(&self) -> Option<Progress> {
        None
    }
}

impl<F: FrameSource + ?Sized> FrameSource for Box<F> {
    fn dimensions(&self) -> FrameDimensions {
        (**self).dimensions()
    }

    fn current_pixels(&self) -> &[u8] {
        (**self).current_pixels()
    }

    fn step_forward(&mut self) {
        (**self).step_forward()
    }

    fn step_backward(&mut self) {
        (**self).step_backward()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn seek_end(&mut self) {
        (**self).seek_end()
    }

    fn progress(&self) -> Option<Progress> {
        (**self).progress()
    }
}

/// Read-only view of a frame buffer whose length matches its dimensions
#[derive(Debug, Clone, Copy)]
pub struct PixelView<'a> {
    dimensions: FrameDimensions,
    bytes: &'a [u8],
}

impl<'a> PixelView<'a> {
    /// Wrap `bytes`, failing unless it holds exactly `width * height * 4` bytes
    ///
    /// Zero-area and unaddressable dimensions are rejected before the length
    /// is compared.
    pub fn checked(dimensions: FrameDimensions, bytes: &'a [u8]) -> Result<Self> {
        let expected = dimensions.frame_buffer_size()?;
        if bytes.len() != expected {
            return Err(Error::DimensionMismatch {
                width: dimensions.width,
                height: dimensions.height,
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self { dimensions, bytes })
    }

    /// Borrow the current frame of `source`
    pub fn of<F: FrameSource + ?Sized>(source: &'a F) -> Result<Self> {
        Self::checked(source.dimensions(), source.current_pixels())
    }

    pub fn dimensions(&self) -> FrameDimensions {
        self.dimensions
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_accepts_exact_length() {
        let dims = FrameDimensions::new(2, 3).unwrap();
        let bytes = vec![7u8; 24];
        let view = PixelView::checked(dims, &bytes).unwrap();
        assert_eq!(view.bytes().len(), 24);
        assert_eq!(view.dimensions(), dims);
    }

    #[test]
    fn test_checked_rejects_short_and_long_buffers() {
        let dims = FrameDimensions::new(10, 10).unwrap();

        let short = vec![0u8; 399];
        assert_eq!(
            PixelView::checked(dims, &short).unwrap_err(),
            Error::DimensionMismatch {
                width: 10,
                height: 10,
                expected: 400,
                actual: 399,
            }
        );

        let long = vec![0u8; 401];
        assert!(PixelView::checked(dims, &long).is_err());
    }

    #[test]
    fn test_checked_rejects_empty_frame_with_empty_buffer() {
        assert_eq!(
            PixelView::checked(FrameDimensions::display(0, 5), &[]).unwrap_err(),
            Error::ZeroDimensions { width: 0, height: 5 }
        );
    }

    #[test]
    fn test_checked_rejects_unaddressable_frame() {
        let huge = FrameDimensions::display(u32::MAX, u32::MAX);
        assert_eq!(
            PixelView::checked(huge, &[0; 16]).unwrap_err(),
            Error::Oversized { width: u32::MAX, height: u32::MAX }
        );
    }
}
