use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// Bytes per RGBA8888 pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Pixel grid size - logical frame size or on-screen display size
///
/// Defaults to an empty 0x0 display size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameDimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl FrameDimensions {
    /// Create dimensions, rejecting a zero width or height
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::ZeroDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Display sizes may legitimately collapse to zero (minimised window)
    pub fn display(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Total size in bytes for RGBA buffer, saturating on overflow
    pub fn buffer_size(&self) -> usize {
        self.pixel_count().saturating_mul(BYTES_PER_PIXEL)
    }

    /// Buffer size, or `None` if it overflows `usize`
    pub fn checked_buffer_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(BYTES_PER_PIXEL)
    }

    /// Buffer size of a real frame: non-zero and addressable
    ///
    /// Use this instead of [`FrameDimensions::buffer_size`] for sizes that
    /// come from outside, such as a frame source.
    pub fn frame_buffer_size(&self) -> Result<usize> {
        if self.is_empty() {
            return Err(Error::ZeroDimensions {
                width: self.width,
                height: self.height,
            });
        }
        self.checked_buffer_size().ok_or(Error::Oversized {
            width: self.width,
            height: self.height,
        })
    }

    /// Bytes in one row of an RGBA buffer
    pub fn row_stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for FrameDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
