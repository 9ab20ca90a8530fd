use super::dimensions::FrameDimensions;
use super::error::Result;

/// On-screen drawable provided by the host (window surface, test buffer, ...)
pub trait DisplayTarget {
    /// Current drawable size in physical pixels; may change between redraws
    fn size(&self) -> FrameDimensions;

    /// Replace the whole visible frame with `pixels` (RGBA, `size` sized)
    fn present(&mut self, pixels: &[u8], size: FrameDimensions) -> Result<()>;
}

impl<T: DisplayTarget + ?Sized> DisplayTarget for Box<T> {
    fn size(&self) -> FrameDimensions {
        (**self).size()
    }

    fn present(&mut self, pixels: &[u8], size: FrameDimensions) -> Result<()> {
        (**self).present(pixels, size)
    }
}

/// In-memory display target - keeps the last presented frame
///
/// Useful headless and in tests, where the "screen" is just a buffer.
#[derive(Debug, Clone)]
pub struct MemoryTarget {
    size: FrameDimensions,
    pixels: Vec<u8>,
    presents: usize,
}

impl MemoryTarget {
    pub fn new(width: u32, height: u32) -> Self {
        let size = FrameDimensions::display(width, height);
        Self {
            size,
            pixels: vec![0; size.buffer_size()],
            presents: 0,
        }
    }

    /// Simulate a window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = FrameDimensions::display(width, height);
    }

    /// Last presented frame
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA of one displayed pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let idx = (y as usize * self.size.width as usize + x as usize) * 4;
        self.pixels
            .get(idx..idx + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Number of full-frame commits so far
    pub fn present_count(&self) -> usize {
        self.presents
    }
}

impl DisplayTarget for MemoryTarget {
    fn size(&self) -> FrameDimensions {
        self.size
    }

    fn present(&mut self, pixels: &[u8], size: FrameDimensions) -> Result<()> {
        self.pixels.clear();
        self.pixels.extend_from_slice(pixels);
        self.size = size;
        self.presents += 1;
        Ok(())
    }
}
