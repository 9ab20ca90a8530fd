use log::trace;

use super::dimensions::{FrameDimensions, BYTES_PER_PIXEL};
use super::display::DisplayTarget;
use super::error::{Error, Result};
use super::frame_source::{FrameSource, PixelView};
use super::transfer::transfer;

/// Frame-sized pixel buffer, written only by [`transfer`]
///
/// Allocated once per session and overwritten in place for every frame.
#[derive(Debug, Clone)]
pub struct OffscreenSurface {
    dimensions: FrameDimensions,
    pixels: Vec<u8>,
}

impl OffscreenSurface {
    /// Transparent black surface of the given logical size
    ///
    /// Fails for zero-area or unaddressable sizes.
    pub fn new(dimensions: FrameDimensions) -> Result<Self> {
        let len = dimensions.frame_buffer_size()?;
        Ok(Self {
            dimensions,
            pixels: vec![0; len],
        })
    }

    pub fn dimensions(&self) -> FrameDimensions {
        self.dimensions
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Whole-buffer replace; caller guarantees matching dimensions
    pub(crate) fn replace(&mut self, view: PixelView<'_>) {
        debug_assert_eq!(view.dimensions(), self.dimensions);
        self.pixels.copy_from_slice(view.bytes());
    }
}

/// Display-sized pixel buffer filled by nearest-neighbour scaling
#[derive(Debug, Clone, Default)]
pub struct OnscreenSurface {
    size: FrameDimensions,
    pixels: Vec<u8>,
    /// Source byte offset of every destination column, cached per size pair
    columns: Vec<usize>,
    columns_for: Option<(u32, u32)>,
}

impl OnscreenSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> FrameDimensions {
        self.size
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Scale `source` to fill `size` without interpolation
    ///
    /// Every destination pixel copies exactly one source pixel, so small
    /// logical grids stay as crisp blocks. Buffers are reused while the
    /// display size stays the same.
    pub fn blit_scaled(&mut self, source: &OffscreenSurface, size: FrameDimensions) {
        if self.size != size {
            self.size = size;
            self.pixels.resize(size.buffer_size(), 0);
        }
        if size.is_empty() {
            return;
        }

        let src = source.dimensions();
        if self.columns_for != Some((src.width, size.width)) {
            self.columns.clear();
            self.columns.extend((0..size.width as u64).map(|dx| {
                let sx = dx * src.width as u64 / size.width as u64;
                sx as usize * BYTES_PER_PIXEL
            }));
            self.columns_for = Some((src.width, size.width));
        }

        let src_stride = src.row_stride();
        let dst_stride = size.row_stride();
        let mut previous_row: Option<usize> = None;

        for dy in 0..size.height as usize {
            let sy = (dy as u64 * src.height as u64 / size.height as u64) as usize;
            let dst_start = dy * dst_stride;

            // Vertical upscaling repeats source rows; copy the finished row
            if previous_row == Some(sy) {
                let prev_start = dst_start - dst_stride;
                self.pixels.copy_within(prev_start..dst_start, dst_start);
                continue;
            }

            let src_row = &source.pixels()[sy * src_stride..(sy + 1) * src_stride];
            let dst_row = &mut self.pixels[dst_start..dst_start + dst_stride];
            for (dst_px, &offset) in dst_row
                .chunks_exact_mut(BYTES_PER_PIXEL)
                .zip(self.columns.iter())
            {
                dst_px.copy_from_slice(&src_row[offset..offset + BYTES_PER_PIXEL]);
            }
            previous_row = Some(sy);
        }
    }
}

/// Off-screen frame buffer + on-screen scaled copy + the host's display
pub struct Presentation<T: DisplayTarget> {
    offscreen: OffscreenSurface,
    onscreen: OnscreenSurface,
    target: T,
}

impl<T: DisplayTarget> Presentation<T> {
    /// Allocate surfaces for frames of `frame` size shown on `target`
    pub fn new(frame: FrameDimensions, target: T) -> Result<Self> {
        Ok(Self {
            offscreen: OffscreenSurface::new(frame)?,
            onscreen: OnscreenSurface::new(),
            target,
        })
    }

    /// Transfer the current frame, scale it to the display and commit it
    ///
    /// On error nothing downstream of the failing step is touched: a bad
    /// source buffer leaves both surfaces and the display on the old frame.
    pub fn redraw<F: FrameSource + ?Sized>(&mut self, source: &F) -> Result<()> {
        transfer(source, &mut self.offscreen)?;
        self.refresh()
    }

    /// Re-scale the last transferred frame, e.g. after a window resize
    pub fn refresh(&mut self) -> Result<()> {
        let size = self.target.size();
        if size.is_empty() {
            trace!("display has no area, skipping present");
            return Ok(());
        }
        if size.checked_buffer_size().is_none() {
            return Err(Error::Oversized {
                width: size.width,
                height: size.height,
            });
        }
        self.onscreen.blit_scaled(&self.offscreen, size);
        self.target.present(self.onscreen.pixels(), size)
    }

    pub fn offscreen(&self) -> &OffscreenSurface {
        &self.offscreen
    }

    pub fn onscreen(&self) -> &OnscreenSurface {
        &self.onscreen
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }
}
