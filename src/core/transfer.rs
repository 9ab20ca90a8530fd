use super::error::{Error, Result};
use super::frame_source::{FrameSource, PixelView};
use super::surface::OffscreenSurface;

/// Copy the current frame of `source` into `target`, byte for byte
///
/// The buffer length is checked against the source's dimensions before
/// anything is written, so a failed transfer leaves `target` holding the
/// previous frame.
pub fn transfer<F: FrameSource + ?Sized>(source: &F, target: &mut OffscreenSurface) -> Result<()> {
    let view = PixelView::of(source)?;

    if view.dimensions() != target.dimensions() {
        return Err(Error::SurfaceMismatch {
            surface: target.dimensions(),
            source_dims: view.dimensions(),
        });
    }

    target.replace(view);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dimensions::FrameDimensions;

    /// Source whose buffer length is set independently of its dimensions
    struct FixedSource {
        dims: FrameDimensions,
        pixels: Vec<u8>,
    }

    impl FrameSource for FixedSource {
        fn dimensions(&self) -> FrameDimensions {
            self.dims
        }

        fn current_pixels(&self) -> &[u8] {
            &self.pixels
        }

        fn step_forward(&mut self) {}
        fn step_backward(&mut self) {}
        fn reset(&mut self) {}
        fn seek_end(&mut self) {}
    }

    fn dims(w: u32, h: u32) -> FrameDimensions {
        FrameDimensions::new(w, h).unwrap()
    }

    #[test]
    fn test_copies_every_byte_in_order() {
        let pixels: Vec<u8> = (0..64).map(|i| (i * 3) as u8).collect();
        let source = FixedSource { dims: dims(4, 4), pixels: pixels.clone() };
        let mut surface = OffscreenSurface::new(dims(4, 4)).unwrap();

        transfer(&source, &mut surface).unwrap();

        assert_eq!(surface.pixels(), pixels.as_slice());
    }

    #[test]
    fn test_short_buffer_leaves_surface_untouched() {
        let mut surface = OffscreenSurface::new(dims(10, 10)).unwrap();
        let good = FixedSource { dims: dims(10, 10), pixels: vec![9u8; 400] };
        transfer(&good, &mut surface).unwrap();

        let bad = FixedSource { dims: dims(10, 10), pixels: vec![1u8; 399] };
        let err = transfer(&bad, &mut surface).unwrap_err();

        assert!(matches!(err, Error::DimensionMismatch { expected: 400, actual: 399, .. }));
        assert!(surface.pixels().iter().all(|&b| b == 9));
    }

    #[test]
    fn test_surface_of_other_size_is_rejected() {
        let source = FixedSource { dims: dims(3, 3), pixels: vec![0u8; 36] };
        let mut surface = OffscreenSurface::new(dims(4, 4)).unwrap();

        assert_eq!(
            transfer(&source, &mut surface),
            Err(Error::SurfaceMismatch { surface: dims(4, 4), source_dims: dims(3, 3) })
        );
    }
}
