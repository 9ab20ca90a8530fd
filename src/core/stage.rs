use super::display::DisplayTarget;
use super::error::Result;
use super::frame_source::{FrameSource, Progress};
use super::surface::Presentation;

/// One mutation of the frame source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    StepForward,
    StepBackward,
    Reset,
    SeekEnd,
}

/// Frame source plus the surfaces it is presented on
///
/// Every motion is followed by a full transfer + redraw, so the display
/// always shows the source's current frame or, after an error, the last
/// frame that passed validation.
pub struct Stage<F: FrameSource, T: DisplayTarget> {
    source: F,
    presentation: Presentation<T>,
}

impl<F: FrameSource, T: DisplayTarget> Stage<F, T> {
    /// Off-screen surface is sized from the source once, here
    ///
    /// Fails if the source reports a zero-area or unaddressable size.
    pub fn new(source: F, target: T) -> Result<Self> {
        let presentation = Presentation::new(source.dimensions(), target)?;
        Ok(Self {
            source,
            presentation,
        })
    }

    /// Mutate the source, then transfer and redraw
    pub fn apply(&mut self, motion: Motion) -> Result<()> {
        match motion {
            Motion::StepForward => self.source.step_forward(),
            Motion::StepBackward => self.source.step_backward(),
            Motion::Reset => self.source.reset(),
            Motion::SeekEnd => self.source.seek_end(),
        }
        self.redraw()
    }

    /// Transfer the current frame and present it
    pub fn redraw(&mut self) -> Result<()> {
        self.presentation.redraw(&self.source)
    }

    /// Present the last good frame again at the current display size
    pub fn refresh(&mut self) -> Result<()> {
        self.presentation.refresh()
    }

    pub fn progress(&self) -> Option<Progress> {
        self.source.progress()
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    pub fn presentation(&self) -> &Presentation<T> {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut Presentation<T> {
        &mut self.presentation
    }
}
