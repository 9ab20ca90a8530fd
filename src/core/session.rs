use std::time::Duration;

use log::{debug, error};

use super::command::Command;
use super::controller::{PlaybackController, PlaybackRate, PlaybackState};
use super::display::DisplayTarget;
use super::error::{Error, Result};
use super::frame_source::{FrameSource, Progress};
use super::stage::Stage;
use super::timer::{ClockScheduler, Scheduler};

/// One animation on one display, with its playback controller
///
/// This is the object a control surface is wired to: commands go in through
/// [`Session::dispatch`], time goes in through [`Session::advance`].
pub struct Session<F: FrameSource, T: DisplayTarget, S: Scheduler = ClockScheduler> {
    controller: PlaybackController<S>,
    stage: Stage<F, T>,
}

impl<F: FrameSource, T: DisplayTarget, S: Scheduler> Session<F, T, S> {
    /// Build an idle session; call [`Session::redraw`] to show the first frame
    pub fn new(source: F, target: T, scheduler: S, rate: PlaybackRate) -> Result<Self> {
        Ok(Self {
            controller: PlaybackController::new(scheduler, rate),
            stage: Stage::new(source, target)?,
        })
    }

    /// Run a control-surface command
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        debug!("command: {}", command);
        let stage = &mut self.stage;
        let controller = &mut self.controller;

        let result = match command {
            Command::PlayForward => controller.play_forward(stage),
            Command::PlayReverse => controller.play_reverse(stage),
            Command::Pause => {
                controller.pause();
                Ok(())
            }
            Command::Reset => controller.reset(stage),
            Command::SeekEnd => controller.seek_end(stage),
            Command::StepForward => controller.step_forward_once(stage),
            Command::StepBackward => controller.step_backward_once(stage),
            Command::SetRate(ms) => controller.set_rate(ms, stage),
        };

        match &result {
            // already reported by the controller
            Err(Error::InvalidRate(_)) => {}
            Err(err) => error!("{} failed: {}", command, err),
            Ok(()) => {}
        }
        result
    }

    /// Feed elapsed host time to the playback timer
    pub fn advance(&mut self, delta: Duration) -> Result<usize> {
        self.controller.advance(delta, &mut self.stage)
    }

    /// Transfer and present the current frame without moving the source
    ///
    /// A failed redraw stops automatic playback.
    pub fn redraw(&mut self) -> Result<()> {
        let result = self.stage.redraw();
        self.halt_on_error("redraw", result)
    }

    /// Re-present the last good frame at the display's current size
    ///
    /// Fails and pauses like [`Session::redraw`].
    pub fn refresh(&mut self) -> Result<()> {
        let result = self.stage.refresh();
        self.halt_on_error("refresh", result)
    }

    fn halt_on_error(&mut self, what: &str, result: Result<()>) -> Result<()> {
        result.inspect_err(|err| {
            self.controller.pause();
            error!("{} failed: {}", what, err);
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn rate(&self) -> PlaybackRate {
        self.controller.rate()
    }

    pub fn progress(&self) -> Option<Progress> {
        self.stage.progress()
    }

    /// Time until the next automatic step, if playing
    pub fn next_due(&self) -> Option<Duration> {
        self.controller.next_due()
    }

    pub fn controller(&self) -> &PlaybackController<S> {
        &self.controller
    }

    pub fn stage(&self) -> &Stage<F, T> {
        &self.stage
    }

    pub fn source(&self) -> &F {
        self.stage.source()
    }

    pub fn target(&self) -> &T {
        self.stage.presentation().target()
    }

    pub fn target_mut(&mut self) -> &mut T {
        self.stage.presentation_mut().target_mut()
    }
}
