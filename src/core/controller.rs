use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use log::{debug, error, trace, warn};

use super::display::DisplayTarget;
use super::error::{Error, Result};
use super::frame_source::FrameSource;
use super::stage::{Motion, Stage};
use super::timer::{Scheduler, TimerHandle};

/// Default milliseconds between automatic steps
pub const DEFAULT_RATE_MS: u32 = 1000;

/// Playback direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    fn motion(self) -> Motion {
        match self {
            Direction::Forward => Motion::StepForward,
            Direction::Reverse => Motion::StepBackward,
        }
    }
}

/// Observable controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    PlayingForward,
    PlayingReverse,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::PlayingForward => "playing forward",
            PlaybackState::PlayingReverse => "playing reverse",
        };
        f.write_str(label)
    }
}

/// Milliseconds between automatic steps, always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackRate(NonZeroU32);

impl PlaybackRate {
    /// Validate a raw millisecond value from an input control
    pub fn from_millis(ms: i64) -> Result<Self> {
        u32::try_from(ms)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(Error::InvalidRate(ms))
    }

    pub fn millis(&self) -> u32 {
        self.0.get()
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(u64::from(self.0.get()))
    }
}

impl Default for PlaybackRate {
    fn default() -> Self {
        Self(NonZeroU32::new(DEFAULT_RATE_MS).unwrap_or(NonZeroU32::MIN))
    }
}

/// Live timer, stored only while playing so state and timer cannot diverge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cadence {
    Stopped,
    Running {
        direction: Direction,
        handle: TimerHandle,
    },
}

/// Play/pause/direction/rate state machine
///
/// Owns the only repeating timer. Any operation that starts a cadence
/// cancels the previous one first, and ticks from a cancelled handle are
/// ignored, so at most one cadence drives the frame source at a time.
pub struct PlaybackController<S: Scheduler> {
    scheduler: S,
    cadence: Cadence,
    rate: PlaybackRate,
}

impl<S: Scheduler> PlaybackController<S> {
    /// Create an idle controller
    pub fn new(scheduler: S, rate: PlaybackRate) -> Self {
        Self {
            scheduler,
            cadence: Cadence::Stopped,
            rate,
        }
    }

    pub fn state(&self) -> PlaybackState {
        match self.cadence {
            Cadence::Stopped => PlaybackState::Idle,
            Cadence::Running { direction: Direction::Forward, .. } => PlaybackState::PlayingForward,
            Cadence::Running { direction: Direction::Reverse, .. } => PlaybackState::PlayingReverse,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self.cadence {
            Cadence::Stopped => None,
            Cadence::Running { direction, .. } => Some(direction),
        }
    }

    pub fn rate(&self) -> PlaybackRate {
        self.rate
    }

    /// Handle of the running timer, if playing
    pub fn live_timer(&self) -> Option<TimerHandle> {
        match self.cadence {
            Cadence::Stopped => None,
            Cadence::Running { handle, .. } => Some(handle),
        }
    }

    /// Time until the next automatic step
    pub fn next_due(&self) -> Option<Duration> {
        self.live_timer().and_then(|_| self.scheduler.next_due())
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Step forward once; stops any automatic playback
    pub fn step_forward_once<F: FrameSource, T: DisplayTarget>(
        &mut self,
        stage: &mut Stage<F, T>,
    ) -> Result<()> {
        self.halt();
        stage.apply(Motion::StepForward)
    }

    /// Step backward once; stops any automatic playback
    pub fn step_backward_once<F: FrameSource, T: DisplayTarget>(
        &mut self,
        stage: &mut Stage<F, T>,
    ) -> Result<()> {
        self.halt();
        stage.apply(Motion::StepBackward)
    }

    /// Step forward now, then every rate interval
    ///
    /// Calling this while already playing forward restarts the cadence.
    pub fn play_forward<F: FrameSource, T: DisplayTarget>(
        &mut self,
        stage: &mut Stage<F, T>,
    ) -> Result<()> {
        self.play(Direction::Forward, stage)
    }

    /// Step backward now, then every rate interval
    pub fn play_reverse<F: FrameSource, T: DisplayTarget>(
        &mut self,
        stage: &mut Stage<F, T>,
    ) -> Result<()> {
        self.play(Direction::Reverse, stage)
    }

    /// Stop automatic playback; no-op when idle
    pub fn pause(&mut self) {
        self.halt();
    }

    /// Pause and return to the first frame
    pub fn reset<F: FrameSource, T: DisplayTarget>(&mut self, stage: &mut Stage<F, T>) -> Result<()> {
        self.halt();
        stage.apply(Motion::Reset)
    }

    /// Pause and jump to the last frame
    pub fn seek_end<F: FrameSource, T: DisplayTarget>(
        &mut self,
        stage: &mut Stage<F, T>,
    ) -> Result<()> {
        self.halt();
        stage.apply(Motion::SeekEnd)
    }

    /// Change the step interval
    ///
    /// Non-positive values are rejected with no change at all. While playing,
    /// the current direction is replayed so the new interval applies at once.
    pub fn set_rate<F: FrameSource, T: DisplayTarget>(
        &mut self,
        ms: i64,
        stage: &mut Stage<F, T>,
    ) -> Result<()> {
        let rate = PlaybackRate::from_millis(ms).inspect_err(|_| {
            warn!("rejecting playback rate of {} ms", ms);
        })?;
        self.rate = rate;
        debug!("playback rate set to {} ms", rate.millis());

        match self.direction() {
            Some(direction) => self.play(direction, stage),
            None => Ok(()),
        }
    }

    /// Run one tick of `handle`; stale handles are ignored
    pub fn on_tick<F: FrameSource, T: DisplayTarget>(
        &mut self,
        handle: TimerHandle,
        stage: &mut Stage<F, T>,
    ) -> Result<bool> {
        let direction = match self.cadence {
            Cadence::Running { direction, handle: live } if live == handle => direction,
            _ => {
                trace!("dropping tick from stale timer {}", handle.id());
                return Ok(false);
            }
        };

        trace!("tick {} ({:?})", handle.id(), direction);
        if let Err(err) = stage.apply(direction.motion()) {
            self.halt();
            error!("stopping playback: {}", err);
            return Err(err);
        }
        Ok(true)
    }

    /// Move time forward and run every tick that fell due
    ///
    /// Returns the number of steps taken. A failing tick stops playback and
    /// discards the ticks still queued behind it.
    pub fn advance<F: FrameSource, T: DisplayTarget>(
        &mut self,
        delta: Duration,
        stage: &mut Stage<F, T>,
    ) -> Result<usize> {
        let due = self.scheduler.advance(delta);
        let mut steps = 0;
        for handle in due {
            if self.on_tick(handle, stage)? {
                steps += 1;
            }
        }
        Ok(steps)
    }

    fn play<F: FrameSource, T: DisplayTarget>(
        &mut self,
        direction: Direction,
        stage: &mut Stage<F, T>,
    ) -> Result<()> {
        self.halt();
        stage.apply(direction.motion())?;

        let handle = self.scheduler.start(self.rate.period());
        self.cadence = Cadence::Running { direction, handle };
        debug!(
            "{} every {} ms (timer {})",
            self.state(),
            self.rate.millis(),
            handle.id()
        );
        Ok(())
    }

    /// Cancel the live timer, if any; always leaves the controller idle
    fn halt(&mut self) {
        if let Cadence::Running { handle, .. } = std::mem::replace(&mut self.cadence, Cadence::Stopped) {
            self.scheduler.cancel(handle);
            debug!("cancelled timer {}", handle.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dimensions::FrameDimensions;
    use crate::core::display::MemoryTarget;
    use crate::core::timer::ClockScheduler;

    /// Frame N is a 1x1 pixel filled with N; counts every step call
    struct CounterSource {
        frame: u8,
        pixels: [u8; 4],
        forward_calls: usize,
        backward_calls: usize,
    }

    impl CounterSource {
        fn new() -> Self {
            Self { frame: 0, pixels: [0; 4], forward_calls: 0, backward_calls: 0 }
        }

        fn sync(&mut self) {
            self.pixels = [self.frame; 4];
        }
    }

    impl FrameSource for CounterSource {
        fn dimensions(&self) -> FrameDimensions {
            FrameDimensions::display(1, 1)
        }

        fn current_pixels(&self) -> &[u8] {
            &self.pixels
        }

        fn step_forward(&mut self) {
            self.forward_calls += 1;
            self.frame = self.frame.saturating_add(1);
            self.sync();
        }

        fn step_backward(&mut self) {
            self.backward_calls += 1;
            self.frame = self.frame.saturating_sub(1);
            self.sync();
        }

        fn reset(&mut self) {
            self.frame = 0;
            self.sync();
        }

        fn seek_end(&mut self) {
            self.frame = 200;
            self.sync();
        }
    }

    fn setup(rate_ms: i64) -> (PlaybackController<ClockScheduler>, Stage<CounterSource, MemoryTarget>) {
        let controller = PlaybackController::new(
            ClockScheduler::new(),
            PlaybackRate::from_millis(rate_ms).unwrap(),
        );
        let stage = Stage::new(CounterSource::new(), MemoryTarget::new(2, 2)).unwrap();
        (controller, stage)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_rate_rejects_non_positive() {
        assert_eq!(PlaybackRate::from_millis(0), Err(Error::InvalidRate(0)));
        assert_eq!(PlaybackRate::from_millis(-1), Err(Error::InvalidRate(-1)));
        assert_eq!(PlaybackRate::from_millis(150).unwrap().millis(), 150);
        assert_eq!(PlaybackRate::default().millis(), DEFAULT_RATE_MS);
    }

    #[test]
    fn test_rate_rejects_values_beyond_u32() {
        let huge = i64::from(u32::MAX) + 1;
        assert_eq!(PlaybackRate::from_millis(huge), Err(Error::InvalidRate(huge)));
    }

    #[test]
    fn test_play_forward_steps_immediately_then_on_ticks() {
        let (mut controller, mut stage) = setup(150);

        controller.play_forward(&mut stage).unwrap();
        assert_eq!(controller.state(), PlaybackState::PlayingForward);
        assert_eq!(stage.source().forward_calls, 1);

        assert_eq!(controller.advance(ms(149), &mut stage).unwrap(), 0);
        assert_eq!(controller.advance(ms(1), &mut stage).unwrap(), 1);
        assert_eq!(stage.source().forward_calls, 2);
    }

    #[test]
    fn test_play_twice_keeps_single_timer() {
        let (mut controller, mut stage) = setup(100);

        controller.play_forward(&mut stage).unwrap();
        let first = controller.live_timer();
        controller.play_forward(&mut stage).unwrap();

        assert_ne!(controller.live_timer(), first);
        assert_eq!(controller.scheduler().live_count(), 1);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let (mut controller, mut stage) = setup(100);

        controller.pause();
        assert_eq!(controller.state(), PlaybackState::Idle);

        controller.play_reverse(&mut stage).unwrap();
        controller.pause();
        controller.pause();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(controller.live_timer(), None);
        assert_eq!(controller.scheduler().live_count(), 0);
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let (mut controller, mut stage) = setup(100);

        controller.play_forward(&mut stage).unwrap();
        let old = controller.live_timer().unwrap();
        controller.pause();

        assert!(!controller.on_tick(old, &mut stage).unwrap());
        assert_eq!(stage.source().forward_calls, 1);
    }

    #[test]
    fn test_set_rate_while_idle_starts_nothing() {
        let (mut controller, mut stage) = setup(100);

        controller.set_rate(40, &mut stage).unwrap();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(controller.scheduler().live_count(), 0);
        assert_eq!(stage.source().forward_calls, 0);
        assert_eq!(controller.rate().millis(), 40);
    }

    #[test]
    fn test_set_rate_while_playing_keeps_direction() {
        let (mut controller, mut stage) = setup(1000);

        controller.play_reverse(&mut stage).unwrap();
        controller.set_rate(20, &mut stage).unwrap();

        assert_eq!(controller.state(), PlaybackState::PlayingReverse);
        assert_eq!(stage.source().backward_calls, 2);
        assert_eq!(controller.advance(ms(20), &mut stage).unwrap(), 1);
    }

    #[test]
    fn test_invalid_rate_changes_nothing() {
        let (mut controller, mut stage) = setup(100);
        controller.play_forward(&mut stage).unwrap();
        let timer = controller.live_timer();

        assert_eq!(controller.set_rate(0, &mut stage), Err(Error::InvalidRate(0)));
        assert_eq!(controller.rate().millis(), 100);
        assert_eq!(controller.live_timer(), timer);
        assert_eq!(stage.source().forward_calls, 1);
    }

    #[test]
    fn test_seek_end_then_reset() {
        let (mut controller, mut stage) = setup(100);

        controller.seek_end(&mut stage).unwrap();
        assert_eq!(stage.presentation().offscreen().pixels(), &[200; 4]);

        controller.play_forward(&mut stage).unwrap();
        controller.reset(&mut stage).unwrap();
        assert_eq!(controller.state(), PlaybackState::Idle);
        assert_eq!(stage.presentation().offscreen().pixels(), &[0; 4]);
    }
}
