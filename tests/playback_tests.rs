use std::time::Duration;

use frame_scrubber::core::{
    ClockScheduler, Command, Error, FrameDimensions, FrameSource, MemoryTarget, PlaybackRate,
    PlaybackState, Scheduler, Session, TimerHandle,
};

/// 10x10 source whose every pixel holds the current step number
struct StepSource {
    step: u8,
    pixels: Vec<u8>,
}

impl StepSource {
    fn new() -> Self {
        let mut source = Self { step: 0, pixels: Vec::new() };
        source.sync();
        source
    }

    fn sync(&mut self) {
        self.pixels = [self.step, self.step, self.step, 255].repeat(100);
    }
}

impl FrameSource for StepSource {
    fn dimensions(&self) -> FrameDimensions {
        FrameDimensions::display(10, 10)
    }

    fn current_pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn step_forward(&mut self) {
        self.step = self.step.saturating_add(1);
        self.sync();
    }

    fn step_backward(&mut self) {
        self.step = self.step.saturating_sub(1);
        self.sync();
    }

    fn reset(&mut self) {
        self.step = 0;
        self.sync();
    }

    fn seek_end(&mut self) {
        self.step = 99;
        self.sync();
    }
}

/// Scheduler wrapper that records how many timers were ever live at once
#[derive(Default)]
struct CountingScheduler {
    inner: ClockScheduler,
    starts: usize,
    cancels: usize,
    max_live: usize,
}

impl CountingScheduler {
    fn live(&self) -> usize {
        self.inner.live_count()
    }
}

impl Scheduler for CountingScheduler {
    fn start(&mut self, period: Duration) -> TimerHandle {
        self.starts += 1;
        let handle = self.inner.start(period);
        self.max_live = self.max_live.max(self.inner.live_count());
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.cancels += 1;
        self.inner.cancel(handle);
    }

    fn advance(&mut self, delta: Duration) -> Vec<TimerHandle> {
        self.inner.advance(delta)
    }

    fn next_due(&self) -> Option<Duration> {
        self.inner.next_due()
    }
}

type TestSession = Session<StepSource, MemoryTarget, CountingScheduler>;

fn session(rate_ms: i64) -> TestSession {
    let mut session = Session::new(
        StepSource::new(),
        MemoryTarget::new(20, 20),
        CountingScheduler::default(),
        PlaybackRate::from_millis(rate_ms).unwrap(),
    )
    .unwrap();
    session.redraw().unwrap();
    session
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn shown_step(session: &TestSession) -> u8 {
    session.target().pixel(19, 19).unwrap()[0]
}

fn assert_timer_matches_state(session: &TestSession) {
    let idle = session.state() == PlaybackState::Idle;
    assert_eq!(idle, session.controller().live_timer().is_none());
    assert_eq!(session.controller().scheduler().live(), if idle { 0 } else { 1 });
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_play_one_interval_then_pause() {
    let mut session = session(150);

    session.dispatch(Command::PlayForward).unwrap();
    assert_eq!(session.state(), PlaybackState::PlayingForward);
    let after_play = session.source().step;

    assert_eq!(session.advance(ms(150)).unwrap(), 1);
    assert_eq!(session.source().step, after_play + 1);
    assert_eq!(shown_step(&session), after_play + 1);

    session.dispatch(Command::Pause).unwrap();
    assert_eq!(session.advance(ms(300)).unwrap(), 0);
    assert_eq!(session.source().step, after_play + 1);
    assert_eq!(session.state(), PlaybackState::Idle);
}

#[test]
fn test_reset_while_playing() {
    let mut session = session(150);
    session.dispatch(Command::PlayForward).unwrap();
    session.advance(ms(450)).unwrap();

    session.dispatch(Command::Reset).unwrap();

    assert_eq!(session.state(), PlaybackState::Idle);
    assert_eq!(session.source().step, 0);
    assert_eq!(shown_step(&session), 0);
    assert!(session.controller().live_timer().is_none());
    assert_eq!(session.advance(ms(1000)).unwrap(), 0);
}

// ============================================================================
// Timer invariants
// ============================================================================

#[test]
fn test_at_most_one_timer_under_any_command_mix() {
    let mut session = session(100);
    let commands = [
        Command::PlayForward,
        Command::PlayForward,
        Command::PlayReverse,
        Command::SetRate(40),
        Command::PlayForward,
        Command::StepBackward,
        Command::PlayReverse,
        Command::SetRate(250),
        Command::Pause,
        Command::Pause,
        Command::PlayForward,
        Command::SeekEnd,
        Command::PlayReverse,
        Command::Reset,
    ];

    for command in commands {
        session.dispatch(command).unwrap();
        session.advance(ms(60)).unwrap();
        assert_timer_matches_state(&session);
    }

    let scheduler = session.controller().scheduler();
    assert_eq!(scheduler.max_live, 1);
    assert_eq!(scheduler.starts, scheduler.cancels + scheduler.live());
}

#[test]
fn test_direction_switch_replaces_cadence() {
    let mut session = session(100);
    session.dispatch(Command::PlayForward).unwrap();
    let forward = session.controller().live_timer().unwrap();

    session.dispatch(Command::PlayReverse).unwrap();
    let reverse = session.controller().live_timer().unwrap();

    assert_ne!(forward, reverse);
    assert_eq!(session.state(), PlaybackState::PlayingReverse);
    assert_eq!(session.controller().scheduler().live(), 1);
}

#[test]
fn test_manual_step_stops_playback_first() {
    let mut session = session(100);
    session.dispatch(Command::PlayForward).unwrap();
    let before = session.source().step;

    session.dispatch(Command::StepForward).unwrap();

    assert_eq!(session.state(), PlaybackState::Idle);
    assert_eq!(session.source().step, before + 1);
    assert_eq!(session.advance(ms(500)).unwrap(), 0);
    assert_eq!(session.source().step, before + 1);
}

#[test]
fn test_step_backward_while_reversing() {
    let mut session = session(100);
    session.dispatch(Command::SeekEnd).unwrap();
    session.dispatch(Command::PlayReverse).unwrap();
    session.advance(ms(100)).unwrap();
    assert_eq!(session.source().step, 97);

    session.dispatch(Command::StepBackward).unwrap();
    assert_eq!(session.source().step, 96);
    assert_eq!(session.state(), PlaybackState::Idle);
}

// ============================================================================
// Rate
// ============================================================================

#[test]
fn test_rate_change_while_idle_does_not_start() {
    let mut session = session(1000);
    session.dispatch(Command::SetRate(150)).unwrap();

    assert_eq!(session.state(), PlaybackState::Idle);
    assert_eq!(session.rate().millis(), 150);
    assert_eq!(session.controller().scheduler().starts, 0);
    assert_eq!(session.source().step, 0);

    // The stored rate sets the cadence of the next play
    session.dispatch(Command::PlayForward).unwrap();
    assert_eq!(session.next_due(), Some(ms(150)));
    assert_eq!(session.advance(ms(149)).unwrap(), 0);
    assert_eq!(session.advance(ms(1)).unwrap(), 1);
    assert_eq!(session.source().step, 2);
}

#[test]
fn test_rate_change_while_playing_applies_next_interval() {
    let mut session = session(1000);
    session.dispatch(Command::PlayForward).unwrap();
    session.dispatch(Command::SetRate(100)).unwrap();

    assert_eq!(session.state(), PlaybackState::PlayingForward);
    assert_eq!(session.next_due(), Some(ms(100)));
    let before = session.source().step;
    assert_eq!(session.advance(ms(300)).unwrap(), 3);
    assert_eq!(session.source().step, before + 3);
}

#[test]
fn test_invalid_rate_keeps_everything() {
    let mut session = session(150);
    session.dispatch(Command::PlayForward).unwrap();
    let timer = session.controller().live_timer();

    for bad in [0, -1, i64::MIN] {
        let err = session.dispatch(Command::SetRate(bad)).unwrap_err();
        assert_eq!(err, Error::InvalidRate(bad));
    }

    assert_eq!(session.rate().millis(), 150);
    assert_eq!(session.controller().live_timer(), timer);
    assert_eq!(session.state(), PlaybackState::PlayingForward);
}

#[test]
fn test_catch_up_is_capped() {
    let mut session = Session::new(
        StepSource::new(),
        MemoryTarget::new(10, 10),
        ClockScheduler::with_catch_up(2),
        PlaybackRate::from_millis(10).unwrap(),
    )
    .unwrap();
    session.dispatch(Command::PlayForward).unwrap();

    // A stalled host reports a long frame; only two ticks are replayed
    assert_eq!(session.advance(ms(1000)).unwrap(), 2);
    assert_eq!(session.source().step, 3);
}
