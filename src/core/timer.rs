//! Repeating timers driven by host-supplied delta time
//! Nothing here sleeps or spawns; time only moves when `advance` is called

use std::time::{Duration, Instant};

/// Identifies one started timer; never reused by a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Fixed interval timer - accumulates delta and fires every `period`
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period: Duration,
    accumulator: Duration,
}

impl Interval {
    /// Create timer that fires every `period`
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            accumulator: Duration::ZERO,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Update with delta, returns how many periods completed (at most `max`)
    ///
    /// Periods beyond `max` are dropped so a stalled host does not replay a
    /// burst of stale ticks.
    pub fn tick(&mut self, delta: Duration, max: u32) -> u32 {
        self.accumulator += delta;

        if self.period.is_zero() {
            self.accumulator = Duration::ZERO;
            return max;
        }

        let mut fired = 0;
        while self.accumulator >= self.period && fired < max {
            self.accumulator -= self.period;
            fired += 1;
        }
        if self.accumulator >= self.period {
            self.accumulator = Duration::from_nanos(
                (self.accumulator.as_nanos() % self.period.as_nanos()) as u64,
            );
        }
        fired
    }

    /// Time left until the next fire
    pub fn remaining(&self) -> Duration {
        self.period.saturating_sub(self.accumulator)
    }
}

/// Turns host redraw instants into the deltas fed to a [`Scheduler`]
///
/// The first reading after construction or [`HostClock::restart`] is zero,
/// so time spent before playback starts (window setup, GPU init) never
/// arrives as one long tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostClock {
    last: Option<Instant>,
}

impl HostClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the previous reading
    pub fn delta(&mut self) -> Duration {
        self.delta_at(Instant::now())
    }

    /// Same as [`HostClock::delta`] with an explicit `now`
    pub fn delta_at(&mut self, now: Instant) -> Duration {
        let delta = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last = Some(now);
        delta
    }

    /// Forget the previous reading
    pub fn restart(&mut self) {
        self.last = None;
    }
}

/// Source of repeating ticks for the playback controller
pub trait Scheduler {
    /// Start a repeating timer; its first tick is due one `period` from now
    fn start(&mut self, period: Duration) -> TimerHandle;

    /// Stop a timer; no tick of `handle` is reported after this returns
    fn cancel(&mut self, handle: TimerHandle);

    /// Move time forward and report the ticks that fell due, in order
    fn advance(&mut self, delta: Duration) -> Vec<TimerHandle>;

    /// Time until the earliest pending tick, if any timer is running
    fn next_due(&self) -> Option<Duration>;
}

/// Default catch-up cap per timer per `advance`
pub const DEFAULT_MAX_CATCH_UP_TICKS: u32 = 4;

/// Scheduler backed by [`Interval`] accumulators
#[derive(Debug)]
pub struct ClockScheduler {
    timers: Vec<(TimerHandle, Interval)>,
    next_id: u64,
    max_catch_up: u32,
}

impl ClockScheduler {
    pub fn new() -> Self {
        Self::with_catch_up(DEFAULT_MAX_CATCH_UP_TICKS)
    }

    /// Limit how many ticks one timer may report from a single `advance`
    pub fn with_catch_up(max_catch_up: u32) -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
            max_catch_up: max_catch_up.max(1),
        }
    }

    /// Number of timers currently running
    pub fn live_count(&self) -> usize {
        self.timers.len()
    }
}

impl Default for ClockScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ClockScheduler {
    fn start(&mut self, period: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.push((handle, Interval::new(period)));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|(h, _)| *h != handle);
    }

    fn advance(&mut self, delta: Duration) -> Vec<TimerHandle> {
        let mut fired = Vec::new();
        for (handle, interval) in &mut self.timers {
            let count = interval.tick(delta, self.max_catch_up);
            fired.extend(std::iter::repeat(*handle).take(count as usize));
        }
        fired
    }

    fn next_due(&self) -> Option<Duration> {
        self.timers.iter().map(|(_, i)| i.remaining()).min()
    }
}
