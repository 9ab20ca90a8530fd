use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::command::Command;

/// Rate slider state shared by the keyboard and on-screen controls
///
/// Holds the raw millisecond value the user picked; `SetRate` commands carry
/// whatever it reads at the moment they are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateControl {
    value: i64,
    min: i64,
    max: i64,
    step: i64,
}

impl RateControl {
    /// Create a slider clamped to `min..=max`
    pub fn new(value: i64, min: i64, max: i64, step: i64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            value: value.clamp(min, max),
            min,
            max,
            step: step.max(1),
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Mutable access for slider widgets
    pub fn value_mut(&mut self) -> &mut i64 {
        &mut self.value
    }

    pub fn range(&self) -> std::ops::RangeInclusive<i64> {
        self.min..=self.max
    }

    /// Command reflecting the current slider value
    pub fn command(&self) -> Command {
        Command::SetRate(self.value)
    }

    /// Shorter interval, i.e. faster playback
    pub fn faster(&mut self) -> Command {
        self.value = (self.value - self.step).clamp(self.min, self.max);
        self.command()
    }

    /// Longer interval, i.e. slower playback
    pub fn slower(&mut self) -> Command {
        self.value = (self.value + self.step).clamp(self.min, self.max);
        self.command()
    }
}

/// Adapter that turns winit keyboard events into playback commands
///
/// | key            | command        |
/// |----------------|----------------|
/// | Right arrow    | step forward   |
/// | Left arrow     | step backward  |
/// | F              | play forward   |
/// | B              | play reverse   |
/// | Space          | pause          |
/// | Home           | reset          |
/// | End            | seek end       |
/// | `+` / `-`      | faster/slower  |
#[derive(Debug, Clone)]
pub struct KeyboardControls {
    rate: RateControl,
}

impl KeyboardControls {
    pub fn new(rate: RateControl) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> &RateControl {
        &self.rate
    }

    pub fn rate_mut(&mut self) -> &mut RateControl {
        &mut self.rate
    }

    /// Process a Winit WindowEvent, returning the command it maps to
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<Command> {
        match event {
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match event.physical_key {
                    PhysicalKey::Code(keycode) => self.command_for_key(keycode, event.repeat),
                    PhysicalKey::Unidentified(_) => None,
                }
            }
            _ => None,
        }
    }

    /// Map a pressed key to a command; held keys repeat only steps and rate
    pub fn command_for_key(&mut self, keycode: KeyCode, repeat: bool) -> Option<Command> {
        let command = match keycode {
            KeyCode::ArrowRight => Command::StepForward,
            KeyCode::ArrowLeft => Command::StepBackward,
            KeyCode::Equal | KeyCode::NumpadAdd => return Some(self.rate.faster()),
            KeyCode::Minus | KeyCode::NumpadSubtract => return Some(self.rate.slower()),
            _ if repeat => return None,
            KeyCode::KeyF => Command::PlayForward,
            KeyCode::KeyB => Command::PlayReverse,
            KeyCode::Space => Command::Pause,
            KeyCode::Home => Command::Reset,
            KeyCode::End => Command::SeekEnd,
            _ => return None,
        };
        Some(command)
    }
}
