use std::fmt;

/// Discrete request from a control surface (buttons, keys, slider)
///
/// Each variant maps onto exactly one playback controller operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PlayForward,
    PlayReverse,
    Pause,
    Reset,
    SeekEnd,
    StepForward,
    StepBackward,
    /// New interval in milliseconds, as read from the rate control
    SetRate(i64),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PlayForward => f.write_str("play forward"),
            Command::PlayReverse => f.write_str("play reverse"),
            Command::Pause => f.write_str("pause"),
            Command::Reset => f.write_str("reset"),
            Command::SeekEnd => f.write_str("seek end"),
            Command::StepForward => f.write_str("step forward"),
            Command::StepBackward => f.write_str("step backward"),
            Command::SetRate(ms) => write!(f, "set rate {} ms", ms),
        }
    }
}
