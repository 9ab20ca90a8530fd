use thiserror::Error;

use super::dimensions::FrameDimensions;

/// Errors raised by the playback and presentation pipeline
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Frame source handed out a buffer that disagrees with its declared size
    #[error(
        "frame buffer for {width}x{height} must hold {expected} bytes, got {actual}"
    )]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Off-screen surface was allocated for a different frame size
    #[error("off-screen surface is {surface} but the frame source reports {source_dims}")]
    SurfaceMismatch {
        surface: FrameDimensions,
        source_dims: FrameDimensions,
    },

    /// Playback rate must be a positive number of milliseconds
    #[error("playback rate must be positive, got {0} ms")]
    InvalidRate(i64),

    /// Frame dimensions must both be non-zero
    #[error("frame dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// Buffer size for these dimensions does not fit in memory
    #[error("{width}x{height} frame is too large to address")]
    Oversized { width: u32, height: u32 },

    /// Display target refused the committed frame
    #[error("display target rejected frame: {0}")]
    Present(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message_names_both_lengths() {
        let err = Error::DimensionMismatch {
            width: 10,
            height: 10,
            expected: 400,
            actual: 399,
        };
        let msg = err.to_string();
        assert!(msg.contains("10x10"));
        assert!(msg.contains("400"));
        assert!(msg.contains("399"));
    }

    #[test]
    fn test_invalid_rate_message() {
        assert_eq!(
            Error::InvalidRate(-5).to_string(),
            "playback rate must be positive, got -5 ms"
        );
    }
}
