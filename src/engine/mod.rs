//! Frame engines that can drive a session
//!
//! Playback treats these as opaque [`FrameSource`](crate::core::FrameSource)s;
//! they live here so the binary has something to show.

pub mod rotation;
pub mod sequence;

pub use rotation::*;
pub use sequence::*;

use thiserror::Error;

/// Errors raised while building an engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A plane rotation needs two distinct rows
    #[error("rotation keys need at least 2 rows, frame has {rows}")]
    TooFewRows { rows: u32 },

    /// Plaintext must hold one value per pixel
    #[error("plaintext has {actual} values, frame needs {expected}")]
    PlaintextLength { expected: usize, actual: usize },

    /// A key must rotate two distinct rows inside the frame
    #[error("key {step} rotates rows {a} and {b}, frame has {rows} rows")]
    InvalidKey { step: usize, a: usize, b: usize, rows: u32 },

    /// A sequence needs at least one frame
    #[error("frame sequence is empty")]
    NoFrames,

    #[error(transparent)]
    Frame(#[from] crate::core::Error),
}
