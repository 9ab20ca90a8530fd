use serde::{Deserialize, Serialize};

use super::EngineError;
use crate::core::{FrameDimensions, FrameSource, PixelView, Progress};

/// What a sequence does when stepped past either end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Stay on the first/last frame
    #[default]
    Clamp,
    /// Continue from the other end
    Wrap,
}

/// Pre-rendered RGBA frames played back in order
#[derive(Debug, Clone)]
pub struct FrameSequence {
    dimensions: FrameDimensions,
    frames: Vec<Vec<u8>>,
    index: usize,
    policy: BoundaryPolicy,
}

impl FrameSequence {
    /// Every frame must hold exactly `width * height * 4` bytes
    pub fn new(
        dimensions: FrameDimensions,
        frames: Vec<Vec<u8>>,
        policy: BoundaryPolicy,
    ) -> Result<Self, EngineError> {
        if frames.is_empty() {
            return Err(EngineError::NoFrames);
        }
        for frame in &frames {
            PixelView::checked(dimensions, frame)?;
        }
        Ok(Self {
            dimensions,
            frames,
            index: 0,
            policy,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; construction rejects empty sequences
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    fn last(&self) -> usize {
        self.frames.len() - 1
    }
}

impl FrameSource for FrameSequence {
    fn dimensions(&self) -> FrameDimensions {
        self.dimensions
    }

    fn current_pixels(&self) -> &[u8] {
        &self.frames[self.index]
    }

    fn step_forward(&mut self) {
        self.index = match self.policy {
            BoundaryPolicy::Clamp => (self.index + 1).min(self.last()),
            BoundaryPolicy::Wrap => (self.index + 1) % self.frames.len(),
        };
    }

    fn step_backward(&mut self) {
        self.index = match (self.policy, self.index) {
            (BoundaryPolicy::Clamp, 0) => 0,
            (BoundaryPolicy::Wrap, 0) => self.last(),
            (_, i) => i - 1,
        };
    }

    fn reset(&mut self) {
        self.index = 0;
    }

    fn seek_end(&mut self) {
        self.index = self.last();
    }

    fn progress(&self) -> Option<Progress> {
        Some(Progress {
            index: self.index,
            last: self.last(),
        })
    }
}
