use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::EngineError;
use crate::core::{FrameDimensions, FrameSource, Progress};

/// Rotation of two matrix rows by `angle` radians
///
/// Left-multiplying by the Givens matrix only touches rows `a` and `b`, so
/// it is applied in place instead of building the full matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneRotation {
    pub a: usize,
    pub b: usize,
    pub angle: f32,
}

impl PlaneRotation {
    /// Random rotation between two distinct rows of a `rows`-row matrix
    pub fn random<R: Rng + ?Sized>(rng: &mut R, rows: usize) -> Self {
        let angle: f32 = rng.random();
        let a = rng.random_range(0..rows);
        let mut b = rng.random_range(0..rows);
        while a == b {
            b = rng.random_range(0..rows);
        }
        Self { a, b, angle }
    }

    fn apply(&self, data: &mut [f32], cols: usize) {
        rotate_rows(data, cols, self.a, self.b, self.angle);
    }

    fn undo(&self, data: &mut [f32], cols: usize) {
        rotate_rows(data, cols, self.a, self.b, -self.angle);
    }
}

fn rotate_rows(data: &mut [f32], cols: usize, a: usize, b: usize, angle: f32) {
    let (sin, cos) = angle.sin_cos();
    for col in 0..cols {
        let ia = a * cols + col;
        let ib = b * cols + col;
        let (va, vb) = (data[ia], data[ib]);
        data[ia] = cos * va - sin * vb;
        data[ib] = sin * va + cos * vb;
    }
}

/// Random matrix scrambled one plane rotation ("key") per step
///
/// Step 0 shows the plaintext matrix; step `i` shows it after keys
/// `0..i`. Stepping clamps at both ends. Cells render as grey levels
/// `floor(v * 255)`, so values pushed outside [0, 1] by a rotation saturate
/// to black or white.
#[derive(Debug, Clone)]
pub struct RotationCipher {
    dimensions: FrameDimensions,
    keys: Vec<PlaneRotation>,
    plaintext: Vec<f32>,
    current: Vec<f32>,
    index: usize,
    pixels: Vec<u8>,
}

impl RotationCipher {
    /// Build a cipher with `key_count` steps from a fixed seed
    pub fn seeded(dimensions: FrameDimensions, key_count: usize, seed: u64) -> Result<Self, EngineError> {
        Self::generate(dimensions, key_count, &mut StdRng::seed_from_u64(seed))
    }

    /// Build a cipher with `key_count` steps from `rng`
    pub fn generate<R: Rng + ?Sized>(
        dimensions: FrameDimensions,
        key_count: usize,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        dimensions.frame_buffer_size()?;
        let rows = dimensions.height as usize;
        if key_count > 0 && rows < 2 {
            return Err(EngineError::TooFewRows { rows: dimensions.height });
        }

        let keys = (0..key_count).map(|_| PlaneRotation::random(rng, rows)).collect();
        let plaintext: Vec<f32> = (0..dimensions.pixel_count()).map(|_| rng.random()).collect();
        Self::from_parts(dimensions, keys, plaintext)
    }

    /// Build from explicit keys and a row-major plaintext
    ///
    /// The plaintext must hold one value per pixel and every key must name
    /// two distinct rows of the frame.
    pub fn from_parts(
        dimensions: FrameDimensions,
        keys: Vec<PlaneRotation>,
        plaintext: Vec<f32>,
    ) -> Result<Self, EngineError> {
        let buffer_size = dimensions.frame_buffer_size()?;
        if plaintext.len() != dimensions.pixel_count() {
            return Err(EngineError::PlaintextLength {
                expected: dimensions.pixel_count(),
                actual: plaintext.len(),
            });
        }
        let rows = dimensions.height as usize;
        for (step, key) in keys.iter().enumerate() {
            if key.a == key.b || key.a >= rows || key.b >= rows {
                return Err(EngineError::InvalidKey {
                    step,
                    a: key.a,
                    b: key.b,
                    rows: dimensions.height,
                });
            }
        }

        let mut cipher = Self {
            dimensions,
            keys,
            current: plaintext.clone(),
            plaintext,
            index: 0,
            pixels: vec![0; buffer_size],
        };
        cipher.render();
        Ok(cipher)
    }

    pub fn keys(&self) -> &[PlaneRotation] {
        &self.keys
    }

    pub fn plaintext(&self) -> &[f32] {
        &self.plaintext
    }

    /// Matrix values at the current step, row-major
    pub fn current_matrix(&self) -> &[f32] {
        &self.current
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn cols(&self) -> usize {
        self.dimensions.width as usize
    }

    fn render(&mut self) {
        for (px, &value) in self.pixels.chunks_exact_mut(4).zip(self.current.iter()) {
            let level = (value * 255.0).floor() as u8;
            px.copy_from_slice(&[level, level, level, 255]);
        }
    }
}

impl FrameSource for RotationCipher {
    fn dimensions(&self) -> FrameDimensions {
        self.dimensions
    }

    fn current_pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn step_forward(&mut self) {
        if self.index < self.keys.len() {
            let cols = self.cols();
            self.keys[self.index].apply(&mut self.current, cols);
            self.index += 1;
            self.render();
        }
    }

    fn step_backward(&mut self) {
        if self.index > 0 {
            self.index -= 1;
            let cols = self.cols();
            self.keys[self.index].undo(&mut self.current, cols);
            self.render();
        }
    }

    fn reset(&mut self) {
        self.current.copy_from_slice(&self.plaintext);
        self.index = 0;
        self.render();
    }

    fn seek_end(&mut self) {
        let cols = self.cols();
        while self.index < self.keys.len() {
            self.keys[self.index].apply(&mut self.current, cols);
            self.index += 1;
        }
        self.render();
    }

    fn progress(&self) -> Option<Progress> {
        Some(Progress {
            index: self.index,
            last: self.keys.len(),
        })
    }
}
