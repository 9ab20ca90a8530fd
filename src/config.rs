//! Player settings: JSON file, then command-line overrides

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::core::{FrameDimensions, PlaybackRate, RateControl, DEFAULT_MAX_CATCH_UP_TICKS, DEFAULT_RATE_MS};

pub const DEFAULT_FRAME_SIZE: u32 = 10;
pub const DEFAULT_STEPS: usize = 5;
pub const INITIAL_WINDOW_WIDTH: u32 = 800;
pub const INITIAL_WINDOW_HEIGHT: u32 = 600;

/// Bounds and step of the on-screen rate slider, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    pub min_ms: i64,
    pub max_ms: i64,
    pub step_ms: i64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            min_ms: 10,
            max_ms: 2000,
            step_ms: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame width in cells
    pub width: u32,
    /// Frame height in cells (matrix rows)
    pub height: u32,
    /// Rotation keys, i.e. steps after the first frame
    pub steps: usize,
    pub rate_ms: i64,
    pub window_width: u32,
    pub window_height: u32,
    /// Fixed seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
    pub max_catch_up_ticks: u32,
    pub show_ui: bool,
    pub slider: SliderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_FRAME_SIZE,
            height: DEFAULT_FRAME_SIZE,
            steps: DEFAULT_STEPS,
            rate_ms: DEFAULT_RATE_MS as i64,
            window_width: INITIAL_WINDOW_WIDTH,
            window_height: INITIAL_WINDOW_HEIGHT,
            seed: None,
            max_catch_up_ticks: DEFAULT_MAX_CATCH_UP_TICKS,
            show_ui: true,
            slider: SliderConfig::default(),
        }
    }
}

impl Config {
    /// Parse settings from JSON; missing keys take their defaults
    pub fn parse_str(s: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(s)?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse_str(&s).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Settings file named by `--config` (or defaults) with flags applied on top
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        cfg.apply(cli);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Overwrite fields with every flag given on the command line
    pub fn apply(&mut self, cli: &Cli) {
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if let Some(steps) = cli.steps {
            self.steps = steps;
        }
        if let Some(rate_ms) = cli.rate_ms {
            self.rate_ms = rate_ms;
        }
        if let Some(w) = cli.window_width {
            self.window_width = w;
        }
        if let Some(h) = cli.window_height {
            self.window_height = h;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if cli.no_ui {
            self.show_ui = false;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.frame_dimensions()?;
        self.playback_rate()?;
        if self.steps > 0 && self.height < 2 {
            bail!("{} steps need a frame at least 2 rows high, got {}", self.steps, self.height);
        }
        if self.window_width == 0 || self.window_height == 0 {
            bail!("window size must be non-zero, got {}x{}", self.window_width, self.window_height);
        }
        let SliderConfig { min_ms, max_ms, step_ms } = self.slider;
        if min_ms <= 0 || min_ms > max_ms || step_ms <= 0 {
            bail!("invalid rate slider {}..={} ms step {}", min_ms, max_ms, step_ms);
        }
        if !(min_ms..=max_ms).contains(&self.rate_ms) {
            bail!("rate {} ms is outside the slider range {}..={} ms", self.rate_ms, min_ms, max_ms);
        }
        Ok(())
    }

    pub fn frame_dimensions(&self) -> Result<FrameDimensions> {
        Ok(FrameDimensions::new(self.width, self.height)?)
    }

    pub fn playback_rate(&self) -> Result<PlaybackRate> {
        Ok(PlaybackRate::from_millis(self.rate_ms)?)
    }

    /// Slider model starting at the configured rate
    pub fn rate_control(&self) -> RateControl {
        RateControl::new(self.rate_ms, self.slider.min_ms, self.slider.max_ms, self.slider.step_ms)
    }
}
