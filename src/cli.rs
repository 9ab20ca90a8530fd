// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "frame-scrubber")]
#[command(about = "Frame-by-frame animation player", long_about = None)]
pub struct Cli {
    /// Frame width in cells
    #[arg(long)]
    pub width: Option<u32>,

    /// Frame height in cells
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of animation steps after the first frame
    #[arg(long)]
    pub steps: Option<usize>,

    /// Interval between automatic steps, in milliseconds
    #[arg(long = "rate-ms", allow_negative_numbers = true)]
    pub rate_ms: Option<i64>,

    #[arg(long = "window-width")]
    pub window_width: Option<u32>,

    #[arg(long = "window-height")]
    pub window_height: Option<u32>,

    /// Seed for the generated animation (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON settings file; flags given on the command line win
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Hide the control panel (keyboard controls stay active)
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}
